pub mod permission;
pub mod role;

pub use role::{BatchUpdateReport, HierarchyLevelUpdate, Role, RoleUpdate};
