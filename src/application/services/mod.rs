pub mod permission_service;
pub mod reorder_coordinator;

pub use permission_service::{ActorContext, PermissionService};
pub use reorder_coordinator::{
    derive_hierarchy_levels, ReorderCoordinator, ReorderHandle, ReorderSignal,
};
