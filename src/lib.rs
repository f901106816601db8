pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::services::{
    derive_hierarchy_levels, ActorContext, PermissionService, ReorderCoordinator, ReorderHandle,
    ReorderSignal,
};
pub use config::{Config, ConfigError};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::permission;
pub use domain::models::{BatchUpdateReport, HierarchyLevelUpdate, Role, RoleUpdate};
pub use domain::ports::role_repository::RoleRepository;
pub use domain::ports::time_service::TimeService;
pub use domain::services::{HierarchyValidator, PermissionResolver, RoleDomainService};
pub use infrastructure::persistence::InMemoryRoleRepository;
pub use infrastructure::runtime::tokio::TokioTimeService;
