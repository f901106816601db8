pub mod hierarchy_validator;
pub mod permission_resolver;
pub mod role_service;

pub use hierarchy_validator::HierarchyValidator;
pub use permission_resolver::PermissionResolver;
pub use role_service::RoleDomainService;
