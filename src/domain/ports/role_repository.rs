use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Role, RoleUpdate};

/// Durable storage for roles.
///
/// Adapters enforce two store-level constraints regardless of what the
/// service layer already checked: role names are unique across active and
/// inactive roles (`DuplicateRoleName`), and identity-defining fields of
/// system roles reject mutation (`SystemRoleImmutable`).
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list_roles(&self, include_inactive: bool) -> DomainResult<Vec<Role>>;
    async fn get_role_by_id(&self, id: &str) -> DomainResult<Option<Role>>;
    async fn get_role_by_name(&self, name: &str) -> DomainResult<Option<Role>>;
    async fn create_role(&self, role: &Role) -> DomainResult<()>;
    async fn update_role(&self, id: &str, update: &RoleUpdate) -> DomainResult<()>;

    /// Single-role hierarchy level write, the unit of a reorder batch.
    async fn update_hierarchy_level(&self, id: &str, level: i64) -> DomainResult<()>;

    /// Bootstrap-only upsert for seeding. Bypasses the system-role guard so
    /// that re-seeding can sync an existing system role's permission grants
    /// in place instead of duplicating it.
    async fn seed_system_role(&self, role: &Role) -> DomainResult<()>;
}
