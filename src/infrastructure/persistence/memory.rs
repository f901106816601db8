use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Role, RoleUpdate};
use crate::domain::ports::role_repository::RoleRepository;

/// In-memory `RoleRepository` adapter backed by a `RwLock`ed map.
///
/// Enforces the store-level constraints the port requires: unique names
/// across active and inactive roles, and the system-role write guard.
#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<String, Role>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap()
}

fn lock_poisoned() -> DomainError {
    DomainError::Internal("role store lock poisoned".to_string())
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn list_roles(&self, include_inactive: bool) -> DomainResult<Vec<Role>> {
        let roles = self.roles.read().map_err(|_| lock_poisoned())?;
        let mut out: Vec<Role> = roles
            .values()
            .filter(|role| include_inactive || role.is_active)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.hierarchy_level
                .cmp(&a.hierarchy_level)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(out)
    }

    async fn get_role_by_id(&self, id: &str) -> DomainResult<Option<Role>> {
        let roles = self.roles.read().map_err(|_| lock_poisoned())?;
        Ok(roles.get(id).cloned())
    }

    async fn get_role_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        let roles = self.roles.read().map_err(|_| lock_poisoned())?;
        Ok(roles.values().find(|role| role.name == name).cloned())
    }

    async fn create_role(&self, role: &Role) -> DomainResult<()> {
        let mut roles = self.roles.write().map_err(|_| lock_poisoned())?;
        if roles.values().any(|existing| existing.name == role.name) {
            return Err(DomainError::DuplicateRoleName(role.name.clone()));
        }
        if roles.contains_key(&role.id) {
            return Err(DomainError::Internal(format!(
                "Role id collision: {}",
                role.id
            )));
        }
        roles.insert(role.id.clone(), role.clone());
        Ok(())
    }

    async fn update_role(&self, id: &str, update: &RoleUpdate) -> DomainResult<()> {
        let mut roles = self.roles.write().map_err(|_| lock_poisoned())?;

        if let Some(ref name) = update.name {
            let taken = roles
                .values()
                .any(|existing| existing.id != id && &existing.name == name);
            if taken {
                return Err(DomainError::DuplicateRoleName(name.clone()));
            }
        }

        let role = roles
            .get_mut(id)
            .ok_or_else(|| DomainError::RoleNotFound(id.to_string()))?;

        if role.is_system && update.touches_identity_fields() {
            return Err(DomainError::SystemRoleImmutable(role.name.clone()));
        }

        if let Some(ref name) = update.name {
            role.name = name.clone();
        }
        if let Some(ref description) = update.description {
            role.description = Some(description.clone());
        }
        if let Some(ref permissions) = update.permissions {
            role.permissions = permissions.clone();
        }
        if let Some(level) = update.hierarchy_level {
            role.hierarchy_level = level;
        }
        if let Some(inherits) = update.inherits {
            role.inherits = inherits;
        }
        if let Some(ref inherits_from) = update.inherits_from {
            role.inherits_from = inherits_from.clone();
        }
        if let Some(is_active) = update.is_active {
            role.is_active = is_active;
        }
        role.updated_at = now_rfc3339();
        Ok(())
    }

    async fn update_hierarchy_level(&self, id: &str, level: i64) -> DomainResult<()> {
        let mut roles = self.roles.write().map_err(|_| lock_poisoned())?;
        let role = roles
            .get_mut(id)
            .ok_or_else(|| DomainError::RoleNotFound(id.to_string()))?;
        // A write of the level a system role already holds is a no-op, not a
        // mutation, so reorders that leave it in place do not spuriously fail.
        if role.is_system && role.hierarchy_level != level {
            return Err(DomainError::SystemRoleImmutable(role.name.clone()));
        }
        if role.hierarchy_level != level {
            role.hierarchy_level = level;
            role.updated_at = now_rfc3339();
        }
        Ok(())
    }

    async fn seed_system_role(&self, role: &Role) -> DomainResult<()> {
        let mut roles = self.roles.write().map_err(|_| lock_poisoned())?;
        let existing_id = roles
            .values()
            .find(|existing| existing.name == role.name)
            .map(|existing| existing.id.clone());

        match existing_id {
            Some(id) => {
                // Re-seeding syncs the permission grants in place; identity
                // stays with the original record.
                let existing = roles
                    .get_mut(&id)
                    .ok_or_else(|| DomainError::RoleNotFound(id.clone()))?;
                existing.permissions = role.permissions.clone();
                existing.description = role.description.clone();
                existing.hierarchy_level = role.hierarchy_level;
                existing.inherits = role.inherits;
                existing.inherits_from = role.inherits_from.clone();
                existing.is_system = true;
                existing.is_active = true;
                existing.updated_at = now_rfc3339();
            }
            None => {
                let mut seeded = role.clone();
                seeded.is_system = true;
                seeded.is_active = true;
                roles.insert(seeded.id.clone(), seeded);
            }
        }
        Ok(())
    }
}
