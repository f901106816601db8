use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::permission;
use crate::domain::models::{BatchUpdateReport, HierarchyLevelUpdate, Role, RoleUpdate};
use crate::domain::ports::role_repository::RoleRepository;
use crate::domain::services::hierarchy_validator::HierarchyValidator;

pub struct RoleDomainService {
    repository: Arc<dyn RoleRepository>,
    validator: HierarchyValidator,
}

impl RoleDomainService {
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self {
            validator: HierarchyValidator::new(repository.clone()),
            repository,
        }
    }

    /// Roles in display order: highest hierarchy level first.
    pub async fn list_roles(&self, include_inactive: bool) -> DomainResult<Vec<Role>> {
        let mut roles = self.repository.list_roles(include_inactive).await?;
        roles.sort_by(|a, b| b.hierarchy_level.cmp(&a.hierarchy_level));
        Ok(roles)
    }

    pub async fn get_role(&self, id: &str) -> DomainResult<Role> {
        self.repository
            .get_role_by_id(id)
            .await?
            .ok_or_else(|| DomainError::RoleNotFound(id.to_string()))
    }

    pub async fn get_role_by_name(&self, name: &str) -> DomainResult<Role> {
        self.repository
            .get_role_by_name(name)
            .await?
            .ok_or_else(|| DomainError::RoleNotFound(name.to_string()))
    }

    pub async fn create_role(
        &self,
        name: String,
        description: Option<String>,
        permissions: Vec<String>,
        hierarchy_level: i64,
        inherits: bool,
        inherits_from: Vec<String>,
    ) -> DomainResult<Role> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Role name cannot be empty".to_string(),
            ));
        }
        validate_permission_tokens(&permissions)?;

        if self.repository.get_role_by_name(&name).await?.is_some() {
            return Err(DomainError::DuplicateRoleName(name));
        }

        let mut role = Role::new(name, description, permissions, hierarchy_level);
        if inherits {
            if !inherits_from.is_empty() {
                self.validator
                    .validate_inheritance(&role.id, &inherits_from)
                    .await?;
            }
            role.inherits = true;
            role.inherits_from = inherits_from;
        }

        self.repository.create_role(&role).await?;
        tracing::info!(
            "Created role {} at hierarchy level {}",
            role.name,
            role.hierarchy_level
        );
        Ok(role)
    }

    pub async fn update_role(&self, id: &str, update: RoleUpdate) -> DomainResult<Role> {
        let role = self.get_role(id).await?;

        // Domain rule: identity-defining fields of system roles are write-once.
        if role.is_system && update.touches_identity_fields() {
            return Err(DomainError::SystemRoleImmutable(role.name));
        }

        if let Some(ref perms) = update.permissions {
            validate_permission_tokens(perms)?;
        }

        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(DomainError::ValidationError(
                    "Role name cannot be empty".to_string(),
                ));
            }
            if name != &role.name && self.repository.get_role_by_name(name).await?.is_some() {
                return Err(DomainError::DuplicateRoleName(name.clone()));
            }
        }

        // Cycle check must pass before any write that persists explicit
        // inheritance edges. Switching to implicit (empty list) needs none.
        let inherits = update.inherits.unwrap_or(role.inherits);
        let proposed = update
            .inherits_from
            .as_deref()
            .unwrap_or(&role.inherits_from);
        let edges_changed = update.inherits.is_some() || update.inherits_from.is_some();
        if inherits && edges_changed && !proposed.is_empty() {
            self.validator.validate_inheritance(id, proposed).await?;
        }

        self.repository.update_role(id, &update).await?;
        self.get_role(id).await
    }

    /// Soft delete. Inactive roles drop out of implicit inheritance and
    /// hierarchy listings but keep their records.
    pub async fn deactivate_role(&self, id: &str) -> DomainResult<()> {
        let role = self.get_role(id).await?;
        if role.is_system {
            return Err(DomainError::SystemRoleImmutable(role.name));
        }
        let update = RoleUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        self.repository.update_role(id, &update).await?;
        tracing::info!("Deactivated role {}", role.name);
        Ok(())
    }

    pub async fn restore_role(&self, id: &str) -> DomainResult<()> {
        let role = self.get_role(id).await?;
        let update = RoleUpdate {
            is_active: Some(true),
            ..Default::default()
        };
        self.repository.update_role(id, &update).await?;
        tracing::info!("Restored role {}", role.name);
        Ok(())
    }

    /// Applies a batch of hierarchy-level writes. Each element is attempted
    /// independently; failures are collected, never propagated, so one bad
    /// role cannot abort the rest of the batch.
    pub async fn apply_hierarchy_levels(
        &self,
        updates: &[HierarchyLevelUpdate],
    ) -> BatchUpdateReport {
        let mut failed_role_ids = Vec::new();
        for update in updates {
            if let Err(e) = self
                .repository
                .update_hierarchy_level(&update.role_id, update.hierarchy_level)
                .await
            {
                tracing::warn!(
                    "Hierarchy level update failed for role {}: {}",
                    update.role_id,
                    e
                );
                failed_role_ids.push(update.role_id.clone());
            }
        }
        BatchUpdateReport {
            attempted: updates.len(),
            failed_role_ids,
        }
    }
}

fn validate_permission_tokens(tokens: &[String]) -> DomainResult<()> {
    for token in tokens {
        if !permission::is_known(token) {
            return Err(DomainError::ValidationError(format!(
                "Unknown permission token: '{}'",
                token
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryRoleRepository;

    fn service() -> RoleDomainService {
        RoleDomainService::new(Arc::new(InMemoryRoleRepository::new()))
    }

    #[test]
    fn test_create_role_rejects_unknown_permission_token() {
        tokio_test::block_on(async {
            let service = service();
            let err = service
                .create_role(
                    "MANAGER".to_string(),
                    None,
                    vec!["not:a_real_token".to_string()],
                    2,
                    false,
                    Vec::new(),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::ValidationError(_)));
        });
    }

    #[test]
    fn test_create_role_rejects_empty_name() {
        tokio_test::block_on(async {
            let service = service();
            let err = service
                .create_role("  ".to_string(), None, Vec::new(), 0, false, Vec::new())
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::ValidationError(_)));
        });
    }

    #[test]
    fn test_create_role_rejects_duplicate_name() {
        tokio_test::block_on(async {
            let service = service();
            service
                .create_role("MANAGER".to_string(), None, Vec::new(), 2, false, Vec::new())
                .await
                .unwrap();
            let err = service
                .create_role("MANAGER".to_string(), None, Vec::new(), 3, false, Vec::new())
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::DuplicateRoleName(_)));
        });
    }

    #[test]
    fn test_list_roles_orders_by_level_descending() {
        tokio_test::block_on(async {
            let service = service();
            for (name, level) in [("LOW", 1), ("HIGH", 9), ("MID", 5)] {
                service
                    .create_role(name.to_string(), None, Vec::new(), level, false, Vec::new())
                    .await
                    .unwrap();
            }
            let roles = service.list_roles(false).await.unwrap();
            let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["HIGH", "MID", "LOW"]);
        });
    }
}
