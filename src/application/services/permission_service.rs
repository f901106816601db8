use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::permission;
use crate::domain::models::Role;
use crate::domain::ports::role_repository::RoleRepository;
use crate::domain::services::permission_resolver::PermissionResolver;

/// Resolved view of one actor: the roles they hold and the effective
/// permission set after inheritance.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub roles: Vec<Role>,
    pub effective_permissions: HashSet<String>,
}

/// Read-only query façade used by route guards and UI conditionals.
/// Checks operate on an already-resolved `ActorContext`; only
/// `resolve_actor` and `meets_hierarchy` touch the store.
pub struct PermissionService {
    repository: Arc<dyn RoleRepository>,
    resolver: PermissionResolver,
}

impl PermissionService {
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self {
            resolver: PermissionResolver::new(repository.clone()),
            repository,
        }
    }

    pub async fn resolve_actor(&self, role_ids: &[String]) -> DomainResult<ActorContext> {
        let mut roles = Vec::new();
        for role_id in role_ids {
            let role = self
                .repository
                .get_role_by_id(role_id)
                .await?
                .ok_or_else(|| DomainError::RoleNotFound(role_id.clone()))?;
            roles.push(role);
        }
        let effective_permissions = self.resolver.resolve_roles(role_ids).await?;
        Ok(ActorContext {
            roles,
            effective_permissions,
        })
    }

    pub fn has_permission(ctx: &ActorContext, token: &str) -> bool {
        ctx.effective_permissions.contains(token)
    }

    pub fn has_any_permission(ctx: &ActorContext, tokens: &[&str]) -> bool {
        tokens.iter().any(|token| Self::has_permission(ctx, token))
    }

    pub fn has_all_permissions(ctx: &ActorContext, tokens: &[&str]) -> bool {
        tokens.iter().all(|token| Self::has_permission(ctx, token))
    }

    pub fn has_role(ctx: &ActorContext, role_id: &str) -> bool {
        ctx.roles.iter().any(|role| role.id == role_id)
    }

    pub fn has_any_role(ctx: &ActorContext, role_ids: &[&str]) -> bool {
        role_ids.iter().any(|role_id| Self::has_role(ctx, role_id))
    }

    pub fn has_all_roles(ctx: &ActorContext, role_ids: &[&str]) -> bool {
        role_ids.iter().all(|role_id| Self::has_role(ctx, role_id))
    }

    /// Holds the designated panel-access token.
    pub fn is_admin(ctx: &ActorContext) -> bool {
        Self::has_permission(ctx, permission::ADMIN_PANEL)
    }

    /// Effective set covers the entire vocabulary. Checked against the live
    /// enumeration, so adding a token demotes previously-super actors until
    /// their roles catch up.
    pub fn is_super_admin(ctx: &ActorContext) -> bool {
        permission::vocabulary()
            .iter()
            .all(|token| ctx.effective_permissions.contains(*token))
    }

    /// True if the actor's highest held hierarchy level is at least the
    /// named role's level.
    pub async fn meets_hierarchy(
        &self,
        ctx: &ActorContext,
        required_role_name: &str,
    ) -> DomainResult<bool> {
        let required = self
            .repository
            .get_role_by_name(required_role_name)
            .await?
            .ok_or_else(|| DomainError::RoleNotFound(required_role_name.to_string()))?;
        let max_level = ctx.roles.iter().map(|role| role.hierarchy_level).max();
        Ok(matches!(max_level, Some(level) if level >= required.hierarchy_level))
    }
}
