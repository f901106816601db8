use crate::domain::errors::DomainResult;
use crate::domain::models::permission;
use crate::domain::models::Role;
use crate::domain::ports::role_repository::RoleRepository;

pub const SUPER_ADMIN_ROLE: &str = "SUPER_ADMIN";
pub const ADMIN_ROLE: &str = "ADMIN";
pub const EMPLOYEE_ROLE: &str = "EMPLOYEE";

/// Seeds the system roles. Idempotent: re-running syncs an existing system
/// role's permission grants in place instead of duplicating it.
pub async fn seed_system_roles(repository: &dyn RoleRepository) -> DomainResult<()> {
    for role in system_role_definitions() {
        repository.seed_system_role(&role).await?;
        tracing::info!(
            "Seeded system role {} at hierarchy level {}",
            role.name,
            role.hierarchy_level
        );
    }
    Ok(())
}

fn system_role_definitions() -> Vec<Role> {
    let full_vocabulary: Vec<String> = permission::vocabulary()
        .iter()
        .map(|token| token.to_string())
        .collect();

    vec![
        Role::new(
            SUPER_ADMIN_ROLE.to_string(),
            Some("Full access to every capability".to_string()),
            full_vocabulary,
            100,
        )
        .as_system(),
        Role::new(
            ADMIN_ROLE.to_string(),
            Some("Panel access and user administration".to_string()),
            grants(&[
                "admin:panel",
                "users:read",
                "users:create",
                "users:update",
                "roles:read",
                "audit:read",
            ]),
            50,
        )
        .as_system(),
        Role::new(
            EMPLOYEE_ROLE.to_string(),
            Some("Baseline employee access".to_string()),
            grants(&[
                "invoices:read",
                "schedules:read",
                "timesheets:read",
                "timesheets:write",
                "diagrams:read",
            ]),
            10,
        )
        .as_system(),
    ]
}

fn grants(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| token.to_string()).collect()
}
