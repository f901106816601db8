#![allow(dead_code)]
use std::sync::Arc;

use rolegraph::{InMemoryRoleRepository, Role, RoleRepository};

/// Fresh in-memory role store.
pub fn setup_store() -> Arc<InMemoryRoleRepository> {
    Arc::new(InMemoryRoleRepository::new())
}

/// Build a role with direct grants only (no inheritance).
pub fn test_role(name: &str, level: i64, permissions: &[&str]) -> Role {
    Role::new(
        name.to_string(),
        None,
        permissions.iter().map(|p| p.to_string()).collect(),
        level,
    )
}

/// Build a role that inherits implicitly from everything below its level.
pub fn implicit_role(name: &str, level: i64, permissions: &[&str]) -> Role {
    let mut role = test_role(name, level, permissions);
    role.inherits = true;
    role
}

/// Build a role with explicit inheritance sources.
pub fn explicit_role(name: &str, level: i64, permissions: &[&str], inherits_from: &[&str]) -> Role {
    test_role(name, level, permissions)
        .with_inheritance(inherits_from.iter().map(|id| id.to_string()).collect())
}

pub async fn insert(store: &Arc<InMemoryRoleRepository>, role: &Role) {
    store
        .create_role(role)
        .await
        .expect("Failed to create test role");
}
