use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Role;
use crate::domain::ports::role_repository::RoleRepository;

/// Resolves the effective permission set of roles, following explicit and
/// implicit (hierarchy-level) inheritance.
///
/// Cycle detection here is a safety net; the primary defense is
/// `HierarchyValidator` at mutation time. If a cycle slips through anyway
/// (e.g. direct data edits), resolution skips the offending edge and keeps
/// going instead of recursing forever.
pub struct PermissionResolver {
    repository: Arc<dyn RoleRepository>,
}

impl PermissionResolver {
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    pub async fn resolve_role(&self, role_id: &str) -> DomainResult<HashSet<String>> {
        let snapshot = self.snapshot().await?;
        resolve_in_snapshot(&snapshot, role_id)
    }

    /// Union over each role's independently resolved set. Permissions are
    /// purely additive, so resolution order does not matter.
    pub async fn resolve_roles(&self, role_ids: &[String]) -> DomainResult<HashSet<String>> {
        let snapshot = self.snapshot().await?;
        let mut effective = HashSet::new();
        for role_id in role_ids {
            effective.extend(resolve_in_snapshot(&snapshot, role_id)?);
        }
        Ok(effective)
    }

    /// One read of the whole role table; the rest of the resolution works on
    /// this snapshot so intermediate reads cannot observe interleaved writes.
    async fn snapshot(&self) -> DomainResult<HashMap<String, Role>> {
        let roles = self.repository.list_roles(true).await?;
        Ok(roles.into_iter().map(|role| (role.id.clone(), role)).collect())
    }
}

enum Frame<'a> {
    Enter(&'a str),
    Exit(&'a str),
}

/// Iterative DFS with a per-call visited set. `on_stack` tracks the current
/// chain so a back-edge (cycle) can be told apart from a diamond.
fn resolve_in_snapshot(
    snapshot: &HashMap<String, Role>,
    root_id: &str,
) -> DomainResult<HashSet<String>> {
    let (root_key, _) = snapshot
        .get_key_value(root_id)
        .ok_or_else(|| DomainError::RoleNotFound(root_id.to_string()))?;

    let mut effective: HashSet<String> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Frame> = vec![Frame::Enter(root_key.as_str())];

    while let Some(frame) = stack.pop() {
        let id = match frame {
            Frame::Exit(id) => {
                on_stack.remove(id);
                continue;
            }
            Frame::Enter(id) => id,
        };
        if !visited.insert(id) {
            continue;
        }
        on_stack.insert(id);
        stack.push(Frame::Exit(id));

        let role = &snapshot[id];
        effective.extend(role.permissions.iter().cloned());

        if !role.inherits {
            continue;
        }

        if !role.inherits_from.is_empty() {
            for source_id in &role.inherits_from {
                if on_stack.contains(source_id.as_str()) {
                    tracing::warn!(
                        "Cycle detected during resolution: {} inherits from {} which is already on the chain",
                        id,
                        source_id
                    );
                    continue;
                }
                if visited.contains(source_id.as_str()) {
                    continue;
                }
                match snapshot.get(source_id) {
                    Some(source) if source.is_active => stack.push(Frame::Enter(source_id.as_str())),
                    Some(_) => tracing::debug!(
                        "Skipping inactive inheritance source {} of role {}",
                        source_id,
                        id
                    ),
                    None => tracing::warn!("Role {} inherits from unknown role {}", id, source_id),
                }
            }
        } else {
            // Implicit inheritance: every active role strictly below this
            // role's hierarchy level. Equal levels never inherit.
            let level = role.hierarchy_level;
            for candidate in snapshot.values() {
                if candidate.is_active
                    && candidate.hierarchy_level < level
                    && !visited.contains(candidate.id.as_str())
                {
                    stack.push(Frame::Enter(candidate.id.as_str()));
                }
            }
        }
    }

    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &str, level: i64, permissions: Vec<&str>) -> Role {
        Role {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: None,
            permissions: permissions.into_iter().map(|p| p.to_string()).collect(),
            hierarchy_level: level,
            inherits: false,
            inherits_from: Vec::new(),
            is_active: true,
            is_system: false,
            created_at: "2026-08-01T00:00:00Z".to_string(),
            updated_at: "2026-08-01T00:00:00Z".to_string(),
        }
    }

    fn snapshot(roles: Vec<Role>) -> HashMap<String, Role> {
        roles.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    fn set(tokens: &[&str]) -> HashSet<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_no_inheritance_returns_own_permissions() {
        let snap = snapshot(vec![
            role("employee", 1, vec!["invoices:read"]),
            role("manager", 2, vec!["invoices:update"]),
        ]);

        let effective = resolve_in_snapshot(&snap, "manager").unwrap();
        assert_eq!(effective, set(&["invoices:update"]));
    }

    #[test]
    fn test_implicit_inheritance_unions_everything_below() {
        let mut manager = role("manager", 2, vec!["invoices:update"]);
        manager.inherits = true;
        let snap = snapshot(vec![
            role("viewer", 0, vec!["invoices:read"]),
            role("employee", 1, vec!["timesheets:write"]),
            manager,
            role("super", 4, vec!["admin:panel"]),
        ]);

        let effective = resolve_in_snapshot(&snap, "manager").unwrap();
        // Strictly lower levels only; level 4 is excluded.
        assert_eq!(
            effective,
            set(&["invoices:update", "invoices:read", "timesheets:write"])
        );
    }

    #[test]
    fn test_equal_levels_do_not_implicitly_inherit() {
        let mut a = role("a", 2, vec!["invoices:read"]);
        a.inherits = true;
        let snap = snapshot(vec![a, role("b", 2, vec!["invoices:delete"])]);

        let effective = resolve_in_snapshot(&snap, "a").unwrap();
        assert_eq!(effective, set(&["invoices:read"]));
    }

    #[test]
    fn test_explicit_inheritance_is_transitive() {
        let mut c = role("c", 3, vec!["audit:read"]);
        c.inherits = true;
        c.inherits_from = vec!["b".to_string()];
        let mut b = role("b", 2, vec!["timesheets:approve"]);
        b.inherits = true;
        b.inherits_from = vec!["a".to_string()];
        let snap = snapshot(vec![role("a", 1, vec!["invoices:read"]), b, c]);

        let effective = resolve_in_snapshot(&snap, "c").unwrap();
        assert_eq!(
            effective,
            set(&["audit:read", "timesheets:approve", "invoices:read"])
        );
    }

    #[test]
    fn test_inactive_explicit_source_is_skipped() {
        let mut b = role("b", 2, vec!["timesheets:approve"]);
        b.inherits = true;
        b.inherits_from = vec!["a".to_string()];
        let mut a = role("a", 1, vec!["invoices:read"]);
        a.is_active = false;
        let snap = snapshot(vec![a, b]);

        let effective = resolve_in_snapshot(&snap, "b").unwrap();
        assert_eq!(effective, set(&["timesheets:approve"]));
    }

    #[test]
    fn test_inactive_role_excluded_from_implicit_inheritance() {
        let mut manager = role("manager", 2, vec!["invoices:update"]);
        manager.inherits = true;
        let mut ghost = role("ghost", 1, vec!["users:delete"]);
        ghost.is_active = false;
        let snap = snapshot(vec![manager, ghost, role("viewer", 0, vec!["invoices:read"])]);

        let effective = resolve_in_snapshot(&snap, "manager").unwrap();
        assert_eq!(effective, set(&["invoices:update", "invoices:read"]));
    }

    #[test]
    fn test_missing_root_is_a_hard_failure() {
        let snap = snapshot(vec![role("a", 1, vec![])]);
        let err = resolve_in_snapshot(&snap, "nope").unwrap_err();
        assert!(matches!(err, DomainError::RoleNotFound(_)));
    }

    #[test]
    fn test_missing_inherited_role_is_skipped() {
        let mut b = role("b", 2, vec!["timesheets:approve"]);
        b.inherits = true;
        b.inherits_from = vec!["gone".to_string()];
        let snap = snapshot(vec![b]);

        let effective = resolve_in_snapshot(&snap, "b").unwrap();
        assert_eq!(effective, set(&["timesheets:approve"]));
    }

    #[test]
    fn test_cycle_terminates_instead_of_recursing() {
        // a -> b -> a, corrupt data that bypassed validation.
        let mut a = role("a", 2, vec!["invoices:read"]);
        a.inherits = true;
        a.inherits_from = vec!["b".to_string()];
        let mut b = role("b", 1, vec!["timesheets:write"]);
        b.inherits = true;
        b.inherits_from = vec!["a".to_string()];
        let snap = snapshot(vec![a, b]);

        let effective = resolve_in_snapshot(&snap, "a").unwrap();
        assert_eq!(effective, set(&["invoices:read", "timesheets:write"]));
    }

    #[test]
    fn test_diamond_inheritance_counts_each_role_once() {
        // d -> b, d -> c, b -> a, c -> a
        let mut d = role("d", 3, vec!["audit:read"]);
        d.inherits = true;
        d.inherits_from = vec!["b".to_string(), "c".to_string()];
        let mut b = role("b", 2, vec!["timesheets:approve"]);
        b.inherits = true;
        b.inherits_from = vec!["a".to_string()];
        let mut c = role("c", 2, vec!["schedules:manage"]);
        c.inherits = true;
        c.inherits_from = vec!["a".to_string()];
        let snap = snapshot(vec![role("a", 1, vec!["invoices:read"]), b, c, d]);

        let effective = resolve_in_snapshot(&snap, "d").unwrap();
        assert_eq!(
            effective,
            set(&[
                "audit:read",
                "timesheets:approve",
                "schedules:manage",
                "invoices:read"
            ])
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut manager = role("manager", 2, vec!["invoices:update"]);
        manager.inherits = true;
        let snap = snapshot(vec![manager, role("viewer", 0, vec!["invoices:read"])]);

        let first = resolve_in_snapshot(&snap, "manager").unwrap();
        let second = resolve_in_snapshot(&snap, "manager").unwrap();
        assert_eq!(first, second);
    }
}
