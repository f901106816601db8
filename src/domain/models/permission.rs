/// Closed vocabulary of grantable permission tokens.
///
/// Tokens follow the `resource:action` convention. Every permission stored
/// on a role must come from this list; `is_super_admin` checks are computed
/// against the live slice so extending the vocabulary immediately demotes
/// actors that do not hold the new token.
pub const PERMISSION_VOCABULARY: &[&str] = &[
    ADMIN_PANEL,
    "users:read",
    "users:create",
    "users:update",
    "users:delete",
    "roles:read",
    "roles:manage",
    "invoices:read",
    "invoices:create",
    "invoices:update",
    "invoices:delete",
    "schedules:read",
    "schedules:manage",
    "timesheets:read",
    "timesheets:write",
    "timesheets:approve",
    "diagrams:read",
    "diagrams:edit",
    "audit:read",
];

/// Token that grants access to the admin panel (the `is_admin` check).
pub const ADMIN_PANEL: &str = "admin:panel";

/// The live enumeration of all grantable tokens.
pub fn vocabulary() -> &'static [&'static str] {
    PERMISSION_VOCABULARY
}

pub fn is_known(token: &str) -> bool {
    PERMISSION_VOCABULARY.contains(&token)
}
