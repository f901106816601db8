use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A node in the privilege hierarchy.
///
/// `hierarchy_level` orders roles (higher = more privileged) and doubles as
/// the implicit inheritance boundary: a role with `inherits = true` and an
/// empty `inherits_from` list inherits from every active role strictly
/// below its own level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>, // Permission tokens like "invoices:update"
    pub hierarchy_level: i64,
    pub inherits: bool,
    pub inherits_from: Vec<String>, // Explicit source role ids, ordered
    pub is_active: bool,            // Soft-delete flag
    pub is_system: bool,            // Identity fields are write-once
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update applied through `RoleRepository::update_role`.
///
/// Every populated field here counts as identity-defining for the
/// system-role guard except `is_active` restoration, which is rejected
/// separately at the service layer for system roles.
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub hierarchy_level: Option<i64>,
    pub inherits: Option<bool>,
    pub inherits_from: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// One element of a batched hierarchy-level write (wire shape).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyLevelUpdate {
    pub role_id: String,
    pub hierarchy_level: i64,
}

/// Aggregate outcome of a batched hierarchy-level write.
///
/// Batch updates are never all-or-nothing: every element is attempted
/// independently and failures are collected rather than aborting the rest.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateReport {
    pub attempted: usize,
    pub failed_role_ids: Vec<String>,
}

impl BatchUpdateReport {
    pub fn is_full_success(&self) -> bool {
        self.failed_role_ids.is_empty()
    }
}

impl Role {
    pub fn new(
        name: String,
        description: Option<String>,
        permissions: Vec<String>,
        hierarchy_level: i64,
    ) -> Self {
        let now = OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            permissions,
            hierarchy_level,
            inherits: false,
            inherits_from: Vec::new(),
            is_active: true,
            is_system: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn with_inheritance(mut self, inherits_from: Vec<String>) -> Self {
        self.inherits = true;
        self.inherits_from = inherits_from;
        self
    }

    pub fn as_system(mut self) -> Self {
        self.is_system = true;
        self
    }
}

impl RoleUpdate {
    /// True if the update touches a field that is frozen on system roles.
    pub fn touches_identity_fields(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.permissions.is_some()
            || self.hierarchy_level.is_some()
            || self.inherits.is_some()
            || self.inherits_from.is_some()
    }
}
