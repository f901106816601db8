use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::role_repository::RoleRepository;

/// Gates explicit inheritance edges before they are persisted.
///
/// Implicit (hierarchy-level) inheritance is never expanded here: it is
/// derived from a strict numeric comparison, and a level cannot be strictly
/// less than itself, so that mode is cycle-free by construction.
pub struct HierarchyValidator {
    repository: Arc<dyn RoleRepository>,
}

impl HierarchyValidator {
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Rejects `proposed_inherits_from` if the role being edited is reachable
    /// from any of the proposed sources through explicit inheritance edges.
    pub async fn validate_inheritance(
        &self,
        role_id: &str,
        proposed_inherits_from: &[String],
    ) -> DomainResult<()> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<String> = proposed_inherits_from.to_vec();

        while let Some(current) = stack.pop() {
            if current == role_id {
                return Err(DomainError::CycleDetected(role_id.to_string()));
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            match self.repository.get_role_by_id(&current).await? {
                Some(role) => {
                    if role.inherits && !role.inherits_from.is_empty() {
                        stack.extend(role.inherits_from.iter().cloned());
                    }
                }
                None => {
                    // Stale edge; nothing to traverse through it.
                    tracing::debug!(
                        "Skipping unknown role {} during inheritance validation",
                        current
                    );
                }
            }
        }

        Ok(())
    }
}
