use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Role not found: {0}")]
    RoleNotFound(String),
    #[error("Role name already exists: {0}")]
    DuplicateRoleName(String),
    #[error("Inheritance cycle detected involving role {0}")]
    CycleDetected(String),
    #[error("System role is immutable: {0}")]
    SystemRoleImmutable(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
