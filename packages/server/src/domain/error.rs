//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::UserId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId must be positive (0 is reserved for system messages)
    #[error("UserId must be greater than 0 (got {0})")]
    UserIdNotPositive(i64),

    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },
}

/// Errors returned by repositories
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No user is registered under the given id
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Another live user already uses this email
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),
}

/// The connection behind a chat session is gone; its outbound queue no longer drains.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("chat session for user {user_id} is closed")]
pub struct SessionClosed {
    pub user_id: UserId,
}
