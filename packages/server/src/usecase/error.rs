//! UseCase 層のエラー定義

use std::time::Duration;

use thiserror::Error;

use crate::domain::{RepositoryError, SessionClosed, ValueObjectError};

/// Terminal result of one chat connection's receive loop.
///
/// A clean `leave` ends the loop with `Ok(())`; everything else ends it with one of these.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The transport reported an error while receiving
    #[error("failed to receive from chat connection: {0}")]
    Receive(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The peer closed the stream without leaving
    #[error("chat connection closed by peer")]
    ConnectionClosed,

    /// Nothing arrived within the configured idle timeout
    #[error("no chat action received within {0:?}")]
    IdleTimeout(Duration),

    /// The connection's cancellation token fired (server shutdown, writer gone)
    #[error("chat connection cancelled")]
    Cancelled,

    /// A direct response to this connection could not be queued
    #[error(transparent)]
    Send(#[from] SessionClosed),

    /// An error event could not be queued before the connection joined
    #[error("chat connection writer has stopped")]
    WriterClosed,
}

/// Errors returned by the user registry use case
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserUseCaseError {
    /// A request field is missing or out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("user {0} not found")]
    NotFound(i64),

    #[error("email already exists: {0}")]
    EmailAlreadyExists(String),
}

impl From<RepositoryError> for UserUseCaseError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::UserNotFound(id) => Self::NotFound(id.value()),
            RepositoryError::EmailAlreadyExists(email) => Self::EmailAlreadyExists(email),
        }
    }
}

impl From<ValueObjectError> for UserUseCaseError {
    fn from(error: ValueObjectError) -> Self {
        Self::InvalidArgument(error.to_string())
    }
}
