//! Repository traits.
//!
//! The domain layer owns these abstractions; the infrastructure layer provides
//! the implementations (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{ChatSession, NewUser, User, UserUpdate},
    error::RepositoryError,
    value_object::UserId,
};

/// Outcome of removing a connection's own session from the presence table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRemoval {
    /// The entry belonged to this connection and is gone now
    Removed,
    /// The user id is bound to a newer connection; nothing was removed
    Superseded,
    /// No entry for this user id
    Absent,
}

/// Presence table: which users are currently in the chat room, and how to reach them.
///
/// Every operation goes through a single guard. Implementations must never hold
/// that guard while delivering to a session; callers send on the sessions
/// returned by [`PresenceRepository::snapshot_for_fanout`] after the guard is released.
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Register `session` under its user id, replacing any previous session (last join wins).
    ///
    /// Returns the replaced session, if any.
    async fn insert(&self, session: ChatSession) -> Option<ChatSession>;

    /// Remove whatever session is registered under `user_id`, regardless of
    /// which connection owns it. Idempotent.
    ///
    /// Connection cleanup goes through [`PresenceRepository::remove_session`];
    /// this is the by-id removal for callers that do not hold a session.
    async fn remove(&self, user_id: UserId) -> Option<ChatSession>;

    /// Remove the entry for `session.user_id` only if it is bound to the same connection.
    async fn remove_session(&self, session: &ChatSession) -> SessionRemoval;

    /// Number of present users
    async fn size(&self) -> usize;

    /// Copy of every present session, taken under the guard
    async fn snapshot_for_fanout(&self) -> Vec<ChatSession>;
}

/// User registry storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user with the next sequential id.
    ///
    /// # Errors
    ///
    /// `RepositoryError::EmailAlreadyExists` if a live user already has this email
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    async fn get(&self, id: UserId) -> Result<User, RepositoryError>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `RepositoryError::UserNotFound` or `RepositoryError::EmailAlreadyExists`
    /// when the new email belongs to another user
    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, RepositoryError>;

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Users ordered by id, skipping `offset` and returning at most `limit`,
    /// together with the total number of users.
    async fn list(&self, offset: usize, limit: usize) -> (Vec<User>, usize);
}
