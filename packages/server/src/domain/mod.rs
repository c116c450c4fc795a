//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatAction, ChatEvent, ChatResponse, ChatSession, EventKind, NewUser, ResponseStatus,
    SessionSender, User, UserUpdate,
};
pub use error::{RepositoryError, SessionClosed, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{PresenceRepository, SessionRemoval, UserRepository};
#[cfg(test)]
pub use repository::MockUserRepository;
pub use value_object::{ConnectionId, DisplayName, Timestamp, UserId};
