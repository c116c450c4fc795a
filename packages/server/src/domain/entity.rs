//! Core domain models for the chat application.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use super::{
    error::SessionClosed,
    value_object::{ConnectionId, DisplayName, Timestamp, UserId},
};

/// Sender id used for system-authored events.
pub const SYSTEM_SENDER_ID: i64 = 0;

/// Sender name used for system-authored events.
pub const SYSTEM_SENDER_NAME: &str = "System";

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across live users
    pub email: String,
    pub age: i32,
    pub phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for a user that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub phone: String,
}

/// Partial update of a user; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
}

impl User {
    /// Apply a partial update and refresh `updated_at`.
    pub fn apply(&mut self, update: UserUpdate, now: Timestamp) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        self.updated_at = now;
    }
}

/// Kind of an outbound chat event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    System,
    Join,
    Leave,
    Text,
}

/// Status attached to every outbound response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Direct acknowledgement of this connection's join
    Joined,
    /// Fan-out event
    Broadcast,
    /// Protocol misuse reported to the offending connection
    Error,
}

/// A chat event as delivered to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// `0` for system events
    pub sender_user_id: i64,
    pub sender_name: String,
    pub content: String,
    pub timestamp: Timestamp,
    pub kind: EventKind,
}

impl ChatEvent {
    /// Create a system-authored event
    pub fn system(content: String, timestamp: Timestamp) -> Self {
        Self {
            sender_user_id: SYSTEM_SENDER_ID,
            sender_name: SYSTEM_SENDER_NAME.to_string(),
            content,
            timestamp,
            kind: EventKind::System,
        }
    }

    /// Create an event authored by a present user
    pub fn from_user(
        user_id: UserId,
        name: &DisplayName,
        content: String,
        timestamp: Timestamp,
        kind: EventKind,
    ) -> Self {
        Self {
            sender_user_id: user_id.value(),
            sender_name: name.as_str().to_string(),
            content,
            timestamp,
            kind,
        }
    }
}

/// Envelope pushed onto a session's outbound queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub message: ChatEvent,
    pub status: ResponseStatus,
    /// Presence table size when this response was built
    pub online_count: i32,
}

impl ChatResponse {
    pub fn new(message: ChatEvent, status: ResponseStatus, online_count: usize) -> Self {
        Self {
            message,
            status,
            online_count: i32::try_from(online_count).unwrap_or(i32::MAX),
        }
    }
}

/// Inbound action on a chat connection.
///
/// Each kind carries only the fields it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Join { user_id: i64, username: String },
    Message { content: String },
    Leave,
    /// Any kind this server does not understand; ignored by the engine
    Unknown { kind: String },
}

impl ChatAction {
    /// Wire name of the action kind
    pub fn kind(&self) -> &str {
        match self {
            Self::Join { .. } => "join",
            Self::Message { .. } => "message",
            Self::Leave => "leave",
            Self::Unknown { kind } => kind,
        }
    }
}

/// Thread-safe send capability for one connection.
///
/// Backed by an unbounded queue drained by the connection's own writer task.
/// Any task may call [`SessionSender::send`]; the queue serializes concurrent
/// callers and preserves per-connection FIFO order.
#[derive(Debug, Clone)]
pub struct SessionSender {
    tx: UnboundedSender<ChatResponse>,
}

impl SessionSender {
    pub fn new(tx: UnboundedSender<ChatResponse>) -> Self {
        Self { tx }
    }

    /// Queue a response. Fails once the connection's writer has stopped.
    pub fn send(&self, response: ChatResponse) -> Result<(), ChatResponse> {
        self.tx.send(response).map_err(|e| e.0)
    }
}

/// Live binding between a present user and the connection used to reach them
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
    sender: SessionSender,
}

impl ChatSession {
    pub fn new(
        connection_id: ConnectionId,
        user_id: UserId,
        display_name: DisplayName,
        joined_at: Timestamp,
        sender: SessionSender,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            display_name,
            joined_at,
            sender,
        }
    }

    /// Push a response to this session's connection.
    pub fn send(&self, response: ChatResponse) -> Result<(), SessionClosed> {
        self.sender.send(response).map_err(|_| SessionClosed {
            user_id: self.user_id,
        })
    }

    /// Whether both sessions are bound to the same physical connection
    pub fn same_connection(&self, other: &ChatSession) -> bool {
        self.connection_id == other.connection_id
    }
}
