//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod broadcast;
pub mod chat_connection;
pub mod error;
pub mod join_chat;
pub mod leave_chat;
pub mod list_presence;
pub mod send_message;
pub mod user_registry;

pub use broadcast::{Broadcaster, FanoutReport};
pub use chat_connection::ChatConnectionUseCase;
pub use error::{ChatError, UserUseCaseError};
pub use join_chat::JoinChatUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use list_presence::ListPresenceUseCase;
pub use send_message::SendMessageUseCase;
pub use user_registry::{ListUsersPage, UserRegistryUseCase};
