//! WebSocket message DTOs for the chat protocol.
//!
//! Every frame is a JSON text message. Clients send [`ChatRequest`]; the server
//! answers with [`ChatResponseDto`].

use serde::{Deserialize, Serialize};

use crate::domain::{ChatAction, ChatEvent, ChatResponse, EventKind, ResponseStatus};

/// Inbound action frame
///
/// Only `kind` is required; each kind reads the fields it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub kind: String,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub content: String,
}

impl From<ChatRequest> for ChatAction {
    fn from(request: ChatRequest) -> Self {
        match request.kind.as_str() {
            "join" => ChatAction::Join {
                user_id: request.user_id,
                username: request.username,
            },
            "message" => ChatAction::Message {
                content: request.content,
            },
            "leave" => ChatAction::Leave,
            _ => ChatAction::Unknown { kind: request.kind },
        }
    }
}

/// Chat event as sent to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageDto {
    /// `0` for system events
    pub sender_user_id: i64,
    pub sender_name: String,
    pub content: String,
    /// Unix timestamp (seconds since epoch)
    pub timestamp: i64,
    pub kind: EventKind,
}

impl From<ChatEvent> for ChatMessageDto {
    fn from(event: ChatEvent) -> Self {
        Self {
            sender_user_id: event.sender_user_id,
            sender_name: event.sender_name,
            content: event.content,
            timestamp: event.timestamp.value(),
            kind: event.kind,
        }
    }
}

/// Outbound frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponseDto {
    pub message: ChatMessageDto,
    pub status: ResponseStatus,
    pub online_count: i32,
}

impl From<ChatResponse> for ChatResponseDto {
    fn from(response: ChatResponse) -> Self {
        Self {
            message: response.message.into(),
            status: response.status,
            online_count: response.online_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    #[test]
    fn test_join_request_to_action() {
        // テスト項目: join フレームが ChatAction::Join に変換される
        // given (前提条件):
        let json = r#"{"kind":"join","user_id":1,"username":"alice"}"#;

        // when (操作):
        let request: ChatRequest = serde_json::from_str(json).unwrap();
        let action = ChatAction::from(request);

        // then (期待する結果):
        assert_eq!(
            action,
            ChatAction::Join {
                user_id: 1,
                username: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_missing_fields_default() {
        // テスト項目: kind 以外のフィールドは省略可能
        // given (前提条件):
        let json = r#"{"kind":"message"}"#;

        // when (操作):
        let request: ChatRequest = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            ChatAction::from(request),
            ChatAction::Message {
                content: String::new()
            }
        );
    }

    #[test]
    fn test_unknown_kind() {
        // テスト項目: 不明な kind は ChatAction::Unknown になる
        // given (前提条件):
        let json = r#"{"kind":"typing","content":"..."}"#;

        // when (操作):
        let request: ChatRequest = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            ChatAction::from(request),
            ChatAction::Unknown {
                kind: "typing".to_string()
            }
        );
    }

    #[test]
    fn test_response_serialization() {
        // テスト項目: 応答は status / kind が小文字で、ネストした message を持つ JSON になる
        // given (前提条件):
        let event = ChatEvent::system("Welcome alice to the chat room!".to_string(), Timestamp::new(42));
        let response = ChatResponse::new(event, ResponseStatus::Joined, 1);

        // when (操作):
        let value = serde_json::to_value(ChatResponseDto::from(response)).unwrap();

        // then (期待する結果):
        assert_eq!(value["status"], "joined");
        assert_eq!(value["online_count"], 1);
        assert_eq!(value["message"]["kind"], "system");
        assert_eq!(value["message"]["sender_user_id"], 0);
        assert_eq!(value["message"]["sender_name"], "System");
        assert_eq!(value["message"]["timestamp"], 42);
    }
}
