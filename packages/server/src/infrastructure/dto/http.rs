//! HTTP API request / response DTOs.

use serde::{Deserialize, Serialize};
use yoriai_shared::time::epoch_seconds_to_rfc3339;

use crate::domain::{ChatSession, NewUser, User, UserUpdate};

/// Body of `POST /api/users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub phone: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            age: request.age,
            phone: request.phone,
        }
    }
}

/// Body of `PUT /api/users/{id}`; omitted fields stay unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub phone: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            age: request.age,
            phone: request.phone,
        }
    }
}

/// A user as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub phone: String,
    /// Unix timestamp (seconds)
    pub created_at: i64,
    /// Unix timestamp (seconds)
    pub updated_at: i64,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value(),
            name: user.name,
            email: user.email,
            age: user.age,
            phone: user.phone,
            created_at: user.created_at.value(),
            updated_at: user.updated_at.value(),
        }
    }
}

/// Response of create / get / update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserDto,
    pub message: String,
}

/// Response of delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub message: String,
}

/// Query of `GET /api/users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub page: i32,
    #[serde(default)]
    pub page_size: i32,
}

/// Response of `GET /api/users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserDto>,
    /// Number of users across all pages
    pub total: usize,
    pub message: String,
}

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Present user for the presence endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentUserDto {
    pub user_id: i64,
    pub username: String,
    pub joined_at: String, // ISO 8601
}

impl From<ChatSession> for PresentUserDto {
    fn from(session: ChatSession) -> Self {
        Self {
            user_id: session.user_id.value(),
            username: session.display_name.into_string(),
            joined_at: epoch_seconds_to_rfc3339(session.joined_at.value()),
        }
    }
}

/// Response of `GET /api/chat/presence`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceDto {
    pub online_count: usize,
    pub users: Vec<PresentUserDto>,
}
