//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::{
        CreateUserRequest, DeleteUserResponse, ErrorResponse, ListUsersQuery, ListUsersResponse,
        PresenceDto, PresentUserDto, UpdateUserRequest, UserResponse,
    },
    ui::state::AppState,
    usecase::{ListPresenceUseCase, UserRegistryUseCase, UserUseCaseError},
};

impl IntoResponse for UserUseCaseError {
    fn into_response(self) -> Response {
        let status = match &self {
            UserUseCaseError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            UserUseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UserUseCaseError::EmailAlreadyExists(_) => StatusCode::CONFLICT,
        };
        tracing::warn!(status = %status, "User request failed: {}", self);

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for UserUseCaseError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl From<PathRejection> for UserUseCaseError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl From<QueryRejection> for UserUseCaseError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Users currently present in the chat room, ordered by user id
pub async fn get_presence(State(state): State<Arc<AppState>>) -> Json<PresenceDto> {
    let usecase = ListPresenceUseCase::new(state.presence.clone());
    let users: Vec<PresentUserDto> = usecase
        .execute()
        .await
        .into_iter()
        .map(PresentUserDto::from)
        .collect();

    Json(PresenceDto {
        online_count: users.len(),
        users,
    })
}

/// Create a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    request: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), UserUseCaseError> {
    let Json(request) = request?;
    let usecase = UserRegistryUseCase::new(state.users.clone());
    let user = usecase.create(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: user.into(),
            message: "User created successfully".to_string(),
        }),
    ))
}

/// Get a user by id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>, UserUseCaseError> {
    let Path(id) = id?;
    let usecase = UserRegistryUseCase::new(state.users.clone());
    let user = usecase.get(id).await?;

    Ok(Json(UserResponse {
        user: user.into(),
        message: "User retrieved successfully".to_string(),
    }))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    request: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, UserUseCaseError> {
    let Path(id) = id?;
    let Json(request) = request?;
    let usecase = UserRegistryUseCase::new(state.users.clone());
    let user = usecase.update(id, request.into()).await?;

    Ok(Json(UserResponse {
        user: user.into(),
        message: "User updated successfully".to_string(),
    }))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteUserResponse>, UserUseCaseError> {
    let Path(id) = id?;
    let usecase = UserRegistryUseCase::new(state.users.clone());
    usecase.delete(id).await?;

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully".to_string(),
    }))
}

/// List users page by page
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<ListUsersResponse>, UserUseCaseError> {
    let Query(query) = query?;
    let usecase = UserRegistryUseCase::new(state.users.clone());
    let page = usecase.list(query.page, query.page_size).await;

    Ok(Json(ListUsersResponse {
        users: page.users.into_iter().map(Into::into).collect(),
        total: page.total,
        message: format!("Retrieved {} users", page.total),
    }))
}
