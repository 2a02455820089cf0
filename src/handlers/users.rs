use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        user::{UpdateUserRequest, UserQuery, UserResponse},
        MessageResponse,
    },
    repository::Page,
    services::user::UserService,
    utils::errors::AppError,
    AppState,
};

pub async fn current_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(
        UserService::new(state.stores.clone())
            .get(&auth_user.user_id)
            .await?,
    ))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(filter): Query<UserQuery>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(UserService::new(state.stores.clone()).list(filter).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_self_or_admin(&id)?;
    Ok(Json(UserService::new(state.stores.clone()).get(&id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_self_or_admin(&id)?;
    Ok(Json(
        UserService::new(state.stores.clone())
            .update(&id, payload, auth_user.is_admin())
            .await?,
    ))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(
        UserService::new(state.stores.clone())
            .deactivate(&id)
            .await?,
    ))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_admin()?;
    UserService::new(state.stores.clone()).delete(&id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
