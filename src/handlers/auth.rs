use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest},
        user::UserResponse,
        MessageResponse,
    },
    services::auth::AuthService,
    utils::errors::AppError,
    AppState,
};

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.stores.clone(), state.config.clone())
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let auth = service(&state).register(payload).await?;
    Ok((StatusCode::CREATED, Json(auth)))
}

pub async fn register_admin(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    // Only existing admins can create new admins
    auth_user.require_admin()?;
    let user = service(&state).register_admin(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service(&state).login(payload).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service(&state).refresh(payload).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<MessageResponse>, AppError> {
    service(&state).logout(&auth_user.user_id).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}
