use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        feedback::{FeedbackQuery, FeedbackResponse, SubmitFeedbackRequest, UpdateFeedbackRequest},
        user::UserRole,
        MessageResponse,
    },
    repository::Page,
    services::feedback::FeedbackService,
    utils::errors::AppError,
    AppState,
};

const FEEDBACK_ROLES: [UserRole; 4] = [
    UserRole::Admin,
    UserRole::OrgAdmin,
    UserRole::Recruiter,
    UserRole::Interviewer,
];

pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    auth_user.require_any(&FEEDBACK_ROLES)?;
    let feedback = FeedbackService::new(state.stores.clone())
        .submit(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(filter): Query<FeedbackQuery>,
) -> Result<Json<Page<FeedbackResponse>>, AppError> {
    auth_user.require_any(&FEEDBACK_ROLES)?;
    Ok(Json(
        FeedbackService::new(state.stores.clone())
            .list(filter)
            .await?,
    ))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<FeedbackResponse>, AppError> {
    auth_user.require_any(&FEEDBACK_ROLES)?;
    Ok(Json(FeedbackService::new(state.stores.clone()).get(&id).await?))
}

pub async fn update_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    auth_user.require_any(&FEEDBACK_ROLES)?;
    Ok(Json(
        FeedbackService::new(state.stores.clone())
            .update(&id, payload)
            .await?,
    ))
}

pub async fn delete_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_staff()?;
    FeedbackService::new(state.stores.clone())
        .delete(&id)
        .await?;
    Ok(Json(MessageResponse::new("Feedback deleted successfully")))
}
