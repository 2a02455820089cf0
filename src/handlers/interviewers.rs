use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        interviewer::{
            CreateInterviewerRequest, InterviewerQuery, InterviewerResponse,
            UpdateInterviewerRequest,
        },
        user::UserRole,
        MessageResponse,
    },
    repository::Page,
    services::interviewer::InterviewerService,
    utils::errors::AppError,
    AppState,
};

pub async fn create_interviewer(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateInterviewerRequest>,
) -> Result<(StatusCode, Json<InterviewerResponse>), AppError> {
    auth_user.require_staff()?;
    let interviewer = InterviewerService::new(state.stores.clone())
        .create(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(interviewer)))
}

pub async fn list_interviewers(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Query(filter): Query<InterviewerQuery>,
) -> Result<Json<Page<InterviewerResponse>>, AppError> {
    Ok(Json(
        InterviewerService::new(state.stores.clone())
            .list(filter)
            .await?,
    ))
}

pub async fn get_interviewer(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<InterviewerResponse>, AppError> {
    Ok(Json(
        InterviewerService::new(state.stores.clone())
            .get(&id)
            .await?,
    ))
}

pub async fn update_interviewer(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInterviewerRequest>,
) -> Result<Json<InterviewerResponse>, AppError> {
    auth_user.require_any(&[
        UserRole::Admin,
        UserRole::OrgAdmin,
        UserRole::Recruiter,
        UserRole::Interviewer,
    ])?;
    Ok(Json(
        InterviewerService::new(state.stores.clone())
            .update(&id, payload)
            .await?,
    ))
}

pub async fn delete_interviewer(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_staff()?;
    InterviewerService::new(state.stores.clone())
        .delete(&id)
        .await?;
    Ok(Json(MessageResponse::new("Interviewer deleted successfully")))
}
