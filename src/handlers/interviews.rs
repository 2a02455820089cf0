use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        interview::{
            ConfirmInterviewRequest, CreateNextRoundRequest, InterviewQuery, InterviewResponse,
            MarkInterviewResultRequest, ScheduleInterviewRequest, UpdateInterviewRequest,
            UpdateInterviewStatusRequest,
        },
        user::UserRole,
    },
    repository::Page,
    services::interview::InterviewService,
    utils::errors::AppError,
    AppState,
};

fn service(state: &AppState) -> InterviewService {
    InterviewService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<ScheduleInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewResponse>), AppError> {
    auth_user.require_staff()?;
    let interview = service(&state).schedule(payload).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Query(filter): Query<InterviewQuery>,
) -> Result<Json<Page<InterviewResponse>>, AppError> {
    Ok(Json(service(&state).list(filter).await?))
}

pub async fn get_interview(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<InterviewResponse>, AppError> {
    Ok(Json(service(&state).get(&id).await?))
}

pub async fn update_interview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(service(&state).update_details(&id, payload).await?))
}

pub async fn update_interview_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInterviewStatusRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(service(&state).update_status(&id, payload).await?))
}

pub async fn confirm_interview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<ConfirmInterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    auth_user.require_any(&[
        UserRole::Candidate,
        UserRole::Admin,
        UserRole::OrgAdmin,
        UserRole::Recruiter,
    ])?;
    Ok(Json(service(&state).confirm(&id, payload).await?))
}

pub async fn mark_interview_result(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<MarkInterviewResultRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(service(&state).mark_result(&id, payload).await?))
}

pub async fn create_next_round(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<CreateNextRoundRequest>,
) -> Result<(StatusCode, Json<InterviewResponse>), AppError> {
    auth_user.require_staff()?;
    let next = service(&state).create_next_round(&id, payload).await?;
    Ok((StatusCode::CREATED, Json(next)))
}

pub async fn request_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<InterviewResponse>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(service(&state).request_feedback(&id).await?))
}

pub async fn cancel_interview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<InterviewResponse>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(service(&state).cancel(&id).await?))
}
