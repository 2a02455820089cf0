use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        candidate::{
            CandidateQuery, CandidateResponse, CreateCandidateRequest, UpdateCandidateRequest,
        },
        MessageResponse,
    },
    repository::Page,
    services::candidate::CandidateService,
    utils::errors::AppError,
    AppState,
};

pub async fn create_candidate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<CandidateResponse>), AppError> {
    auth_user.require_staff()?;
    let candidate = CandidateService::new(state.stores.clone())
        .create(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub async fn list_candidates(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(filter): Query<CandidateQuery>,
) -> Result<Json<Page<CandidateResponse>>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(
        CandidateService::new(state.stores.clone())
            .list(filter)
            .await?,
    ))
}

pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<CandidateResponse>, AppError> {
    Ok(Json(CandidateService::new(state.stores.clone()).get(&id).await?))
}

pub async fn update_candidate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCandidateRequest>,
) -> Result<Json<CandidateResponse>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(
        CandidateService::new(state.stores.clone())
            .update(&id, payload)
            .await?,
    ))
}

pub async fn delete_candidate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_staff()?;
    CandidateService::new(state.stores.clone())
        .delete(&id)
        .await?;
    Ok(Json(MessageResponse::new("Candidate deleted successfully")))
}
