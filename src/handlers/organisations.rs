use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        organisation::{
            CreateOrganisationRequest, OrganisationQuery, OrganisationResponse,
            RejectOrganisationRequest, UpdateOrganisationRequest,
        },
        user::UserRole,
        MessageResponse,
    },
    repository::Page,
    services::organisation::OrganisationService,
    utils::errors::AppError,
    AppState,
};

fn service(state: &AppState) -> OrganisationService {
    OrganisationService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn create_organisation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateOrganisationRequest>,
) -> Result<(StatusCode, Json<OrganisationResponse>), AppError> {
    auth_user.require_any(&[UserRole::Admin, UserRole::OrgAdmin])?;
    let organisation = service(&state).create(payload).await?;
    Ok((StatusCode::CREATED, Json(organisation)))
}

pub async fn list_organisations(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Query(filter): Query<OrganisationQuery>,
) -> Result<Json<Page<OrganisationResponse>>, AppError> {
    Ok(Json(service(&state).list(filter).await?))
}

pub async fn get_organisation(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<OrganisationResponse>, AppError> {
    Ok(Json(service(&state).get(&id).await?))
}

pub async fn update_organisation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrganisationRequest>,
) -> Result<Json<OrganisationResponse>, AppError> {
    auth_user.require_any(&[UserRole::Admin, UserRole::OrgAdmin])?;
    Ok(Json(service(&state).update(&id, payload).await?))
}

pub async fn verify_organisation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<OrganisationResponse>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(service(&state).verify(&id).await?))
}

pub async fn reject_organisation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<RejectOrganisationRequest>,
) -> Result<Json<OrganisationResponse>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(service(&state).reject(&id, payload.reason).await?))
}

pub async fn delete_organisation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_admin()?;
    service(&state).delete(&id).await?;
    Ok(Json(MessageResponse::new("Organisation deleted successfully")))
}
