use axum::{
    extract::{Extension, Path, State},
    response::Json,
};

use crate::{
    middleware::auth::AuthUser,
    models::{
        dashboard::{AdminDashboard, CandidateDashboard, InterviewerDashboard, OrganisationDashboard},
        user::UserRole,
    },
    services::dashboard::DashboardService,
    utils::errors::AppError,
    AppState,
};

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<AdminDashboard>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(DashboardService::new(state.stores.clone()).admin().await?))
}

pub async fn organisation_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<OrganisationDashboard>, AppError> {
    auth_user.require_staff()?;
    Ok(Json(
        DashboardService::new(state.stores.clone())
            .organisation(&id)
            .await?,
    ))
}

pub async fn interviewer_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<InterviewerDashboard>, AppError> {
    auth_user.require_any(&[
        UserRole::Admin,
        UserRole::OrgAdmin,
        UserRole::Recruiter,
        UserRole::Interviewer,
    ])?;
    Ok(Json(
        DashboardService::new(state.stores.clone())
            .interviewer(&id)
            .await?,
    ))
}

pub async fn candidate_dashboard(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<CandidateDashboard>, AppError> {
    Ok(Json(
        DashboardService::new(state.stores.clone())
            .candidate(&id)
            .await?,
    ))
}
