use crate::{
    models::user::UserRole,
    utils::{errors::AppError, jwt::verify_jwt},
    AppState,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub roles: BTreeSet<UserRole>,
}

impl AuthUser {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    pub fn is_staff(&self) -> bool {
        self.roles.iter().any(|role| role.is_staff())
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Administrator access required".to_string()))
        }
    }

    /// ADMIN, ORG_ADMIN or RECRUITER.
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Recruiter or organisation admin access required".to_string(),
            ))
        }
    }

    pub fn require_any(&self, roles: &[UserRole]) -> Result<(), AppError> {
        if roles.iter().any(|role| self.has_role(*role)) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Insufficient permissions".to_string()))
        }
    }

    /// The user themself or an admin.
    pub fn require_self_or_admin(&self, user_id: &str) -> Result<(), AppError> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Insufficient permissions".to_string()))
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let unauthorized = || AppError::Unauthorized("Missing or invalid bearer token".to_string());

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(unauthorized)?;

    let claims = verify_jwt(token, &state.config.jwt_secret).map_err(|_| unauthorized())?;

    // Unknown role names in an otherwise valid token are dropped.
    let roles = claims
        .roles
        .iter()
        .filter_map(|role| role.parse::<UserRole>().ok())
        .collect();

    let auth_user = AuthUser {
        user_id: claims.sub,
        email: claims.email,
        roles,
    };

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}
