use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{ServiceError, ServiceResult};
use crate::{
    config::AppConfig,
    models::{
        auth::{AuthResponse, LoginRequest, RefreshRequest, RefreshToken, RegisterRequest},
        user::{User, UserResponse, UserRole},
    },
    repository::{Query, Stores},
    utils::{
        jwt::create_jwt,
        logger::{metadata, LOGGER},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService {
    stores: Stores,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(stores: Stores, config: Arc<AppConfig>) -> Self {
        Self { stores, config }
    }

    /// Public sign-up. Admin roles are never granted here.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let roles = request
            .roles
            .clone()
            .filter(|roles| !roles.is_empty())
            .unwrap_or_else(|| BTreeSet::from([UserRole::Candidate]));
        if roles.contains(&UserRole::Admin) {
            return Err(ServiceError::Forbidden(
                "Administrator accounts can only be created by an administrator".to_string(),
            ));
        }
        let user = self.create_user(request, roles).await?;
        self.issue_tokens(user).await
    }

    /// Admin-only account creation; any role set is allowed, ADMIN by default.
    pub async fn register_admin(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        let roles = request
            .roles
            .clone()
            .filter(|roles| !roles.is_empty())
            .unwrap_or_else(|| BTreeSet::from([UserRole::Admin]));
        let user = self.create_user(request, roles).await?;
        Ok(user.into())
    }

    async fn create_user(
        &self,
        request: RegisterRequest,
        roles: BTreeSet<UserRole>,
    ) -> ServiceResult<User> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        if self
            .stores
            .users
            .exists(&Query::new().eq("email", &email))
            .await?
        {
            return Err(ServiceError::AlreadyExists(format!(
                "User with email {} already exists",
                email
            )));
        }

        let password_hash = hash(&request.password, self.config.bcrypt_cost)
            .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?;

        let now = Utc::now();
        let user = User {
            id: String::new(),
            email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            roles,
            organisation_id: request.organisation_id,
            is_active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let user = self.stores.users.insert(user).await?;
        LOGGER.log_business_event(
            "user_registered",
            Some(&user.id),
            metadata([("roles", json!(user.role_names()))]),
        );
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        let user = self
            .stores
            .users
            .find_all(&Query::new().eq("email", &email))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let is_valid = verify(&request.password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(format!("Failed to verify password: {}", e)))?;
        if !is_valid {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        if !user.is_active {
            return Err(ServiceError::Unauthorized("Account is deactivated".to_string()));
        }

        self.issue_tokens(user).await
    }

    /// Exchanges a refresh token for a new pair; the old token is consumed.
    pub async fn refresh(&self, request: RefreshRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        let stored = self
            .stores
            .refresh_tokens
            .find_all(&Query::new().eq("token", &request.refresh_token))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;

        self.stores.refresh_tokens.delete(&stored.id).await?;

        if stored.expires_at <= Utc::now() {
            return Err(ServiceError::Unauthorized("Refresh token expired".to_string()));
        }

        let user = self
            .stores
            .users
            .get(&stored.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| ServiceError::Unauthorized("Invalid refresh token".to_string()))?;

        self.issue_tokens(user).await
    }

    pub async fn logout(&self, user_id: &str) -> ServiceResult<()> {
        let tokens = self
            .stores
            .refresh_tokens
            .find_all(&Query::new().eq("user_id", user_id))
            .await?;
        for token in tokens {
            self.stores.refresh_tokens.delete(&token.id).await?;
        }
        tracing::info!("User {} logged out", user_id);
        Ok(())
    }

    async fn issue_tokens(&self, user: User) -> ServiceResult<AuthResponse> {
        let access_token = create_jwt(
            &user.id,
            &user.email,
            user.role_names(),
            &self.config.jwt_secret,
            self.config.jwt_expiration_minutes,
        )
        .map_err(|e| ServiceError::Internal(format!("Failed to create token: {}", e)))?;

        let now = Utc::now();
        let refresh = RefreshToken {
            id: String::new(),
            token: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            expires_at: now + Duration::days(self.config.refresh_token_days),
            version: 0,
            created_at: now,
        };
        let refresh = self.stores.refresh_tokens.insert(refresh).await?;

        Ok(AuthResponse {
            access_token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: self.config.jwt_expiration_minutes * 60,
            user: user.into(),
        })
    }
}
