use chrono::Utc;
use validator::Validate;

use super::{not_found, ServiceError, ServiceResult};
use crate::{
    models::user::{UpdateUserRequest, User, UserQuery, UserResponse},
    repository::{Page, PageRequest, Query, Stores},
};

pub struct UserService {
    stores: Stores,
}

impl UserService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn load(&self, id: &str) -> ServiceResult<User> {
        self.stores
            .users
            .get(id)
            .await?
            .ok_or_else(|| not_found("User", id))
    }

    pub async fn get(&self, id: &str) -> ServiceResult<UserResponse> {
        Ok(self.load(id).await?.into())
    }

    pub async fn list(&self, filter: UserQuery) -> ServiceResult<Page<UserResponse>> {
        let query = match filter.role {
            Some(role) => Query::new().contains("roles", role),
            None => Query::new(),
        };
        let page = self
            .stores
            .users
            .find(&query, PageRequest::new(filter.page, filter.size))
            .await?;
        Ok(page.map(UserResponse::from))
    }

    /// `allow_role_change` is true only for admins; others get Forbidden when
    /// they try to touch roles.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateUserRequest,
        allow_role_change: bool,
    ) -> ServiceResult<UserResponse> {
        request.validate()?;
        let mut user = self.load(id).await?;

        if let Some(roles) = request.roles {
            if !allow_role_change {
                return Err(ServiceError::Forbidden(
                    "Only administrators can change roles".to_string(),
                ));
            }
            if roles.is_empty() {
                return Err(ServiceError::InvalidArgument(
                    "A user needs at least one role".to_string(),
                ));
            }
            user.roles = roles;
        }
        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        if request.phone.is_some() {
            user.phone = request.phone;
        }
        if request.organisation_id.is_some() {
            user.organisation_id = request.organisation_id;
        }
        user.updated_at = Utc::now();

        let user = self.stores.users.update(user).await?;
        Ok(user.into())
    }

    pub async fn deactivate(&self, id: &str) -> ServiceResult<UserResponse> {
        let mut user = self.load(id).await?;
        user.is_active = false;
        user.updated_at = Utc::now();
        let user = self.stores.users.update(user).await?;

        let tokens = self
            .stores
            .refresh_tokens
            .find_all(&Query::new().eq("user_id", &user.id))
            .await?;
        for token in tokens {
            self.stores.refresh_tokens.delete(&token.id).await?;
        }

        tracing::info!("Deactivated user {}", user.id);
        Ok(user.into())
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        if !self.stores.users.delete(id).await? {
            return Err(not_found("User", id));
        }
        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}
