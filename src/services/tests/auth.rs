use std::collections::BTreeSet;

use chrono::{Duration, Utc};

use super::common::*;
use crate::models::auth::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::models::user::{UpdateUserRequest, UserQuery, UserRole};
use crate::repository::{Query, Stores};
use crate::services::auth::AuthService;
use crate::services::user::UserService;
use crate::services::ServiceError;
use crate::utils::jwt::verify_jwt;

fn register_request(email: &str, roles: Option<&[UserRole]>) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: "correct horse battery".to_string(),
        first_name: "Margaret".to_string(),
        last_name: "Hamilton".to_string(),
        phone: None,
        roles: roles.map(|roles| roles.iter().copied().collect()),
        organisation_id: None,
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_issues_tokens_with_roles() {
    let service = AuthService::new(Stores::in_memory(), test_config());

    let auth = service
        .register(register_request("margaret@example.com", Some(&[UserRole::Recruiter])))
        .await
        .expect("register");

    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, 15 * 60);
    let claims = verify_jwt(&auth.access_token, "test-secret").expect("valid token");
    assert_eq!(claims.sub, auth.user.id);
    assert_eq!(claims.roles, vec!["RECRUITER".to_string()]);
}

#[tokio::test]
async fn register_defaults_to_candidate_and_refuses_admin() {
    let service = AuthService::new(Stores::in_memory(), test_config());

    let auth = service
        .register(register_request("margaret@example.com", None))
        .await
        .expect("register");
    assert_eq!(auth.user.roles, BTreeSet::from([UserRole::Candidate]));

    let admin = service
        .register(register_request("root@example.com", Some(&[UserRole::Admin])))
        .await;
    assert!(matches!(admin, Err(ServiceError::Forbidden(_))));

    let duplicate = service
        .register(register_request("Margaret@Example.com", None))
        .await;
    assert!(matches!(duplicate, Err(ServiceError::AlreadyExists(_))));
}

#[tokio::test]
async fn admin_registration_defaults_to_admin_role() {
    let service = AuthService::new(Stores::in_memory(), test_config());
    let user = service
        .register_admin(register_request("root@example.com", None))
        .await
        .expect("register admin");
    assert_eq!(user.roles, BTreeSet::from([UserRole::Admin]));
}

#[tokio::test]
async fn login_rejects_bad_password_and_inactive_accounts() {
    let stores = Stores::in_memory();
    let service = AuthService::new(stores.clone(), test_config());
    let auth = service
        .register(register_request("margaret@example.com", None))
        .await
        .unwrap();

    service
        .login(login("margaret@example.com", "correct horse battery"))
        .await
        .expect("login");
    assert!(matches!(
        service.login(login("margaret@example.com", "wrong")).await,
        Err(ServiceError::Unauthorized(_))
    ));
    assert!(matches!(
        service.login(login("nobody@example.com", "whatever")).await,
        Err(ServiceError::Unauthorized(_))
    ));

    UserService::new(stores.clone())
        .deactivate(&auth.user.id)
        .await
        .unwrap();
    assert!(matches!(
        service
            .login(login("margaret@example.com", "correct horse battery"))
            .await,
        Err(ServiceError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn refresh_rotates_token() {
    let stores = Stores::in_memory();
    let service = AuthService::new(stores.clone(), test_config());
    let auth = service
        .register(register_request("margaret@example.com", None))
        .await
        .unwrap();

    let refreshed = service
        .refresh(RefreshRequest {
            refresh_token: auth.refresh_token.clone(),
        })
        .await
        .expect("refresh");
    assert_ne!(refreshed.refresh_token, auth.refresh_token);

    let replay = service
        .refresh(RefreshRequest {
            refresh_token: auth.refresh_token,
        })
        .await;
    assert!(matches!(replay, Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() {
    let stores = Stores::in_memory();
    let service = AuthService::new(stores.clone(), test_config());
    let auth = service
        .register(register_request("margaret@example.com", None))
        .await
        .unwrap();

    let mut stored = stores
        .refresh_tokens
        .find_all(&Query::new().eq("token", &auth.refresh_token))
        .await
        .unwrap()
        .remove(0);
    stored.expires_at = Utc::now() - Duration::minutes(1);
    stores.refresh_tokens.update(stored).await.unwrap();

    let result = service
        .refresh(RefreshRequest {
            refresh_token: auth.refresh_token,
        })
        .await;
    assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn logout_drops_refresh_tokens() {
    let stores = Stores::in_memory();
    let service = AuthService::new(stores.clone(), test_config());
    let auth = service
        .register(register_request("margaret@example.com", None))
        .await
        .unwrap();
    service
        .login(login("margaret@example.com", "correct horse battery"))
        .await
        .unwrap();

    service.logout(&auth.user.id).await.expect("logout");

    assert_eq!(
        stores
            .refresh_tokens
            .count(&Query::new().eq("user_id", &auth.user.id))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn only_admins_change_roles() {
    let stores = Stores::in_memory();
    let auth = AuthService::new(stores.clone(), test_config())
        .register(register_request("margaret@example.com", None))
        .await
        .unwrap();
    let users = UserService::new(stores.clone());

    let promote = UpdateUserRequest {
        roles: Some(BTreeSet::from([UserRole::Recruiter])),
        ..Default::default()
    };
    assert!(matches!(
        users.update(&auth.user.id, promote.clone(), false).await,
        Err(ServiceError::Forbidden(_))
    ));
    let promoted = users
        .update(&auth.user.id, promote, true)
        .await
        .expect("admin update");
    assert!(promoted.roles.contains(&UserRole::Recruiter));

    let recruiters = users
        .list(UserQuery {
            role: Some(UserRole::Recruiter),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(recruiters.total_elements, 1);
}
