use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};

use crate::{
    handlers::{
        auth, candidates, dashboard, feedback, health, interviewers, interviews, organisations,
        users,
    },
    middleware::auth::auth_middleware,
    AppState,
};

/// Full API router. Layers that depend on deployment (CORS, body limit, tracing)
/// are added by `main`.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/admin/register", post(auth::register_admin))
        .route(
            "/interviews",
            get(interviews::list_interviews).post(interviews::schedule_interview),
        )
        .route(
            "/interviews/:id",
            get(interviews::get_interview)
                .put(interviews::update_interview)
                .delete(interviews::cancel_interview),
        )
        .route(
            "/interviews/:id/status",
            patch(interviews::update_interview_status),
        )
        .route("/interviews/:id/confirm", post(interviews::confirm_interview))
        .route("/interviews/:id/result", post(interviews::mark_interview_result))
        .route("/interviews/:id/next-round", post(interviews::create_next_round))
        .route(
            "/interviews/:id/request-feedback",
            post(interviews::request_feedback),
        )
        .route(
            "/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route(
            "/candidates/:id",
            get(candidates::get_candidate)
                .put(candidates::update_candidate)
                .delete(candidates::delete_candidate),
        )
        .route(
            "/interviewers",
            get(interviewers::list_interviewers).post(interviewers::create_interviewer),
        )
        .route(
            "/interviewers/:id",
            get(interviewers::get_interviewer)
                .put(interviewers::update_interviewer)
                .delete(interviewers::delete_interviewer),
        )
        .route(
            "/organisations",
            get(organisations::list_organisations).post(organisations::create_organisation),
        )
        .route(
            "/organisations/:id",
            get(organisations::get_organisation)
                .put(organisations::update_organisation)
                .delete(organisations::delete_organisation),
        )
        .route(
            "/organisations/:id/verify",
            put(organisations::verify_organisation),
        )
        .route(
            "/organisations/:id/reject",
            put(organisations::reject_organisation),
        )
        .route(
            "/feedback",
            get(feedback::list_feedback).post(feedback::submit_feedback),
        )
        .route(
            "/feedback/:id",
            get(feedback::get_feedback)
                .put(feedback::update_feedback)
                .delete(feedback::delete_feedback),
        )
        .route("/users", get(users::list_users))
        .route("/users/me", get(users::current_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/deactivate", post(users::deactivate_user))
        .route("/dashboard/admin", get(dashboard::admin_dashboard))
        .route(
            "/dashboard/organisation/:id",
            get(dashboard::organisation_dashboard),
        )
        .route(
            "/dashboard/interviewer/:id",
            get(dashboard::interviewer_dashboard),
        )
        .route(
            "/dashboard/candidate/:id",
            get(dashboard::candidate_dashboard),
        )
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", public_routes.merge(protected_routes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        config::{AppConfig, StorageBackend},
        repository::Stores,
        services::notification::LoggingNotifier,
        utils::jwt::create_jwt,
    };

    fn test_state() -> AppState {
        AppState {
            stores: Stores::in_memory(),
            notifier: Arc::new(LoggingNotifier),
            config: Arc::new(AppConfig {
                storage: StorageBackend::Memory,
                database_url: None,
                database_max_connections: 1,
                jwt_secret: "test-secret".to_string(),
                jwt_expiration_minutes: 15,
                refresh_token_days: 7,
                bcrypt_cost: 4,
                cors_allowed_origin: "*".to_string(),
                bind_address: "127.0.0.1:0".to_string(),
                reminder_cron: "0 0 9 * * *".to_string(),
                max_request_body_mb: 1,
            }),
        }
    }

    fn token(role: &str) -> String {
        create_jwt(
            "user-1",
            "recruiter@example.com",
            vec![role.to_string()],
            "test-secret",
            15,
        )
        .expect("token")
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(bearer) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        app.clone().oneshot(request).await.expect("response")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    /// Creates a candidate and an interviewer through the API and schedules a
    /// round-one video interview between them.
    async fn schedule_through_api(app: &Router, bearer: &str) -> Value {
        let candidate = send(
            app,
            Method::POST,
            "/api/v1/candidates",
            Some(bearer),
            Some(json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "skills": ["rust"]
            })),
        )
        .await;
        assert_eq!(candidate.status(), StatusCode::CREATED);
        let candidate = json_body(candidate).await;

        let interviewer = send(
            app,
            Method::POST,
            "/api/v1/interviewers",
            Some(bearer),
            Some(json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "email": "grace@example.com",
                "expertise": ["rust"]
            })),
        )
        .await;
        assert_eq!(interviewer.status(), StatusCode::CREATED);
        let interviewer = json_body(interviewer).await;

        let interview = send(
            app,
            Method::POST,
            "/api/v1/interviews",
            Some(bearer),
            Some(json!({
                "organisation_id": "org-1",
                "candidate_id": candidate["id"],
                "interviewer_ids": [interviewer["id"]],
                "scheduled_at": "2030-01-15T10:00:00Z",
                "interview_type": "VIDEO",
                "round": 1
            })),
        )
        .await;
        assert_eq!(interview.status(), StatusCode::CREATED);
        json_body(interview).await
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_router(test_state());
        let response = send(&app, Method::GET, "/health", None, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "UP");
        assert_eq!(body["store"], "reachable");
    }

    #[tokio::test]
    async fn protected_routes_require_a_bearer_token() {
        let app = build_router(test_state());

        let missing = send(&app, Method::GET, "/api/v1/interviews", None, None).await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let forged = create_jwt("user-1", "x@example.com", vec!["ADMIN".into()], "other", 15)
            .expect("token");
        let rejected = send(&app, Method::GET, "/api/v1/interviews", Some(&forged), None).await;
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn schedule_returns_created_interview() {
        let app = build_router(test_state());
        let interview = schedule_through_api(&app, &token("RECRUITER")).await;

        assert_eq!(interview["status"], "SCHEDULED");
        assert_eq!(interview["round"], 1);
        assert_eq!(interview["duration"], 60);
    }

    #[tokio::test]
    async fn candidates_cannot_schedule() {
        let app = build_router(test_state());
        let response = send(
            &app,
            Method::POST,
            "/api/v1/interviews",
            Some(&token("CANDIDATE")),
            Some(json!({
                "organisation_id": "org-1",
                "candidate_id": "c-1",
                "interviewer_ids": ["i-1"],
                "scheduled_at": "2030-01-15T10:00:00Z",
                "interview_type": "VIDEO",
                "round": 1
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_result_is_a_bad_request() {
        let app = build_router(test_state());
        let bearer = token("RECRUITER");
        let interview = schedule_through_api(&app, &bearer).await;
        let uri = format!("/api/v1/interviews/{}/result", interview["id"].as_str().unwrap());

        let response = send(
            &app,
            Method::POST,
            &uri,
            Some(&bearer),
            Some(json!({ "result": "BOGUS" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let fetched = send(
            &app,
            Method::GET,
            &format!("/api/v1/interviews/{}", interview["id"].as_str().unwrap()),
            Some(&bearer),
            None,
        )
        .await;
        assert_eq!(json_body(fetched).await["status"], "SCHEDULED");
    }

    #[tokio::test]
    async fn status_patch_rejects_illegal_transition() {
        let app = build_router(test_state());
        let bearer = token("RECRUITER");
        let interview = schedule_through_api(&app, &bearer).await;
        let id = interview["id"].as_str().unwrap().to_string();

        let cancelled = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/interviews/{}", id),
            Some(&bearer),
            None,
        )
        .await;
        assert_eq!(cancelled.status(), StatusCode::OK);
        assert_eq!(json_body(cancelled).await["status"], "CANCELLED");

        let reopened = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/interviews/{}/status", id),
            Some(&bearer),
            Some(json!({ "status": "SCHEDULED" })),
        )
        .await;
        assert_eq!(reopened.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn admin_verifies_organisation_with_put() {
        let app = build_router(test_state());
        let admin = token("ADMIN");
        let created = send(
            &app,
            Method::POST,
            "/api/v1/organisations",
            Some(&admin),
            Some(json!({ "name": "Acme Hiring", "contact_email": "hr@acme.example" })),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = json_body(created).await;
        assert_eq!(created["verification_status"], "PENDING");
        let uri = format!(
            "/api/v1/organisations/{}/verify",
            created["id"].as_str().unwrap()
        );

        let via_post = send(&app, Method::POST, &uri, Some(&admin), None).await;
        assert_eq!(via_post.status(), StatusCode::METHOD_NOT_ALLOWED);

        let by_recruiter = send(&app, Method::PUT, &uri, Some(&token("RECRUITER")), None).await;
        assert_eq!(by_recruiter.status(), StatusCode::FORBIDDEN);

        let verified = send(&app, Method::PUT, &uri, Some(&admin), None).await;
        assert_eq!(verified.status(), StatusCode::OK);
        let verified = json_body(verified).await;
        assert_eq!(verified["verification_status"], "VERIFIED");
        assert_eq!(verified["is_active"], true);
    }

    #[tokio::test]
    async fn missing_interview_is_not_found() {
        let app = build_router(test_state());
        let response = send(
            &app,
            Method::GET,
            "/api/v1/interviews/does-not-exist",
            Some(&token("RECRUITER")),
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn register_then_login_issues_tokens() {
        let app = build_router(test_state());
        let registered = send(
            &app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": "new@example.com",
                "password": "correct-horse",
                "first_name": "New",
                "last_name": "User"
            })),
        )
        .await;
        assert_eq!(registered.status(), StatusCode::CREATED);

        let login = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "new@example.com", "password": "correct-horse" })),
        )
        .await;
        assert_eq!(login.status(), StatusCode::OK);
        let body = json_body(login).await;
        let access = body["access_token"].as_str().expect("access token").to_string();

        let me = send(&app, Method::GET, "/api/v1/users/me", Some(&access), None).await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(json_body(me).await["email"], "new@example.com");
    }
}
