use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::{repository::RepositoryError, services::ServiceError, utils::logger::LOGGER};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub enum AppError {
    ValidationError(HashMap<String, Vec<String>>),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    BadRequest(String),
    InternalServerError(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.parts();

        let (message, details) = match self {
            AppError::ValidationError(errors) => ("Validation failed".to_string(), Some(errors)),
            AppError::InternalServerError(internal) => {
                // Internals go to the log, never to the client.
                let mut context = HashMap::new();
                context.insert(
                    "status_code".to_string(),
                    serde_json::Value::Number(status.as_u16().into()),
                );
                LOGGER.log_error(&internal, context);
                ("An unexpected error occurred".to_string(), None)
            }
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => (msg, None),
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
            timestamp: Utc::now(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut error_map = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
                })
                .collect();
            error_map.insert(field.to_string(), messages);
        }

        AppError::ValidationError(error_map)
    }
}

impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::AlreadyExists(msg) | ServiceError::Conflict(msg) => {
                AppError::Conflict(msg)
            }
            ServiceError::InvalidArgument(msg) => AppError::BadRequest(msg),
            ServiceError::Unauthorized(msg) => AppError::Unauthorized(msg),
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::Validation(errors) => AppError::from(errors),
            ServiceError::Repository(err) => AppError::from(err),
            ServiceError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepositoryError::Duplicate | RepositoryError::VersionConflict { .. } => {
                AppError::Conflict(error.to_string())
            }
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json body")
    }

    #[tokio::test]
    async fn service_errors_map_to_fixed_statuses() {
        let cases = [
            (ServiceError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ServiceError::AlreadyExists("dup".into()), StatusCode::CONFLICT),
            (ServiceError::Conflict("stale".into()), StatusCode::CONFLICT),
            (ServiceError::InvalidArgument("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("no".into()), StatusCode::FORBIDDEN),
        ];

        for (error, expected) in cases {
            let response = AppError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let response =
            AppError::from(ServiceError::Internal("pool timed out on 10.0.0.3".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn not_found_carries_single_message() {
        let response = AppError::NotFound("Interview not found".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "Interview not found");
        assert!(body.get("details").is_none());
    }
}
