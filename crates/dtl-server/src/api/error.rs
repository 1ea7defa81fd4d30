//! JSON error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use dtl_artifacts::ArtifactError;
use dtl_db::error::DatabaseError;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: &'a str,
}

/// An error as returned to API clients.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiFailure {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_json(rejection: &JsonRejection) -> Self {
        Self::new(rejection.status(), "invalid_json", rejection.body_text())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiFailure {
    fn from(err: DatabaseError) -> Self {
        match &err {
            DatabaseError::NotFound { .. } | DatabaseError::NoResult => {
                Self::new(StatusCode::NOT_FOUND, "not_found", err.to_string())
            }
            DatabaseError::Validation(message) => {
                Self::new(StatusCode::BAD_REQUEST, "validation_error", message.clone())
            }
            DatabaseError::InvalidState(message) => {
                Self::new(StatusCode::CONFLICT, "invalid_state", message.clone())
            }
            _ => {
                tracing::error!(error = %err, "request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

impl From<ArtifactError> for ApiFailure {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Database(db) => db.into(),
            ArtifactError::MissingSourceText { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_map_to_statuses() {
        let cases = [
            (DatabaseError::not_found("unit", 3), StatusCode::NOT_FOUND, "not_found"),
            (DatabaseError::NoResult, StatusCode::NOT_FOUND, "not_found"),
            (
                DatabaseError::Validation("author missing".into()),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                DatabaseError::InvalidState("already accepted".into()),
                StatusCode::CONFLICT,
                "invalid_state",
            ),
            (
                DatabaseError::Query("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];
        for (err, status, code) in cases {
            let failure = ApiFailure::from(err);
            assert_eq!(failure.status, status);
            assert_eq!(failure.code, code);
        }
    }

    #[test]
    fn missing_source_text_is_a_client_error() {
        let failure = ApiFailure::from(ArtifactError::MissingSourceText { library_id: 1 });
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_hide_details() {
        let failure = ApiFailure::from(DatabaseError::Query("secret sql".into()));
        assert!(!failure.message.contains("secret"));
    }
}
