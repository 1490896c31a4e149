use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy surfaced to clients.
///
/// Persistence and hashing internals never reach the response body: they are
/// logged and collapsed into `Internal`, which renders a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    DuplicateIdentity(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DuplicateIdentity(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return ApiError::NotFound("Not found".into());
        }
        if let sqlx::Error::Database(db) = &e {
            // 23505 = unique_violation; the (email, role) index is the
            // authoritative duplicate-identity guard
            if db.code().as_deref() == Some("23505") {
                return ApiError::DuplicateIdentity("Email already exists".into());
            }
        }
        ApiError::Internal(e.into())
    }
}

/// `{ "success": false, "message": ... }` envelope used for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!(error = %source, "request failed");
        }
        let body = ErrorBody {
            success: false,
            message: self.client_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_hides_internal_details() {
        let err = ApiError::Internal(anyhow::anyhow!("pg: connection refused on 10.0.0.3"));
        let msg = err.client_message();
        assert_eq!(msg, "Internal server error");
        assert!(!msg.contains("10.0.0.3"));
    }

    #[test]
    fn service_authored_messages_pass_through() {
        let err = ApiError::DuplicateIdentity("Email already exists".into());
        assert_eq!(err.client_message(), "Email already exists");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn unique_violation_maps_to_duplicate_identity() {
        // RowNotFound is the only sqlx variant constructible without a live DB
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn envelope_serializes_with_success_false() {
        let body = ErrorBody {
            success: false,
            message: "User not found".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "User not found");
    }
}
