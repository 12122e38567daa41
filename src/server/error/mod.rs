//! Error types and HTTP response handling.
//!
//! `AppError` is the top-level error returned by services and controllers. Expected
//! business failures (missing rows, duplicates, rejected operations) have their own
//! message variants so controllers can return them unchanged; everything else is
//! logged and reported to the client as a generic 500.

pub mod auth;
pub mod config;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::{
        activity::ActivityError,
        error::{auth::AuthError, config::ConfigError},
        export::ExportError,
        util::grid::GridError,
    },
};

/// Top-level application error type.
///
/// Most variants use `#[from]` for automatic conversion with `?`. `AuthError` maps
/// its own status codes, the message variants map to 400/404/409 and the remaining
/// wrapped errors become 500 responses with the details logged server-side.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Authentication or authorization error.
    ///
    /// Delegates to `AuthError::into_response()` for custom status code mapping.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    #[error(transparent)]
    SqlxErr(#[from] sea_orm::SqlxError),

    #[error(transparent)]
    SessionErr(#[from] tower_sessions::session::Error),

    /// HTTP client request error from reqwest (OAuth userinfo, SendGrid).
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Request body failed `validator` rules. Results in 400 Bad Request.
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    /// Malformed grid query (unknown field, bad operator or value). Results in 400 Bad Request.
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// Stored activity payload could not be rendered.
    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Resource not found. Results in 404 Not Found with the message.
    #[error("{0}")]
    NotFound(String),

    /// Invalid request. Results in 400 Bad Request with the message.
    #[error("{0}")]
    BadRequest(String),

    /// Resource already exists. Results in 409 Conflict with the message.
    #[error("{0}")]
    Conflict(String),

    /// Request is well formed but breaks a business rule. Results in 400 Bad Request.
    #[error("{0}")]
    InvalidOperation(String),

    /// Internal server error with custom message.
    ///
    /// The message is logged but a generic message is returned to the client.
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// Shorthand for the "X with the ID {id} does not exist." family of messages.
    pub fn missing(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} with the ID {} does not exist.", kind, id))
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - `BadRequest`, `InvalidOperation`, `Validation`, `Grid`
/// - 404 Not Found - `NotFound`
/// - 409 Conflict - `Conflict`
/// - Variable - `AuthErr`, delegated to `AuthError::into_response()`
/// - 500 Internal Server Error - everything else
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::NotFound(msg) => error_response(StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) | Self::InvalidOperation(msg) => {
                error_response(StatusCode::BAD_REQUEST, msg)
            }
            Self::Conflict(msg) => error_response(StatusCode::CONFLICT, msg),
            Self::Validation(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            Self::Grid(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorDto { error })).into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic "Internal server error" message to the
/// client to avoid leaking implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_business_errors_to_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::InvalidOperation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::InternalError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::DbErr(sea_orm::DbErr::Custom("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn formats_missing_message() {
        let id = uuid::Uuid::nil();
        let AppError::NotFound(msg) = AppError::missing("Division", id) else {
            panic!("expected NotFound");
        };
        assert_eq!(
            msg,
            "Division with the ID 00000000-0000-0000-0000-000000000000 does not exist."
        );
    }
}
