use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// CSRF state validation failed during OAuth callback.
    ///
    /// The CSRF state token in the OAuth callback URL does not match the token stored
    /// in the session. Results in a 400 Bad Request response.
    #[error("Failed to login user due to CSRF state mismatch")]
    CsrfValidationFailed,

    /// No user id stored in the session.
    #[error("No user in session")]
    UserNotInSession,

    /// Session or login email refers to a user that does not exist.
    #[error("User {0} not found in database")]
    UserNotInDatabase(String),

    #[error("User {0} is deactivated")]
    UserDeactivated(Uuid),

    /// User lacks every permission the endpoint accepts.
    ///
    /// # Fields
    /// - User id
    /// - Description of the attempted action, logged only
    #[error("User {0} was denied access: {1}")]
    AccessDenied(Uuid, String),

    /// Endpoint is tenant scoped but no tenant is selected in the session.
    #[error("User {0} has no tenant selected")]
    TenantRequired(Uuid),

    /// Authorization code exchange with the identity provider failed.
    #[error("OAuth token exchange failed: {0}")]
    TokenExchange(String),

    /// Identity provider userinfo response carried no email.
    #[error("Identity provider did not return an email")]
    MissingEmail,
}

/// Converts authentication errors into HTTP responses.
///
/// Details are logged at debug level; clients get short generic messages.
///
/// # Returns
/// - 400 Bad Request - CSRF failures, token exchange failures, missing email
/// - 401 Unauthorized - No session user or unknown user
/// - 403 Forbidden - Deactivated user, missing permission, missing tenant
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::CsrfValidationFailed | Self::TokenExchange(_) | Self::MissingEmail => (
                StatusCode::BAD_REQUEST,
                "There was an issue logging you in, please try again.",
            ),
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "User not authenticated")
            }
            Self::UserDeactivated(_) => (StatusCode::FORBIDDEN, "User is deactivated"),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "Access denied"),
            Self::TenantRequired(_) => (StatusCode::FORBIDDEN, "No tenant selected"),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
