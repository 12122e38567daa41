use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    model::{api::ErrorDto, auth::LoginUserDto},
    server::{
        error::{auth::AuthError, AppError},
        middleware::{
            auth::AuthGuard,
            session::{AuthSession, CsrfSession},
        },
        service::{auth::AuthService, tenant::TenantService},
        state::AppState,
    },
};

/// Tag for grouping authentication endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(callback))
        .routes(routes!(logout))
        .routes(routes!(get_me))
        .routes(routes!(enter_tenant))
}

/// Query parameters for the OAuth callback endpoint.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParams {
    /// CSRF state token to be validated against the session value.
    pub state: String,
    /// Authorization code exchanged for an access token.
    pub code: String,
}

/// Redirect to the identity provider.
///
/// Stores a CSRF token in the session which the callback validates.
#[utoipa::path(
    get,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    responses(
        (status = 307, description = "Redirect to the identity provider"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.userinfo_url,
    );

    let (url, csrf_token) = auth_service.login_url();

    CsrfSession::new(&session)
        .set_token(csrf_token.secret().clone())
        .await?;

    Ok(Redirect::temporary(url.as_str()))
}

/// Complete the OAuth flow and sign the user in.
///
/// Validates the CSRF token, exchanges the authorization code, resolves the user by the
/// email the provider reports and stores the user and their tenant in the session.
///
/// # Returns
/// - `307 Temporary Redirect` - Signed in, redirected to the application
/// - `400 Bad Request` - CSRF validation or token exchange failed
/// - `401 Unauthorized` - No user with the provider's email
/// - `403 Forbidden` - User is deactivated
#[utoipa::path(
    get,
    path = "/api/auth/callback",
    tag = AUTH_TAG,
    params(CallbackParams),
    responses(
        (status = 307, description = "Signed in, redirect to the application"),
        (status = 400, description = "CSRF validation or token exchange failed", body = ErrorDto),
        (status = 401, description = "Unknown user", body = ErrorDto),
        (status = 403, description = "User is deactivated", body = ErrorDto)
    ),
)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    validate_csrf(&session, &params.state).await?;

    let auth_service = AuthService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.userinfo_url,
    );
    let user = auth_service.callback(params.code).await?;

    let auth_session = AuthSession::new(&session);
    auth_session.set_user_id(user.id).await?;
    if let Some(tenant_id) = user.tenant_id {
        auth_session.set_tenant_id(tenant_id).await?;
    }

    Ok(Redirect::temporary(&state.app_url))
}

/// Sign out by clearing the session.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Session cleared")
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await;

    Ok(StatusCode::OK)
}

/// Get the signed-in user.
///
/// # Access Control
/// - Any authenticated, active user
///
/// # Returns
/// - `200 OK` - User with roles, permissions and the selected tenant
/// - `401 Unauthorized` - Nobody is signed in
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Signed-in user", body = LoginUserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto)
    ),
)]
pub async fn get_me(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    Ok((StatusCode::OK, Json(current.into_dto())))
}

/// Enter a tenant as super admin.
///
/// Selects the tenant for the rest of the session so that tenant-scoped endpoints
/// operate on it, and records the visit in the tenant's activity log.
///
/// # Access Control
/// - Super admin only
///
/// # Returns
/// - `200 OK` - The signed-in user as seen inside the tenant
/// - `403 Forbidden` - Caller is not a super admin
/// - `404 Not Found` - Tenant does not exist
#[utoipa::path(
    put,
    path = "/api/auth/tenant/{tenant_id}",
    tag = AUTH_TAG,
    params(
        ("tenant_id" = Uuid, Path, description = "Tenant to enter")
    ),
    responses(
        (status = 200, description = "Tenant entered", body = LoginUserDto),
        (status = 403, description = "Caller is not a super admin", body = ErrorDto),
        (status = 404, description = "Tenant not found", body = ErrorDto)
    ),
)]
pub async fn enter_tenant(
    State(state): State<AppState>,
    session: Session,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let guard = AuthGuard::new(&state.db, &session);
    let current = guard.require(&[]).await?;

    if !current.is_super_admin {
        return Err(AuthError::AccessDenied(
            current.id,
            "only super admins can enter a tenant".to_string(),
        )
        .into());
    }

    let tenant = TenantService::new(&state.db)
        .enter(tenant_id, current.executor())
        .await?;
    AuthSession::new(&session).set_tenant_id(tenant.id).await?;

    let current = guard.require(&[]).await?;

    Ok((StatusCode::OK, Json(current.into_dto())))
}

async fn validate_csrf(session: &Session, csrf_state: &str) -> Result<(), AppError> {
    let stored = CsrfSession::new(session).take_token().await?;

    match stored {
        Some(token) if token == csrf_state => Ok(()),
        _ => Err(AuthError::CsrfValidationFailed.into()),
    }
}
