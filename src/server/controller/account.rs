use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;
use validator::Validate;

use crate::{
    model::{
        account::{AccountActivityParams, AccountDetailsDto, AccountDto, AccountRequestDto},
        api::{ActivityDto, ErrorDto, ExportParams, GridParams, PageDto, UpdateStatusDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::account::{parse_account_parts, AccountParams},
        service::account::AccountService,
        state::AppState,
    },
};

/// Tag for grouping account endpoints in OpenAPI documentation
pub static ACCOUNT_TAG: &str = "account";

const ACCOUNT_READERS: &[Permission] = &[
    Permission::AccountsRead,
    Permission::AccountsReadWrite,
    Permission::ClientsRead,
    Permission::ReferralsRead,
];

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_accounts, create_account))
        .routes(routes!(export_accounts))
        .routes(routes!(get_account, update_account))
        .routes(routes!(update_client_status))
        .routes(routes!(update_referral_status))
        .routes(routes!(get_account_activities))
}

/// Get a page of accounts of the selected tenant.
///
/// # Access Control
/// - Any of `Accounts.Read`, `Accounts.ReadWrite`, `Accounts.ReadExport`, `Clients.Read`
///   or `Referrals.Read`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = ACCOUNT_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of accounts", body = PageDto<AccountDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_accounts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::AccountsRead,
            Permission::AccountsReadWrite,
            Permission::AccountsReadExport,
            Permission::ClientsRead,
            Permission::ReferralsRead,
        ])
        .await?;

    let page = AccountService::new(&state.db)
        .get_page(tenant_id, &params)
        .await?;

    let now = Utc::now();
    Ok((StatusCode::OK, Json(page.into_dto(|a| a.into_dto(now)))))
}

/// Create an account.
///
/// The optional client and referral states create the matching account parts in the
/// Active status.
///
/// # Access Control
/// - `Accounts.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - Created account
/// - `400 Bad Request` - Invalid payload
/// - `409 Conflict` - Account ID already used in the tenant
#[utoipa::path(
    post,
    path = "/api/accounts",
    tag = ACCOUNT_TAG,
    request_body = AccountRequestDto,
    responses(
        (status = 201, description = "Created account", body = AccountDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 409, description = "Account ID already used", body = ErrorDto)
    ),
)]
pub async fn create_account(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AccountRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::AccountsReadWrite])
        .await?;
    payload.validate()?;

    let account = AccountService::new(&state.db)
        .create(tenant_id, AccountParams::from_dto(payload), current.executor())
        .await?;

    Ok((StatusCode::CREATED, Json(account.into_dto(Utc::now()))))
}

/// Export accounts with phone and zip masks applied.
///
/// # Access Control
/// - `Accounts.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/accounts/export",
    tag = ACCOUNT_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_accounts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::AccountsReadExport])
        .await?;

    let file = AccountService::new(&state.db)
        .export(tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Get account details with the number of contacts, entities and locations.
#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account details", body = AccountDetailsDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn get_account(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(ACCOUNT_READERS)
        .await?;

    let details = AccountService::new(&state.db)
        .get_details(tenant_id, id)
        .await?;

    Ok((StatusCode::OK, Json(details.into_dto(Utc::now()))))
}

/// Update the profile fields of an account.
///
/// Client and referral parts are left untouched.
///
/// # Access Control
/// - `Accounts.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/accounts/{id}",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = AccountRequestDto,
    responses(
        (status = 200, description = "Updated account", body = AccountDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto),
        (status = 409, description = "Account ID already used", body = ErrorDto)
    ),
)]
pub async fn update_account(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::AccountsReadWrite])
        .await?;
    payload.validate()?;

    let account = AccountService::new(&state.db)
        .update_profile(
            tenant_id,
            id,
            AccountParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(account.into_dto(Utc::now()))))
}

/// Deactivate or reactivate the client part of an account.
///
/// # Access Control
/// - `Clients.ReadActivation`, inside a tenant
///
/// # Returns
/// - `200 OK` - Updated account
/// - `400 Bad Request` - Account is not a client
/// - `404 Not Found` - Account not found
#[utoipa::path(
    put,
    path = "/api/accounts/{id}/client/status",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated account", body = AccountDto),
        (status = 400, description = "Account is not a client", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn update_client_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ClientsReadActivation])
        .await?;

    let account = AccountService::new(&state.db)
        .set_client_status(tenant_id, id, payload.status.into(), current.executor())
        .await?;

    Ok((StatusCode::OK, Json(account.into_dto(Utc::now()))))
}

/// Deactivate or reactivate the referral part of an account.
///
/// # Access Control
/// - `Referrals.ReadActivation`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/accounts/{id}/referral/status",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated account", body = AccountDto),
        (status = 400, description = "Account is not a referral", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn update_referral_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ReferralsReadActivation])
        .await?;

    let account = AccountService::new(&state.db)
        .set_referral_status(tenant_id, id, payload.status.into(), current.executor())
        .await?;

    Ok((StatusCode::OK, Json(account.into_dto(Utc::now()))))
}

/// Get the activity history of an account.
///
/// `parts` narrows the history to the general, client or referral part; without it
/// every part is returned.
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/activities",
    tag = ACCOUNT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        AccountActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn get_account_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<AccountActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(ACCOUNT_READERS)
        .await?;

    let parts = parse_account_parts(params.parts.as_deref());
    let history = AccountService::new(&state.db)
        .activities(tenant_id, id, &parts, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
