use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;
use validator::Validate;

use crate::{
    model::{
        api::{ActivityDto, ActivityParams, ErrorDto, ExportParams, GridParams, PageDto, UpdateStatusDto},
        user::{ChangeUserRolesDto, CreateUserDto, UpdateUserDto, UserDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::user::{CreateUserParams, UpdateUserParams, User},
        service::user::UserService,
        state::AppState,
    },
};

/// Tag for grouping user endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_users, create_user))
        .routes(routes!(export_users))
        .routes(routes!(get_user, update_user))
        .routes(routes!(update_user_status))
        .routes(routes!(change_user_roles))
        .routes(routes!(get_user_activities))
}

/// Get a page of users.
///
/// Lists the users of the selected tenant. A super admin without a selected tenant
/// sees every user in the system.
///
/// # Access Control
/// - `Users.Read`, `Users.ReadWrite` or `Users.ReadExport`
///
/// # Arguments
/// - `state` - Application state containing the database connection
/// - `session` - User's session for authentication
/// - `params` - Grid paging, filter and sort
///
/// # Returns
/// - `200 OK` - Page of users
/// - `400 Bad Request` - Malformed filter or sort
/// - `403 Forbidden` - Missing permission
#[utoipa::path(
    get,
    path = "/api/users",
    tag = USER_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of users", body = PageDto<UserDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[
            Permission::UsersRead,
            Permission::UsersReadWrite,
            Permission::UsersReadExport,
        ])
        .await?;

    let page = UserService::new(&state.db)
        .get_page(current.tenant_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(User::into_dto))))
}

/// Create a user.
///
/// Validates the org units against the tenant, adds the user to the selected tenant and
/// sends the welcome email when email delivery is configured.
///
/// # Access Control
/// - `Users.ReadWrite`
///
/// # Returns
/// - `201 Created` - Created user
/// - `400 Bad Request` - Invalid payload or org unit
/// - `409 Conflict` - Email already in use
#[utoipa::path(
    post,
    path = "/api/users",
    tag = USER_TAG,
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Invalid payload or org unit", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 409, description = "Email already in use", body = ErrorDto)
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::UsersReadWrite])
        .await?;
    payload.validate()?;

    let params = CreateUserParams::from_dto(current.tenant_id, payload);
    let user = UserService::new(&state.db)
        .create(
            params,
            current.division_enabled,
            current.executor(),
            &state.email_sender,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user.into_dto())))
}

/// Export users as CSV or XLSX, ordered by email.
///
/// # Access Control
/// - `Users.ReadExport`
#[utoipa::path(
    get,
    path = "/api/users/export",
    tag = USER_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission", body = ErrorDto)
    ),
)]
pub async fn export_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::UsersReadExport])
        .await?;

    let file = UserService::new(&state.db)
        .export(current.tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Get user details including role and org unit names.
///
/// # Access Control
/// - `Users.Read` or `Users.ReadWrite`
///
/// # Returns
/// - `200 OK` - User details
/// - `404 Not Found` - No such user in the tenant
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::UsersRead, Permission::UsersReadWrite])
        .await?;

    let user = UserService::new(&state.db)
        .get(current.tenant_id, id)
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Update a user's name and org units.
///
/// # Access Control
/// - `Users.ReadWrite`
///
/// # Returns
/// - `200 OK` - Updated user
/// - `400 Bad Request` - Invalid payload or org unit
/// - `404 Not Found` - No such user in the tenant
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Invalid payload or org unit", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::UsersReadWrite])
        .await?;
    payload.validate()?;

    let params = UpdateUserParams::from_dto(id, payload);
    let user = UserService::new(&state.db)
        .update(
            current.tenant_id,
            current.division_enabled,
            params,
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Deactivate or reactivate a user.
///
/// # Access Control
/// - `Users.ReadWrite`
#[utoipa::path(
    put,
    path = "/api/users/{id}/status",
    tag = USER_TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::UsersReadWrite])
        .await?;

    let user = UserService::new(&state.db)
        .set_status(
            current.tenant_id,
            id,
            payload.status.into(),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Replace the roles a user holds in the current scope.
///
/// Only roles of the selected tenant (or system roles without a tenant) are touched;
/// removed and added roles are recorded separately in the user's activity log.
///
/// # Access Control
/// - `Users.ReadWrite` or `Roles.ReadWrite`
///
/// # Returns
/// - `200 OK` - User with the new roles
/// - `404 Not Found` - Unknown user or role
#[utoipa::path(
    put,
    path = "/api/users/{id}/roles",
    tag = USER_TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = ChangeUserRolesDto,
    responses(
        (status = 200, description = "User with the new roles", body = UserDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "User or role not found", body = ErrorDto)
    ),
)]
pub async fn change_user_roles(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeUserRolesDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::UsersReadWrite, Permission::RolesReadWrite])
        .await?;

    let user = UserService::new(&state.db)
        .change_roles(current.tenant_id, id, &payload.role_ids, current.executor())
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Get the activity history of a user, newest first.
///
/// # Access Control
/// - `Users.Read` or `Users.ReadWrite`
#[utoipa::path(
    get,
    path = "/api/users/{id}/activities",
    tag = USER_TAG,
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn get_user_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::UsersRead, Permission::UsersReadWrite])
        .await?;

    let history = UserService::new(&state.db)
        .activities(current.tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
