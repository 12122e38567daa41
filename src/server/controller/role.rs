use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    model::{
        api::{ErrorDto, GridParams, PageDto},
        role::{PermissionDto, RoleDto, RoleUserDto, RoleUsersDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::role::{role_user_dto, Role, RolePermission},
        service::role::RoleService,
        state::AppState,
    },
};

/// Tag for grouping role endpoints in OpenAPI documentation
pub static ROLE_TAG: &str = "role";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_roles))
        .routes(routes!(get_role_permissions))
        .routes(routes!(get_role_users, assign_role_users, unassign_role_users))
}

/// Get the roles of the current scope with their assigned users count.
///
/// Inside a tenant these are the tenant's roles, otherwise the system roles.
///
/// # Access Control
/// - `Roles.Read` or `Roles.ReadWrite`
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "Roles", body = Vec<RoleDto>),
        (status = 403, description = "Missing permission", body = ErrorDto)
    ),
)]
pub async fn get_roles(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RolesRead, Permission::RolesReadWrite])
        .await?;

    let roles = RoleService::new(&state.db).list(current.tenant_id).await?;
    let roles: Vec<RoleDto> = roles.into_iter().map(Role::into_dto).collect();

    Ok((StatusCode::OK, Json(roles)))
}

/// Get the permissions granted by a role, each with its category.
///
/// # Access Control
/// - `Roles.Read` or `Roles.ReadWrite`
#[utoipa::path(
    get,
    path = "/api/roles/{id}/permissions",
    tag = ROLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role permissions", body = Vec<PermissionDto>),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Role not found", body = ErrorDto)
    ),
)]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RolesRead, Permission::RolesReadWrite])
        .await?;

    let permissions = RoleService::new(&state.db)
        .permissions(current.tenant_id, id)
        .await?;
    let permissions: Vec<PermissionDto> = permissions
        .into_iter()
        .map(RolePermission::into_dto)
        .collect();

    Ok((StatusCode::OK, Json(permissions)))
}

/// Get a page of the users holding a role.
///
/// # Access Control
/// - `Roles.Read` or `Roles.ReadWrite`
#[utoipa::path(
    get,
    path = "/api/roles/{id}/users",
    tag = ROLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Role ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Users holding the role", body = PageDto<RoleUserDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Role not found", body = ErrorDto)
    ),
)]
pub async fn get_role_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RolesRead, Permission::RolesReadWrite])
        .await?;

    let page = RoleService::new(&state.db)
        .users(current.tenant_id, id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(role_user_dto))))
}

/// Assign a role to users.
///
/// Users already holding the role are skipped; every newly assigned user gets an
/// activity entry.
///
/// # Access Control
/// - `Roles.ReadWrite`
///
/// # Returns
/// - `204 No Content` - Role assigned
/// - `404 Not Found` - Unknown role or user
#[utoipa::path(
    post,
    path = "/api/roles/{id}/users",
    tag = ROLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = RoleUsersDto,
    responses(
        (status = 204, description = "Role assigned"),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Role or user not found", body = ErrorDto)
    ),
)]
pub async fn assign_role_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleUsersDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RolesReadWrite])
        .await?;

    RoleService::new(&state.db)
        .assign_users(current.tenant_id, id, &payload.user_ids, current.executor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a role from users.
///
/// # Access Control
/// - `Roles.ReadWrite`
#[utoipa::path(
    delete,
    path = "/api/roles/{id}/users",
    tag = ROLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = RoleUsersDto,
    responses(
        (status = 204, description = "Role removed"),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Role not found", body = ErrorDto)
    ),
)]
pub async fn unassign_role_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleUsersDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RolesReadWrite])
        .await?;

    RoleService::new(&state.db)
        .unassign_users(current.tenant_id, id, &payload.user_ids, current.executor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
