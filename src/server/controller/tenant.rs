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
        api::{ActivityDto, ActivityParams, ErrorDto, ExportParams, GridParams, NamedDto, PageDto},
        tenant::{
            ChangeTenantProgramsDto, CreateTenantDto, TenantDto, TenantProgramDto,
            UpdateDivisionEnabledDto, UpdateTenantDto,
        },
    },
    server::{
        error::{auth::AuthError, AppError},
        middleware::auth::{AuthGuard, Permission},
        model::{program::TenantProgram, tenant::Tenant, Named},
        service::tenant::TenantService,
        state::AppState,
    },
};

/// Tag for grouping tenant endpoints in OpenAPI documentation
pub static TENANT_TAG: &str = "tenant";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_tenants, create_tenant))
        .routes(routes!(export_tenants))
        .routes(routes!(update_division_enabled))
        .routes(routes!(get_tenant, update_tenant))
        .routes(routes!(get_tenant_departments))
        .routes(routes!(get_tenant_programs, change_tenant_programs))
        .routes(routes!(get_tenant_activities))
}

/// Get a page of tenants.
///
/// Requesting a page past the last one is reported as not found.
///
/// # Access Control
/// - `Tenants.Read`, `Tenants.ReadWrite` or `Tenants.ReadExport`
#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = TENANT_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of tenants", body = PageDto<TenantDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Page past the end", body = ErrorDto)
    ),
)]
pub async fn get_tenants(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[
            Permission::TenantsRead,
            Permission::TenantsReadWrite,
            Permission::TenantsReadExport,
        ])
        .await?;

    let page = TenantService::new(&state.db).get_page(&params).await?;

    Ok((StatusCode::OK, Json(page.into_dto(Tenant::into_dto))))
}

/// Create a tenant and seed its "Admin" and "User" roles.
///
/// # Access Control
/// - Super admin holding `Tenants.ReadWrite`
///
/// # Returns
/// - `201 Created` - Created tenant
/// - `409 Conflict` - Name already taken
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = TENANT_TAG,
    request_body = CreateTenantDto,
    responses(
        (status = 201, description = "Created tenant", body = TenantDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Caller is not a super admin", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateTenantDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsReadWrite])
        .await?;
    if !current.is_super_admin {
        return Err(AuthError::AccessDenied(
            current.id,
            "only super admins can create tenants".to_string(),
        )
        .into());
    }
    payload.validate()?;

    let tenant = TenantService::new(&state.db)
        .create(&payload.name, current.executor())
        .await?;

    Ok((StatusCode::CREATED, Json(tenant.into_dto())))
}

/// Export tenants as CSV or XLSX.
///
/// # Access Control
/// - `Tenants.ReadExport`
#[utoipa::path(
    get,
    path = "/api/tenants/export",
    tag = TENANT_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission", body = ErrorDto)
    ),
)]
pub async fn export_tenants(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsReadExport])
        .await?;

    let file = TenantService::new(&state.db)
        .export(params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Turn the division level on or off for the selected tenant.
///
/// # Access Control
/// - `Tenants.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/tenants/divisions",
    tag = TENANT_TAG,
    request_body = UpdateDivisionEnabledDto,
    responses(
        (status = 200, description = "Updated tenant", body = TenantDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn update_division_enabled(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateDivisionEnabledDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::TenantsReadWrite])
        .await?;

    let tenant = TenantService::new(&state.db)
        .set_division_enabled(tenant_id, payload.division_enabled, current.executor())
        .await?;

    Ok((StatusCode::OK, Json(tenant.into_dto())))
}

/// Get tenant details.
///
/// # Access Control
/// - `Tenants.Read` or `Tenants.ReadWrite`
#[utoipa::path(
    get,
    path = "/api/tenants/{id}",
    tag = TENANT_TAG,
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Tenant details", body = TenantDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Tenant not found", body = ErrorDto)
    ),
)]
pub async fn get_tenant(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsRead, Permission::TenantsReadWrite])
        .await?;

    let tenant = TenantService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(tenant.into_dto())))
}

/// Rename a tenant.
///
/// # Access Control
/// - `Tenants.ReadWrite`
#[utoipa::path(
    put,
    path = "/api/tenants/{id}",
    tag = TENANT_TAG,
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    request_body = UpdateTenantDto,
    responses(
        (status = 200, description = "Updated tenant", body = TenantDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Tenant not found", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn update_tenant(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenantDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsReadWrite])
        .await?;
    payload.validate()?;

    let tenant = TenantService::new(&state.db)
        .update(id, &payload.name, current.executor())
        .await?;

    Ok((StatusCode::OK, Json(tenant.into_dto())))
}

/// Get the departments of a tenant.
///
/// # Access Control
/// - `Tenants.Read` or `Departments.Read`
#[utoipa::path(
    get,
    path = "/api/tenants/{id}/departments",
    tag = TENANT_TAG,
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Tenant departments", body = Vec<NamedDto>),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Tenant not found", body = ErrorDto)
    ),
)]
pub async fn get_tenant_departments(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsRead, Permission::DepartmentsRead])
        .await?;

    let departments = TenantService::new(&state.db).departments(id).await?;
    let departments: Vec<NamedDto> = departments.into_iter().map(Named::into_dto).collect();

    Ok((StatusCode::OK, Json(departments)))
}

/// Get the programs assigned to a tenant.
///
/// # Access Control
/// - `Tenants.Read` or `Programs.Read`
#[utoipa::path(
    get,
    path = "/api/tenants/{id}/programs",
    tag = TENANT_TAG,
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    responses(
        (status = 200, description = "Assigned programs", body = Vec<TenantProgramDto>),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Tenant not found", body = ErrorDto)
    ),
)]
pub async fn get_tenant_programs(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsRead, Permission::ProgramsRead])
        .await?;

    let programs = TenantService::new(&state.db).programs(id).await?;
    let programs: Vec<TenantProgramDto> =
        programs.into_iter().map(TenantProgram::into_dto).collect();

    Ok((StatusCode::OK, Json(programs)))
}

/// Replace the set of programs assigned to a tenant.
///
/// # Access Control
/// - `Tenants.ReadWrite`
///
/// # Returns
/// - `200 OK` - Assigned programs after the change
/// - `404 Not Found` - Unknown tenant or program
#[utoipa::path(
    put,
    path = "/api/tenants/{id}/programs",
    tag = TENANT_TAG,
    params(
        ("id" = Uuid, Path, description = "Tenant ID")
    ),
    request_body = ChangeTenantProgramsDto,
    responses(
        (status = 200, description = "Assigned programs", body = Vec<TenantProgramDto>),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Tenant or program not found", body = ErrorDto)
    ),
)]
pub async fn change_tenant_programs(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeTenantProgramsDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsReadWrite])
        .await?;

    let programs = TenantService::new(&state.db)
        .change_programs(id, &payload.program_ids, current.executor())
        .await?;
    let programs: Vec<TenantProgramDto> =
        programs.into_iter().map(TenantProgram::into_dto).collect();

    Ok((StatusCode::OK, Json(programs)))
}

/// Get the activity history of a tenant.
///
/// # Access Control
/// - `Tenants.Read` or `Tenants.ReadWrite`
#[utoipa::path(
    get,
    path = "/api/tenants/{id}/activities",
    tag = TENANT_TAG,
    params(
        ("id" = Uuid, Path, description = "Tenant ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Tenant not found", body = ErrorDto)
    ),
)]
pub async fn get_tenant_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::TenantsRead, Permission::TenantsReadWrite])
        .await?;

    let history = TenantService::new(&state.db)
        .activities(id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
