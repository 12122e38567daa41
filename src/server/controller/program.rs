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
        api::{
            ActivityDto, ActivityParams, ErrorDto, ExportParams, GridParams, PageDto,
            UpdateStatusDto,
        },
        program::{ProgramDto, ProgramRequestDto},
        tenant::{AssignProgramOrgUnitsDto, TenantProgramDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::program::{Program, ProgramParams},
        service::program::ProgramService,
        state::AppState,
    },
};

/// Tag for grouping program endpoints in OpenAPI documentation
pub static PROGRAM_TAG: &str = "program";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_programs, create_program))
        .routes(routes!(export_programs))
        .routes(routes!(get_program, update_program))
        .routes(routes!(update_program_status))
        .routes(routes!(get_program_activities))
        .routes(routes!(get_tenant_program))
        .routes(routes!(update_tenant_program_status))
        .routes(routes!(assign_tenant_program_org_units))
}

/// Get a page of the program catalogue.
///
/// # Access Control
/// - `Programs.Read`, `Programs.ReadWrite` or `Programs.ReadExport`
#[utoipa::path(
    get,
    path = "/api/programs",
    tag = PROGRAM_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of programs", body = PageDto<ProgramDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto)
    ),
)]
pub async fn get_programs(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[
            Permission::ProgramsRead,
            Permission::ProgramsReadWrite,
            Permission::ProgramsReadExport,
        ])
        .await?;

    let page = ProgramService::new(&state.db).get_page(&params).await?;

    Ok((StatusCode::OK, Json(page.into_dto(Program::into_dto))))
}

/// Add a program to the catalogue.
///
/// # Access Control
/// - `Programs.ReadWrite`
///
/// # Returns
/// - `201 Created` - Created program
/// - `400 Bad Request` - Invalid payload or end date before start date
/// - `409 Conflict` - Name already taken
#[utoipa::path(
    post,
    path = "/api/programs",
    tag = PROGRAM_TAG,
    request_body = ProgramRequestDto,
    responses(
        (status = 201, description = "Created program", body = ProgramDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn create_program(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ProgramRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgramsReadWrite])
        .await?;
    payload.validate()?;

    let program = ProgramService::new(&state.db)
        .create(ProgramParams::from_dto(payload), current.executor())
        .await?;

    Ok((StatusCode::CREATED, Json(program.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/programs/export",
    tag = PROGRAM_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission", body = ErrorDto)
    ),
)]
pub async fn export_programs(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgramsReadExport])
        .await?;

    let file = ProgramService::new(&state.db)
        .export(params.file_type, current.executor())
        .await?;

    Ok(file)
}

#[utoipa::path(
    get,
    path = "/api/programs/{id}",
    tag = PROGRAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Program ID")
    ),
    responses(
        (status = 200, description = "Program details", body = ProgramDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Program not found", body = ErrorDto)
    ),
)]
pub async fn get_program(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgramsRead, Permission::ProgramsReadWrite])
        .await?;

    let program = ProgramService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(program.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/programs/{id}",
    tag = PROGRAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Program ID")
    ),
    request_body = ProgramRequestDto,
    responses(
        (status = 200, description = "Updated program", body = ProgramDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Program not found", body = ErrorDto)
    ),
)]
pub async fn update_program(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProgramRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgramsReadWrite])
        .await?;
    payload.validate()?;

    let program = ProgramService::new(&state.db)
        .update(id, ProgramParams::from_dto(payload), current.executor())
        .await?;

    Ok((StatusCode::OK, Json(program.into_dto())))
}

/// Deactivate or reactivate a program in the catalogue.
///
/// # Access Control
/// - `Programs.ReadWrite`
#[utoipa::path(
    put,
    path = "/api/programs/{id}/status",
    tag = PROGRAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Program ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated program", body = ProgramDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Program not found", body = ErrorDto)
    ),
)]
pub async fn update_program_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgramsReadWrite])
        .await?;

    let program = ProgramService::new(&state.db)
        .set_status(id, payload.status.into(), current.executor())
        .await?;

    Ok((StatusCode::OK, Json(program.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/programs/{id}/activities",
    tag = PROGRAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Program ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Program not found", body = ErrorDto)
    ),
)]
pub async fn get_program_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ProgramsRead, Permission::ProgramsReadWrite])
        .await?;

    let history = ProgramService::new(&state.db)
        .activities(id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}

/// Get a program as assigned to the selected tenant.
///
/// # Access Control
/// - `Programs.Read`, inside a tenant
///
/// # Returns
/// - `200 OK` - Tenant program with its org units and tenant-level status
/// - `404 Not Found` - Program is not assigned to the tenant
#[utoipa::path(
    get,
    path = "/api/tenant-programs/{program_id}",
    tag = PROGRAM_TAG,
    params(
        ("program_id" = Uuid, Path, description = "Program ID")
    ),
    responses(
        (status = 200, description = "Tenant program", body = TenantProgramDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Program not assigned to the tenant", body = ErrorDto)
    ),
)]
pub async fn get_tenant_program(
    State(state): State<AppState>,
    session: Session,
    Path(program_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::ProgramsRead,
            Permission::ProgramsReadActivation,
            Permission::ProgramsReadAssignTenantOrgUnits,
        ])
        .await?;

    let program = ProgramService::new(&state.db)
        .get_tenant_program(tenant_id, program_id)
        .await?;

    Ok((StatusCode::OK, Json(program.into_dto())))
}

/// Deactivate or reactivate a program for the selected tenant only.
///
/// # Access Control
/// - `Programs.ReadActivation`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/tenant-programs/{program_id}/status",
    tag = PROGRAM_TAG,
    params(
        ("program_id" = Uuid, Path, description = "Program ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated tenant program", body = TenantProgramDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Program not assigned to the tenant", body = ErrorDto)
    ),
)]
pub async fn update_tenant_program_status(
    State(state): State<AppState>,
    session: Session,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ProgramsReadActivation])
        .await?;

    let program = ProgramService::new(&state.db)
        .set_tenant_status(
            tenant_id,
            program_id,
            payload.status.into(),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(program.into_dto())))
}

/// Assign a tenant program to a department and service area.
///
/// Passing no department clears both. The service area must belong to the department.
///
/// # Access Control
/// - `Programs.ReadAssignTenantOrgUnits`, inside a tenant
///
/// # Returns
/// - `200 OK` - Tenant program with its new org units
/// - `400 Bad Request` - Unknown department, or service area outside the department
/// - `404 Not Found` - Program not assigned to the tenant
#[utoipa::path(
    put,
    path = "/api/tenant-programs/{program_id}/org-units",
    tag = PROGRAM_TAG,
    params(
        ("program_id" = Uuid, Path, description = "Program ID")
    ),
    request_body = AssignProgramOrgUnitsDto,
    responses(
        (status = 200, description = "Updated tenant program", body = TenantProgramDto),
        (status = 400, description = "Invalid department or service area", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Program not assigned to the tenant", body = ErrorDto)
    ),
)]
pub async fn assign_tenant_program_org_units(
    State(state): State<AppState>,
    session: Session,
    Path(program_id): Path<Uuid>,
    Json(payload): Json<AssignProgramOrgUnitsDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ProgramsReadAssignTenantOrgUnits])
        .await?;

    let program = ProgramService::new(&state.db)
        .assign_org_units(
            tenant_id,
            program_id,
            payload.department_id,
            payload.service_area_id,
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(program.into_dto())))
}
