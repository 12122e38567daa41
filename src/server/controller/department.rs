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
        org_unit::{DepartmentDetailsDto, DepartmentDto, DepartmentRequestDto, OrgUnitUserDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            org_unit::{org_unit_user_dto, Department, DepartmentParams},
            Named,
        },
        service::department::DepartmentService,
        state::AppState,
    },
};

/// Tag for grouping department endpoints in OpenAPI documentation
pub static DEPARTMENT_TAG: &str = "department";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_departments, create_department))
        .routes(routes!(export_departments))
        .routes(routes!(get_department, update_department))
        .routes(routes!(get_department_users))
        .routes(routes!(get_department_service_areas))
        .routes(routes!(get_department_job_titles))
        .routes(routes!(get_department_activities))
}

/// Get a page of departments.
///
/// Each entry carries its division name, comma-joined service areas and number of
/// users.
///
/// # Access Control
/// - `Departments.Read`, `Departments.ReadWrite` or `Departments.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/departments",
    tag = DEPARTMENT_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of departments", body = PageDto<DepartmentDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_departments(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::DepartmentsRead,
            Permission::DepartmentsReadWrite,
            Permission::DepartmentsReadExport,
        ])
        .await?;

    let page = DepartmentService::new(&state.db)
        .get_page(tenant_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(Department::into_dto))))
}

/// Create a department.
///
/// # Access Control
/// - `Departments.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - Created department
/// - `400 Bad Request` - Invalid payload, or a service area or job title owned by another department
/// - `409 Conflict` - Name already taken
#[utoipa::path(
    post,
    path = "/api/departments",
    tag = DEPARTMENT_TAG,
    request_body = DepartmentRequestDto,
    responses(
        (status = 201, description = "Created department", body = DepartmentDetailsDto),
        (status = 400, description = "Invalid payload or org unit", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn create_department(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DepartmentRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsReadWrite])
        .await?;
    payload.validate()?;

    let department = DepartmentService::new(&state.db)
        .create(
            tenant_id,
            DepartmentParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(department.into_details_dto())))
}

/// Export departments.
///
/// # Access Control
/// - `Departments.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/departments/export",
    tag = DEPARTMENT_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_departments(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsReadExport])
        .await?;

    let file = DepartmentService::new(&state.db)
        .export(tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Get department details.
///
/// # Access Control
/// - `Departments.Read` or `Departments.ReadWrite`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    tag = DEPARTMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department details", body = DepartmentDetailsDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn get_department(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsRead, Permission::DepartmentsReadWrite])
        .await?;

    let department = DepartmentService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(department.into_details_dto())))
}

/// Update a department.
///
/// Changes name, description and division, and replaces the attached service areas and
/// job titles. Units that already belong to another department reject the update.
///
/// # Access Control
/// - `Departments.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    tag = DEPARTMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Department ID")
    ),
    request_body = DepartmentRequestDto,
    responses(
        (status = 200, description = "Updated department", body = DepartmentDetailsDto),
        (status = 400, description = "Invalid payload or org unit", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn update_department(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<DepartmentRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsReadWrite])
        .await?;
    payload.validate()?;

    let department = DepartmentService::new(&state.db)
        .update(
            tenant_id,
            id,
            DepartmentParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(department.into_details_dto())))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}/users",
    tag = DEPARTMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Department ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Department users", body = PageDto<OrgUnitUserDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn get_department_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsRead, Permission::DepartmentsReadWrite])
        .await?;

    let page = DepartmentService::new(&state.db)
        .users(tenant_id, id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(org_unit_user_dto))))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}/service-areas",
    tag = DEPARTMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department service areas", body = Vec<NamedDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn get_department_service_areas(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsRead, Permission::DepartmentsReadWrite])
        .await?;

    let service_areas = DepartmentService::new(&state.db)
        .service_areas(tenant_id, id)
        .await?;
    let service_areas: Vec<NamedDto> = service_areas.into_iter().map(Named::into_dto).collect();

    Ok((StatusCode::OK, Json(service_areas)))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}/job-titles",
    tag = DEPARTMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department job titles", body = Vec<NamedDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn get_department_job_titles(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsRead, Permission::DepartmentsReadWrite])
        .await?;

    let job_titles = DepartmentService::new(&state.db)
        .job_titles(tenant_id, id)
        .await?;
    let job_titles: Vec<NamedDto> = job_titles.into_iter().map(Named::into_dto).collect();

    Ok((StatusCode::OK, Json(job_titles)))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}/activities",
    tag = DEPARTMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Department ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn get_department_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DepartmentsRead, Permission::DepartmentsReadWrite])
        .await?;

    let history = DepartmentService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
