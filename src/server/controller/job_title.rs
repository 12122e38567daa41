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
        api::{ActivityDto, ActivityParams, ErrorDto, ExportParams, GridParams, PageDto},
        org_unit::{DepartmentUnitDto, DepartmentUnitRequestDto, OrgUnitUserDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::org_unit::{org_unit_user_dto, DepartmentUnit, DepartmentUnitParams},
        service::job_title::JobTitleService,
        state::AppState,
    },
};

/// Tag for grouping job title endpoints in OpenAPI documentation
pub static JOB_TITLE_TAG: &str = "job-title";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_job_titles, create_job_title))
        .routes(routes!(export_job_titles))
        .routes(routes!(get_job_title, update_job_title))
        .routes(routes!(get_job_title_users))
        .routes(routes!(get_job_title_activities))
}

/// Get a page of job titles with their department and number of users.
///
/// # Access Control
/// - `JobTitles.Read`, `JobTitles.ReadWrite` or `JobTitles.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/job-titles",
    tag = JOB_TITLE_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of job titles", body = PageDto<DepartmentUnitDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_job_titles(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::JobTitlesRead,
            Permission::JobTitlesReadWrite,
            Permission::JobTitlesReadExport,
        ])
        .await?;

    let page = JobTitleService::new(&state.db)
        .get_page(tenant_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(DepartmentUnit::into_dto))))
}

/// Create a job title, optionally attached to a department.
///
/// # Access Control
/// - `JobTitles.ReadWrite`, inside a tenant
#[utoipa::path(
    post,
    path = "/api/job-titles",
    tag = JOB_TITLE_TAG,
    request_body = DepartmentUnitRequestDto,
    responses(
        (status = 201, description = "Created job title", body = DepartmentUnitDto),
        (status = 400, description = "Invalid payload or department", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn create_job_title(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DepartmentUnitRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::JobTitlesReadWrite])
        .await?;
    payload.validate()?;

    let job_title = JobTitleService::new(&state.db)
        .create(
            tenant_id,
            DepartmentUnitParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(job_title.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/job-titles/export",
    tag = JOB_TITLE_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_job_titles(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::JobTitlesReadExport])
        .await?;

    let file = JobTitleService::new(&state.db)
        .export(tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

#[utoipa::path(
    get,
    path = "/api/job-titles/{id}",
    tag = JOB_TITLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Job title ID")
    ),
    responses(
        (status = 200, description = "Job title details", body = DepartmentUnitDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Job title not found", body = ErrorDto)
    ),
)]
pub async fn get_job_title(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::JobTitlesRead, Permission::JobTitlesReadWrite])
        .await?;

    let job_title = JobTitleService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(job_title.into_dto())))
}

/// Update a job title's name, description and department.
///
/// # Access Control
/// - `JobTitles.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/job-titles/{id}",
    tag = JOB_TITLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Job title ID")
    ),
    request_body = DepartmentUnitRequestDto,
    responses(
        (status = 200, description = "Updated job title", body = DepartmentUnitDto),
        (status = 400, description = "Invalid payload or department", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Job title not found", body = ErrorDto)
    ),
)]
pub async fn update_job_title(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<DepartmentUnitRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::JobTitlesReadWrite])
        .await?;
    payload.validate()?;

    let job_title = JobTitleService::new(&state.db)
        .update(
            tenant_id,
            id,
            DepartmentUnitParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(job_title.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/job-titles/{id}/users",
    tag = JOB_TITLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Job title ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Job title users", body = PageDto<OrgUnitUserDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Job title not found", body = ErrorDto)
    ),
)]
pub async fn get_job_title_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::JobTitlesRead, Permission::JobTitlesReadWrite])
        .await?;

    let page = JobTitleService::new(&state.db)
        .users(tenant_id, id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(org_unit_user_dto))))
}

#[utoipa::path(
    get,
    path = "/api/job-titles/{id}/activities",
    tag = JOB_TITLE_TAG,
    params(
        ("id" = Uuid, Path, description = "Job title ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Job title not found", body = ErrorDto)
    ),
)]
pub async fn get_job_title_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::JobTitlesRead, Permission::JobTitlesReadWrite])
        .await?;

    let history = JobTitleService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
