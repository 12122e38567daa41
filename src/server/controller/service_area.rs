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
        service::service_area::ServiceAreaService,
        state::AppState,
    },
};

/// Tag for grouping service area endpoints in OpenAPI documentation
pub static SERVICE_AREA_TAG: &str = "service-area";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_service_areas, create_service_area))
        .routes(routes!(export_service_areas))
        .routes(routes!(get_service_area, update_service_area))
        .routes(routes!(get_service_area_users))
        .routes(routes!(get_service_area_activities))
}

/// Get a page of service areas with their department and number of users.
///
/// # Access Control
/// - `ServiceAreas.Read`, `ServiceAreas.ReadWrite` or `ServiceAreas.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/service-areas",
    tag = SERVICE_AREA_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of service areas", body = PageDto<DepartmentUnitDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_service_areas(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::ServiceAreasRead,
            Permission::ServiceAreasReadWrite,
            Permission::ServiceAreasReadExport,
        ])
        .await?;

    let page = ServiceAreaService::new(&state.db)
        .get_page(tenant_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(DepartmentUnit::into_dto))))
}

/// Create a service area, optionally attached to a department.
///
/// # Access Control
/// - `ServiceAreas.ReadWrite`, inside a tenant
#[utoipa::path(
    post,
    path = "/api/service-areas",
    tag = SERVICE_AREA_TAG,
    request_body = DepartmentUnitRequestDto,
    responses(
        (status = 201, description = "Created service area", body = DepartmentUnitDto),
        (status = 400, description = "Invalid payload or department", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn create_service_area(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DepartmentUnitRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ServiceAreasReadWrite])
        .await?;
    payload.validate()?;

    let service_area = ServiceAreaService::new(&state.db)
        .create(
            tenant_id,
            DepartmentUnitParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(service_area.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/service-areas/export",
    tag = SERVICE_AREA_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_service_areas(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ServiceAreasReadExport])
        .await?;

    let file = ServiceAreaService::new(&state.db)
        .export(tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

#[utoipa::path(
    get,
    path = "/api/service-areas/{id}",
    tag = SERVICE_AREA_TAG,
    params(
        ("id" = Uuid, Path, description = "Service area ID")
    ),
    responses(
        (status = 200, description = "Service area details", body = DepartmentUnitDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Service area not found", body = ErrorDto)
    ),
)]
pub async fn get_service_area(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ServiceAreasRead, Permission::ServiceAreasReadWrite])
        .await?;

    let service_area = ServiceAreaService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(service_area.into_dto())))
}

/// Update a service area's name, description and department.
///
/// # Access Control
/// - `ServiceAreas.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/service-areas/{id}",
    tag = SERVICE_AREA_TAG,
    params(
        ("id" = Uuid, Path, description = "Service area ID")
    ),
    request_body = DepartmentUnitRequestDto,
    responses(
        (status = 200, description = "Updated service area", body = DepartmentUnitDto),
        (status = 400, description = "Invalid payload or department", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Service area not found", body = ErrorDto)
    ),
)]
pub async fn update_service_area(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<DepartmentUnitRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ServiceAreasReadWrite])
        .await?;
    payload.validate()?;

    let service_area = ServiceAreaService::new(&state.db)
        .update(
            tenant_id,
            id,
            DepartmentUnitParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(service_area.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/service-areas/{id}/users",
    tag = SERVICE_AREA_TAG,
    params(
        ("id" = Uuid, Path, description = "Service area ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Service area users", body = PageDto<OrgUnitUserDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Service area not found", body = ErrorDto)
    ),
)]
pub async fn get_service_area_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ServiceAreasRead, Permission::ServiceAreasReadWrite])
        .await?;

    let page = ServiceAreaService::new(&state.db)
        .users(tenant_id, id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(org_unit_user_dto))))
}

#[utoipa::path(
    get,
    path = "/api/service-areas/{id}/activities",
    tag = SERVICE_AREA_TAG,
    params(
        ("id" = Uuid, Path, description = "Service area ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Service area not found", body = ErrorDto)
    ),
)]
pub async fn get_service_area_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ServiceAreasRead, Permission::ServiceAreasReadWrite])
        .await?;

    let history = ServiceAreaService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
