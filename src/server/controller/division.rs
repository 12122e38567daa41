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
        org_unit::{DivisionDetailsDto, DivisionDto, DivisionRequestDto, OrgUnitUserDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            org_unit::{org_unit_user_dto, Division, DivisionParams},
            Named,
        },
        service::division::DivisionService,
        state::AppState,
    },
};

/// Tag for grouping division endpoints in OpenAPI documentation
pub static DIVISION_TAG: &str = "division";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_divisions, create_division))
        .routes(routes!(export_divisions))
        .routes(routes!(get_division, update_division))
        .routes(routes!(get_division_users))
        .routes(routes!(get_division_departments))
        .routes(routes!(get_division_activities))
}

/// Get a page of divisions with their departments and number of users.
///
/// # Access Control
/// - `Divisions.Read`, `Divisions.ReadWrite` or `Divisions.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/divisions",
    tag = DIVISION_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of divisions", body = PageDto<DivisionDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_divisions(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::DivisionsRead,
            Permission::DivisionsReadWrite,
            Permission::DivisionsReadExport,
        ])
        .await?;

    let page = DivisionService::new(&state.db)
        .get_page(tenant_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(Division::into_dto))))
}

/// Create a division.
///
/// # Access Control
/// - `Divisions.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - Created division
/// - `400 Bad Request` - Invalid payload or a department owned by another division
/// - `409 Conflict` - Name already taken
#[utoipa::path(
    post,
    path = "/api/divisions",
    tag = DIVISION_TAG,
    request_body = DivisionRequestDto,
    responses(
        (status = 201, description = "Created division", body = DivisionDetailsDto),
        (status = 400, description = "Invalid payload or department", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn create_division(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<DivisionRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DivisionsReadWrite])
        .await?;
    payload.validate()?;

    let division = DivisionService::new(&state.db)
        .create(tenant_id, DivisionParams::from_dto(payload), current.executor())
        .await?;

    Ok((StatusCode::CREATED, Json(division.into_details_dto())))
}

/// Export divisions ordered by name.
///
/// # Access Control
/// - `Divisions.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/divisions/export",
    tag = DIVISION_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_divisions(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DivisionsReadExport])
        .await?;

    let file = DivisionService::new(&state.db)
        .export(tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Get division details with its departments.
///
/// # Access Control
/// - `Divisions.Read` or `Divisions.ReadWrite`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/divisions/{id}",
    tag = DIVISION_TAG,
    params(
        ("id" = Uuid, Path, description = "Division ID")
    ),
    responses(
        (status = 200, description = "Division details", body = DivisionDetailsDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Division not found", body = ErrorDto)
    ),
)]
pub async fn get_division(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DivisionsRead, Permission::DivisionsReadWrite])
        .await?;

    let division = DivisionService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(division.into_details_dto())))
}

/// Update a division's name, description and departments.
///
/// Departments missing from the request are detached, new ones are attached. A
/// department that already belongs to another division rejects the whole update.
///
/// # Access Control
/// - `Divisions.ReadWrite`, inside a tenant
///
/// # Returns
/// - `200 OK` - Updated division
/// - `400 Bad Request` - Invalid payload or a department owned by another division
/// - `404 Not Found` - Division not found
#[utoipa::path(
    put,
    path = "/api/divisions/{id}",
    tag = DIVISION_TAG,
    params(
        ("id" = Uuid, Path, description = "Division ID")
    ),
    request_body = DivisionRequestDto,
    responses(
        (status = 200, description = "Updated division", body = DivisionDetailsDto),
        (status = 400, description = "Invalid payload or department", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Division not found", body = ErrorDto)
    ),
)]
pub async fn update_division(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<DivisionRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DivisionsReadWrite])
        .await?;
    payload.validate()?;

    let division = DivisionService::new(&state.db)
        .update(
            tenant_id,
            id,
            DivisionParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(division.into_details_dto())))
}

/// Get a page of the users of a division.
///
/// # Access Control
/// - `Divisions.Read` or `Divisions.ReadWrite`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/divisions/{id}/users",
    tag = DIVISION_TAG,
    params(
        ("id" = Uuid, Path, description = "Division ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Division users", body = PageDto<OrgUnitUserDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Division not found", body = ErrorDto)
    ),
)]
pub async fn get_division_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DivisionsRead, Permission::DivisionsReadWrite])
        .await?;

    let page = DivisionService::new(&state.db)
        .users(tenant_id, id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(org_unit_user_dto))))
}

#[utoipa::path(
    get,
    path = "/api/divisions/{id}/departments",
    tag = DIVISION_TAG,
    params(
        ("id" = Uuid, Path, description = "Division ID")
    ),
    responses(
        (status = 200, description = "Division departments", body = Vec<NamedDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Division not found", body = ErrorDto)
    ),
)]
pub async fn get_division_departments(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DivisionsRead, Permission::DivisionsReadWrite])
        .await?;

    let departments = DivisionService::new(&state.db)
        .departments(tenant_id, id)
        .await?;
    let departments: Vec<NamedDto> = departments.into_iter().map(Named::into_dto).collect();

    Ok((StatusCode::OK, Json(departments)))
}

#[utoipa::path(
    get,
    path = "/api/divisions/{id}/activities",
    tag = DIVISION_TAG,
    params(
        ("id" = Uuid, Path, description = "Division ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Division not found", body = ErrorDto)
    ),
)]
pub async fn get_division_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DivisionsRead, Permission::DivisionsReadWrite])
        .await?;

    let history = DivisionService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
