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
        location::{AssociateEntitiesDto, LocationDto, LocationRequestDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::location::{Location, LocationParams},
        service::location::LocationService,
        state::AppState,
    },
};

/// Tag for grouping location endpoints in OpenAPI documentation
pub static LOCATION_TAG: &str = "location";

const LOCATION_READERS: &[Permission] =
    &[Permission::LocationsRead, Permission::LocationsReadWrite];

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_locations, create_location))
        .routes(routes!(export_locations))
        .routes(routes!(get_location, update_location))
        .routes(routes!(update_location_status))
        .routes(routes!(associate_location_entities))
        .routes(routes!(get_location_activities))
}

/// Get a page of the locations of an account.
///
/// # Access Control
/// - `Locations.Read`, `Locations.ReadWrite` or `Locations.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/locations",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Page of locations", body = PageDto<LocationDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn get_locations(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::LocationsRead,
            Permission::LocationsReadWrite,
            Permission::LocationsReadExport,
        ])
        .await?;

    let page = LocationService::new(&state.db)
        .get_page(tenant_id, account_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(Location::into_dto))))
}

/// Create a location in an account.
///
/// The name must be unique in the account and the location ID unique in the tenant.
/// Listed entities must belong to the same account.
///
/// # Access Control
/// - `Locations.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - Created location
/// - `400 Bad Request` - Invalid payload, end date before start date or repeated entity ids
/// - `404 Not Found` - Account or entity not found
/// - `409 Conflict` - Name or location ID already used
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/locations",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = LocationRequestDto,
    responses(
        (status = 201, description = "Created location", body = LocationDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account or entity not found", body = ErrorDto),
        (status = 409, description = "Name or location ID already used", body = ErrorDto)
    ),
)]
pub async fn create_location(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<LocationRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::LocationsReadWrite])
        .await?;
    payload.validate()?;

    let location = LocationService::new(&state.db)
        .create(
            tenant_id,
            account_id,
            LocationParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(location.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/accounts/{id}/locations/export",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        ExportParams
    ),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn export_locations(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::LocationsReadExport])
        .await?;

    let file = LocationService::new(&state.db)
        .export(tenant_id, account_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Get location details with the associated entities.
#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 200, description = "Location details", body = LocationDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto)
    ),
)]
pub async fn get_location(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(LOCATION_READERS)
        .await?;

    let location = LocationService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(location.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    request_body = LocationRequestDto,
    responses(
        (status = 200, description = "Updated location", body = LocationDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto),
        (status = 409, description = "Name or location ID already used", body = ErrorDto)
    ),
)]
pub async fn update_location(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<LocationRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::LocationsReadWrite])
        .await?;
    payload.validate()?;

    let location = LocationService::new(&state.db)
        .update(
            tenant_id,
            id,
            LocationParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(location.into_dto())))
}

/// Deactivate or reactivate a location.
///
/// # Access Control
/// - `Locations.ReadActivation`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/locations/{id}/status",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated location", body = LocationDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto)
    ),
)]
pub async fn update_location_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::LocationsReadActivation])
        .await?;

    let location = LocationService::new(&state.db)
        .set_status(tenant_id, id, payload.status.into(), current.executor())
        .await?;

    Ok((StatusCode::OK, Json(location.into_dto())))
}

/// Associate entities of the same account with a location.
///
/// # Access Control
/// - `Locations.ReadWrite`, inside a tenant
#[utoipa::path(
    post,
    path = "/api/locations/{id}/entities",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Location ID")
    ),
    request_body = AssociateEntitiesDto,
    responses(
        (status = 200, description = "Location with its entities", body = LocationDto),
        (status = 400, description = "Repeated entity ids", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Location or entity not found", body = ErrorDto)
    ),
)]
pub async fn associate_location_entities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssociateEntitiesDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::LocationsReadWrite])
        .await?;

    let location = LocationService::new(&state.db)
        .associate_entities(tenant_id, id, &payload.entity_ids, current.executor())
        .await?;

    Ok((StatusCode::OK, Json(location.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}/activities",
    tag = LOCATION_TAG,
    params(
        ("id" = Uuid, Path, description = "Location ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Location not found", body = ErrorDto)
    ),
)]
pub async fn get_location_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(LOCATION_READERS)
        .await?;

    let history = LocationService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
