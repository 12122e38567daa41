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
        api::ErrorDto,
        filter::{CreateTableFilterDto, TableFilterDto, TableFilterParams},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::filter::{CreateTableFilterParams, TableFilter},
        service::table_filter::TableFilterService,
        state::AppState,
    },
};

/// Tag for grouping saved table filter endpoints in OpenAPI documentation
pub static TABLE_FILTER_TAG: &str = "table-filter";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_table_filters, create_table_filter))
        .routes(routes!(delete_table_filter))
}

fn into_dtos(filters: Vec<TableFilter>) -> Vec<TableFilterDto> {
    filters.into_iter().map(TableFilter::into_dto).collect()
}

/// Get the caller's saved filters for one table.
///
/// Filters are private to the user and scoped to the selected tenant, or to the
/// system scope when no tenant is selected.
///
/// # Access Control
/// - `Filters.Read` or `Filters.ReadWrite`
#[utoipa::path(
    get,
    path = "/api/filters",
    tag = TABLE_FILTER_TAG,
    params(TableFilterParams),
    responses(
        (status = 200, description = "Saved filters", body = Vec<TableFilterDto>),
        (status = 403, description = "Missing permission", body = ErrorDto)
    ),
)]
pub async fn get_table_filters(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<TableFilterParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::FiltersRead, Permission::FiltersReadWrite])
        .await?;

    let filters = TableFilterService::new(&state.db)
        .list(current.tenant_id, current.id, params.table_type.into())
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(filters))))
}

/// Save a filter.
///
/// # Access Control
/// - `Filters.ReadWrite`
///
/// # Returns
/// - `201 Created` - Saved filters of the table after the change
/// - `409 Conflict` - The caller already has a filter with that name
#[utoipa::path(
    post,
    path = "/api/filters",
    tag = TABLE_FILTER_TAG,
    request_body = CreateTableFilterDto,
    responses(
        (status = 201, description = "Saved filters", body = Vec<TableFilterDto>),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 409, description = "Name already used", body = ErrorDto)
    ),
)]
pub async fn create_table_filter(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateTableFilterDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::FiltersReadWrite])
        .await?;
    payload.validate()?;

    let filters = TableFilterService::new(&state.db)
        .create(
            current.tenant_id,
            current.id,
            CreateTableFilterParams::from_dto(payload),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(into_dtos(filters))))
}

/// Delete a saved filter.
///
/// # Access Control
/// - `Filters.ReadWrite`
///
/// # Returns
/// - `200 OK` - Remaining saved filters of the same table
/// - `404 Not Found` - No such filter owned by the caller
#[utoipa::path(
    delete,
    path = "/api/filters/{id}",
    tag = TABLE_FILTER_TAG,
    params(
        ("id" = Uuid, Path, description = "Filter ID")
    ),
    responses(
        (status = 200, description = "Remaining filters", body = Vec<TableFilterDto>),
        (status = 403, description = "Missing permission", body = ErrorDto),
        (status = 404, description = "Filter not found", body = ErrorDto)
    ),
)]
pub async fn delete_table_filter(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::FiltersReadWrite])
        .await?;

    let filters = TableFilterService::new(&state.db)
        .delete(current.tenant_id, current.id, id)
        .await?;

    Ok((StatusCode::OK, Json(into_dtos(filters))))
}
