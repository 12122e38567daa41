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
            ActivityDto, ActivityParams, ErrorDto, ExportParams, GridParams, NamedDto, PageDto,
            UpdateStatusDto,
        },
        entity::{AddStateIdsDto, AssociateLocationsDto, EntityDto, EntityRequestDto, StateIdDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            legal_entity::{EntityParams, LegalEntity, StateId, StateIdParams},
            Named,
        },
        service::legal_entity::LegalEntityService,
        state::AppState,
    },
};

/// Tag for grouping entity endpoints in OpenAPI documentation
pub static ENTITY_TAG: &str = "entity";

const ENTITY_READERS: &[Permission] = &[Permission::EntitiesRead, Permission::EntitiesReadWrite];

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_entities, create_entity))
        .routes(routes!(export_entities))
        .routes(routes!(get_entity, update_entity))
        .routes(routes!(update_entity_status))
        .routes(routes!(get_entity_activities))
        .routes(routes!(get_state_ids, add_state_ids))
        .routes(routes!(remove_state_id))
        .routes(routes!(get_entity_locations, associate_entity_locations))
        .routes(routes!(unassociate_entity_location))
}

/// Get a page of the legal entities of an account.
///
/// # Access Control
/// - `Entities.Read`, `Entities.ReadWrite` or `Entities.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/entities",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Page of entities", body = PageDto<EntityDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn get_entities(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::EntitiesRead,
            Permission::EntitiesReadWrite,
            Permission::EntitiesReadExport,
        ])
        .await?;

    let page = LegalEntityService::new(&state.db)
        .get_page(tenant_id, account_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(LegalEntity::into_dto))))
}

/// Create a legal entity in an account, optionally with its state ids.
///
/// The name must be unique within the account; FEIN and EIN must be unique within the
/// tenant.
///
/// # Access Control
/// - `Entities.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - Created entity
/// - `400 Bad Request` - Invalid payload, duplicate FEIN or EIN, or invalid state ids
/// - `404 Not Found` - Account not found
/// - `409 Conflict` - Name already used in the account
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/entities",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = EntityRequestDto,
    responses(
        (status = 201, description = "Created entity", body = EntityDto),
        (status = 400, description = "Invalid payload or duplicate tax id", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto),
        (status = 409, description = "Name already used", body = ErrorDto)
    ),
)]
pub async fn create_entity(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<EntityRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadWrite])
        .await?;
    payload.validate()?;

    let entity = LegalEntityService::new(&state.db)
        .create(
            tenant_id,
            account_id,
            EntityParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entity.into_dto())))
}

/// Export the entities of an account with masked FEINs and their state ids.
///
/// # Access Control
/// - `Entities.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/entities/export",
    tag = ENTITY_TAG,
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
pub async fn export_entities(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadExport])
        .await?;

    let file = LegalEntityService::new(&state.db)
        .export(tenant_id, account_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

#[utoipa::path(
    get,
    path = "/api/entities/{id}",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Entity details", body = EntityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity not found", body = ErrorDto)
    ),
)]
pub async fn get_entity(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(ENTITY_READERS)
        .await?;

    let entity = LegalEntityService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(entity.into_dto())))
}

/// Update a legal entity.
///
/// State ids in the request are ignored here; they have their own endpoints.
///
/// # Access Control
/// - `Entities.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/entities/{id}",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID")
    ),
    request_body = EntityRequestDto,
    responses(
        (status = 200, description = "Updated entity", body = EntityDto),
        (status = 400, description = "Invalid payload or duplicate tax id", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity not found", body = ErrorDto),
        (status = 409, description = "Name already used", body = ErrorDto)
    ),
)]
pub async fn update_entity(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntityRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadWrite])
        .await?;
    payload.validate()?;

    let entity = LegalEntityService::new(&state.db)
        .update(
            tenant_id,
            id,
            EntityParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(entity.into_dto())))
}

#[utoipa::path(
    put,
    path = "/api/entities/{id}/status",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated entity", body = EntityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity not found", body = ErrorDto)
    ),
)]
pub async fn update_entity_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadActivation])
        .await?;

    let entity = LegalEntityService::new(&state.db)
        .set_status(tenant_id, id, payload.status.into(), current.executor())
        .await?;

    Ok((StatusCode::OK, Json(entity.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/entities/{id}/activities",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity not found", body = ErrorDto)
    ),
)]
pub async fn get_entity_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(ENTITY_READERS)
        .await?;

    let history = LegalEntityService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}

/// Get the state ids of an entity ordered by state.
#[utoipa::path(
    get,
    path = "/api/entities/{id}/state-ids",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "State ids", body = Vec<StateIdDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity not found", body = ErrorDto)
    ),
)]
pub async fn get_state_ids(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(ENTITY_READERS)
        .await?;

    let state_ids = LegalEntityService::new(&state.db)
        .state_ids(tenant_id, id)
        .await?;
    let state_ids: Vec<StateIdDto> = state_ids.into_iter().map(StateId::into_dto).collect();

    Ok((StatusCode::OK, Json(state_ids)))
}

/// Add state ids to an entity.
///
/// An entity holds at most 25 state ids and at most one per state.
///
/// # Access Control
/// - `Entities.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - The added state ids
/// - `400 Bad Request` - Limit exceeded or state already present
/// - `404 Not Found` - Entity not found
#[utoipa::path(
    post,
    path = "/api/entities/{id}/state-ids",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID")
    ),
    request_body = AddStateIdsDto,
    responses(
        (status = 201, description = "Added state ids", body = Vec<StateIdDto>),
        (status = 400, description = "Limit exceeded or duplicate state", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity not found", body = ErrorDto)
    ),
)]
pub async fn add_state_ids(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddStateIdsDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadWrite])
        .await?;
    payload.validate()?;

    let params: Vec<StateIdParams> = payload
        .state_ids
        .into_iter()
        .map(StateIdParams::from_dto)
        .collect();
    let added = LegalEntityService::new(&state.db)
        .add_state_ids(tenant_id, id, params, current.executor())
        .await?;
    let added: Vec<StateIdDto> = added.into_iter().map(StateId::into_dto).collect();

    Ok((StatusCode::CREATED, Json(added)))
}

#[utoipa::path(
    delete,
    path = "/api/entities/{id}/state-ids/{state_id}",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID"),
        ("state_id" = Uuid, Path, description = "State id record ID")
    ),
    responses(
        (status = 204, description = "State id removed"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity or state id not found", body = ErrorDto)
    ),
)]
pub async fn remove_state_id(
    State(state): State<AppState>,
    session: Session,
    Path((id, state_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadWrite])
        .await?;

    LegalEntityService::new(&state.db)
        .remove_state_id(tenant_id, id, state_id, current.executor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/entities/{id}/locations",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Associated locations", body = Vec<NamedDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity not found", body = ErrorDto)
    ),
)]
pub async fn get_entity_locations(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::EntitiesRead,
            Permission::EntitiesReadWrite,
            Permission::LocationsRead,
        ])
        .await?;

    let locations = LegalEntityService::new(&state.db)
        .locations(tenant_id, id)
        .await?;
    let locations: Vec<NamedDto> = locations.into_iter().map(Named::into_dto).collect();

    Ok((StatusCode::OK, Json(locations)))
}

/// Associate locations of the same account with an entity.
///
/// Locations that are already associated are skipped.
///
/// # Access Control
/// - `Entities.ReadWrite`, inside a tenant
///
/// # Returns
/// - `200 OK` - Every location associated with the entity after the change
/// - `404 Not Found` - Entity or location not found in the account
#[utoipa::path(
    post,
    path = "/api/entities/{id}/locations",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID")
    ),
    request_body = AssociateLocationsDto,
    responses(
        (status = 200, description = "Associated locations", body = Vec<NamedDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Entity or location not found", body = ErrorDto)
    ),
)]
pub async fn associate_entity_locations(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssociateLocationsDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadWrite])
        .await?;

    let locations = LegalEntityService::new(&state.db)
        .associate_locations(tenant_id, id, &payload.location_ids, current.executor())
        .await?;
    let locations: Vec<NamedDto> = locations.into_iter().map(Named::into_dto).collect();

    Ok((StatusCode::OK, Json(locations)))
}

#[utoipa::path(
    delete,
    path = "/api/entities/{id}/locations/{location_id}",
    tag = ENTITY_TAG,
    params(
        ("id" = Uuid, Path, description = "Entity ID"),
        ("location_id" = Uuid, Path, description = "Location ID")
    ),
    responses(
        (status = 204, description = "Association removed"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Association not found", body = ErrorDto)
    ),
)]
pub async fn unassociate_entity_location(
    State(state): State<AppState>,
    session: Session,
    Path((id, location_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::EntitiesReadWrite])
        .await?;

    LegalEntityService::new(&state.db)
        .unassociate_location(tenant_id, id, location_id, current.executor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
