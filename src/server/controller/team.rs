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
        org_unit::{TeamDto, TeamRequestDto, OrgUnitUserDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::org_unit::{org_unit_user_dto, Team, TeamParams},
        service::team::TeamService,
        state::AppState,
    },
};

/// Tag for grouping team endpoints in OpenAPI documentation
pub static TEAM_TAG: &str = "team";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_teams, create_team))
        .routes(routes!(export_teams))
        .routes(routes!(get_team, update_team))
        .routes(routes!(get_team_users))
        .routes(routes!(get_team_activities))
}

/// Get a page of teams with their number of users.
///
/// # Access Control
/// - `Teams.Read`, `Teams.ReadWrite` or `Teams.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = TEAM_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of teams", body = PageDto<TeamDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_teams(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::TeamsRead,
            Permission::TeamsReadWrite,
            Permission::TeamsReadExport,
        ])
        .await?;

    let page = TeamService::new(&state.db)
        .get_page(tenant_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(Team::into_dto))))
}

/// Create a team.
///
/// # Access Control
/// - `Teams.ReadWrite`, inside a tenant
#[utoipa::path(
    post,
    path = "/api/teams",
    tag = TEAM_TAG,
    request_body = TeamRequestDto,
    responses(
        (status = 201, description = "Created team", body = TeamDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 409, description = "Name already taken", body = ErrorDto)
    ),
)]
pub async fn create_team(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<TeamRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::TeamsReadWrite])
        .await?;
    payload.validate()?;

    let team = TeamService::new(&state.db)
        .create(
            tenant_id,
            TeamParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(team.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/teams/export",
    tag = TEAM_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_teams(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::TeamsReadExport])
        .await?;

    let file = TeamService::new(&state.db)
        .export(tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = TEAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Team ID")
    ),
    responses(
        (status = 200, description = "Team details", body = TeamDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Team not found", body = ErrorDto)
    ),
)]
pub async fn get_team(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::TeamsRead, Permission::TeamsReadWrite])
        .await?;

    let team = TeamService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(team.into_dto())))
}

/// Update a team's name and description.
///
/// # Access Control
/// - `Teams.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    tag = TEAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Team ID")
    ),
    request_body = TeamRequestDto,
    responses(
        (status = 200, description = "Updated team", body = TeamDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Team not found", body = ErrorDto)
    ),
)]
pub async fn update_team(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeamRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::TeamsReadWrite])
        .await?;
    payload.validate()?;

    let team = TeamService::new(&state.db)
        .update(
            tenant_id,
            id,
            TeamParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(team.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}/users",
    tag = TEAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Team ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Team users", body = PageDto<OrgUnitUserDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Team not found", body = ErrorDto)
    ),
)]
pub async fn get_team_users(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::TeamsRead, Permission::TeamsReadWrite])
        .await?;

    let page = TeamService::new(&state.db)
        .users(tenant_id, id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(org_unit_user_dto))))
}

#[utoipa::path(
    get,
    path = "/api/teams/{id}/activities",
    tag = TEAM_TAG,
    params(
        ("id" = Uuid, Path, description = "Team ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Team not found", body = ErrorDto)
    ),
)]
pub async fn get_team_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::TeamsRead, Permission::TeamsReadWrite])
        .await?;

    let history = TeamService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}
