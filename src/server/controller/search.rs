use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    model::{
        api::{ErrorDto, PageDto},
        search::{SearchParams, SearchResultDto},
    },
    server::{
        error::{auth::AuthError, AppError},
        middleware::auth::AuthGuard,
        model::search::SearchResult,
        service::search::{readable_types, SearchService},
        state::AppState,
    },
};

/// Tag for grouping search endpoints in OpenAPI documentation
pub static SEARCH_TAG: &str = "search";

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(search))
}

/// Search users, accounts, contacts, entities and locations of the selected tenant.
///
/// Matches are case-insensitive substring matches on names and secondary text. Only
/// the types the caller can read are searched.
///
/// # Access Control
/// - Read access to at least one searchable type, inside a tenant
///
/// # Returns
/// - `200 OK` - Page of results ordered by name
/// - `400 Bad Request` - Empty search text
/// - `403 Forbidden` - No searchable type is readable
#[utoipa::path(
    get,
    path = "/api/search",
    tag = SEARCH_TAG,
    params(SearchParams),
    responses(
        (status = 200, description = "Search results", body = PageDto<SearchResultDto>),
        (status = 400, description = "Empty search text", body = ErrorDto),
        (status = 403, description = "Nothing searchable or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[])
        .await?;

    let types = readable_types(&current);
    if types.is_empty() {
        return Err(AuthError::AccessDenied(
            current.id,
            "no searchable type is readable".to_string(),
        )
        .into());
    }

    let page = SearchService::new(&state.db)
        .search(
            tenant_id,
            &types,
            &params.text,
            params.page,
            params.page_size,
        )
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(SearchResult::into_dto))))
}
