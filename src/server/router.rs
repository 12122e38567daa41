use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        account, auth, contact, department, division, document, job_title, legal_entity,
        location, program, role, search, service_area, table_filter, team, tenant, user,
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "TaxBeacon API", description = "Multi-tenant business management"),
    tags(
        (name = "auth", description = "Sign-in, sign-out and tenant selection"),
        (name = "user", description = "Users of the system and of tenants"),
        (name = "role", description = "Roles, permissions and role membership"),
        (name = "tenant", description = "Tenant administration"),
        (name = "division", description = "Tenant divisions"),
        (name = "department", description = "Tenant departments"),
        (name = "service-area", description = "Department service areas"),
        (name = "job-title", description = "Department job titles"),
        (name = "team", description = "Tenant teams"),
        (name = "program", description = "Programs and their tenant assignment"),
        (name = "account", description = "Accounts with client and referral parts"),
        (name = "contact", description = "Contacts and their account links"),
        (name = "entity", description = "Legal entities of accounts"),
        (name = "location", description = "Locations of accounts"),
        (name = "document", description = "Account documents"),
        (name = "search", description = "Search across the tenant"),
        (name = "table-filter", description = "Saved grid filters")
    )
)]
struct ApiDoc;

/// Builds the API router and serves its OpenAPI document through Swagger UI.
pub fn router() -> axum::Router<AppState> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(auth::routes())
        .merge(user::routes())
        .merge(role::routes())
        .merge(tenant::routes())
        .merge(division::routes())
        .merge(department::routes())
        .merge(service_area::routes())
        .merge(job_title::routes())
        .merge(team::routes())
        .merge(program::routes())
        .merge(account::routes())
        .merge(contact::routes())
        .merge(legal_entity::routes())
        .merge(location::routes())
        .merge(document::routes())
        .merge(search::routes())
        .merge(table_filter::routes())
        .split_for_parts();

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
}
