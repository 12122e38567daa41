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
        contact::{
            AccountContactDto, AssignContactDto, ContactDto, ContactRequestDto,
            CreateAccountContactDto, LinkContactDto, LinkedContactDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::contact::{AccountContact, Contact, ContactParams, LinkedContact},
        service::contact::ContactService,
        state::AppState,
    },
};

/// Tag for grouping contact endpoints in OpenAPI documentation
pub static CONTACT_TAG: &str = "contact";

const CONTACT_READERS: &[Permission] = &[Permission::ContactsRead, Permission::ContactsReadWrite];

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_contacts))
        .routes(routes!(export_contacts))
        .routes(routes!(get_contact, update_contact))
        .routes(routes!(get_contact_activities))
        .routes(routes!(get_linked_contacts, link_contact))
        .routes(routes!(unlink_contact))
        .routes(routes!(get_account_contacts, create_account_contact))
        .routes(routes!(export_account_contacts))
        .routes(routes!(
            get_account_contact,
            assign_account_contact,
            unassociate_account_contact
        ))
        .routes(routes!(update_account_contact_status))
}

/// Get a page of the contacts of the selected tenant.
///
/// # Access Control
/// - `Contacts.Read`, `Contacts.ReadWrite` or `Contacts.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = CONTACT_TAG,
    params(GridParams),
    responses(
        (status = 200, description = "Page of contacts", body = PageDto<ContactDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_contacts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::ContactsRead,
            Permission::ContactsReadWrite,
            Permission::ContactsReadExport,
        ])
        .await?;

    let page = ContactService::new(&state.db)
        .get_page(tenant_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(Contact::into_dto))))
}

#[utoipa::path(
    get,
    path = "/api/contacts/export",
    tag = CONTACT_TAG,
    params(ExportParams),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_contacts(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadExport])
        .await?;

    let file = ContactService::new(&state.db)
        .export(tenant_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Get contact details with the accounts the contact is linked to.
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Contact details", body = ContactDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not found", body = ErrorDto)
    ),
)]
pub async fn get_contact(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(CONTACT_READERS)
        .await?;

    let contact = ContactService::new(&state.db).get(tenant_id, id).await?;

    Ok((StatusCode::OK, Json(contact.into_dto())))
}

/// Update a contact.
///
/// Phone and zip masks are stripped before storing; the email is lowercased.
///
/// # Access Control
/// - `Contacts.ReadWrite`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    request_body = ContactRequestDto,
    responses(
        (status = 200, description = "Updated contact", body = ContactDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not found", body = ErrorDto)
    ),
)]
pub async fn update_contact(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadWrite])
        .await?;
    payload.validate()?;

    let contact = ContactService::new(&state.db)
        .update(
            tenant_id,
            id,
            ContactParams::from_dto(payload),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(contact.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}/activities",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Contact ID"),
        ActivityParams
    ),
    responses(
        (status = 200, description = "Activity history", body = ActivityDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not found", body = ErrorDto)
    ),
)]
pub async fn get_contact_activities(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(CONTACT_READERS)
        .await?;

    let history = ContactService::new(&state.db)
        .activities(tenant_id, id, params.page, params.page_size)
        .await?;

    Ok((StatusCode::OK, Json(history.into_activity_dto())))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}/linked-contacts",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Linked contacts", body = Vec<LinkedContactDto>),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not found", body = ErrorDto)
    ),
)]
pub async fn get_linked_contacts(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(CONTACT_READERS)
        .await?;

    let linked = ContactService::new(&state.db)
        .linked_contacts(tenant_id, id)
        .await?;
    let linked: Vec<LinkedContactDto> = linked.into_iter().map(LinkedContact::into_dto).collect();

    Ok((StatusCode::OK, Json(linked)))
}

/// Link two contacts to each other.
///
/// The link is stored in both directions and recorded on both contacts.
///
/// # Access Control
/// - `Contacts.ReadWrite`, inside a tenant
///
/// # Returns
/// - `204 No Content` - Contacts linked
/// - `400 Bad Request` - Contact linked to itself
/// - `404 Not Found` - Either contact not found
/// - `409 Conflict` - Contacts already linked
#[utoipa::path(
    post,
    path = "/api/contacts/{id}/linked-contacts",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Contact ID")
    ),
    request_body = LinkContactDto,
    responses(
        (status = 204, description = "Contacts linked"),
        (status = 400, description = "Invalid link", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not found", body = ErrorDto),
        (status = 409, description = "Contacts already linked", body = ErrorDto)
    ),
)]
pub async fn link_contact(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<LinkContactDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadWrite])
        .await?;
    payload.validate()?;

    ContactService::new(&state.db)
        .link(
            tenant_id,
            id,
            payload.related_contact_id,
            payload.comment,
            current.executor(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}/linked-contacts/{related_contact_id}",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Contact ID"),
        ("related_contact_id" = Uuid, Path, description = "Linked contact ID")
    ),
    responses(
        (status = 204, description = "Contacts unlinked"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contacts are not linked", body = ErrorDto)
    ),
)]
pub async fn unlink_contact(
    State(state): State<AppState>,
    session: Session,
    Path((id, related_contact_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadWrite])
        .await?;

    ContactService::new(&state.db)
        .unlink(tenant_id, id, related_contact_id, current.executor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get a page of the contacts linked to an account.
///
/// # Access Control
/// - `Contacts.Read` or `Contacts.ReadWrite`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/contacts",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Page of account contacts", body = PageDto<AccountContactDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn get_account_contacts(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(CONTACT_READERS)
        .await?;

    let page = ContactService::new(&state.db)
        .get_account_contacts(tenant_id, account_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(AccountContact::into_dto))))
}

/// Create a contact and link it to an account.
///
/// # Access Control
/// - `Contacts.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - Created contact as seen from the account
/// - `400 Bad Request` - Invalid payload
/// - `404 Not Found` - Account not found
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/contacts",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = CreateAccountContactDto,
    responses(
        (status = 201, description = "Created contact", body = AccountContactDto),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn create_account_contact(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<CreateAccountContactDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadWrite])
        .await?;
    payload.validate()?;

    let contact = ContactService::new(&state.db)
        .create_in_account(
            tenant_id,
            account_id,
            ContactParams::from_dto(payload.contact),
            payload.contact_type,
            current.executor(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(contact.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/accounts/{id}/contacts/export",
    tag = CONTACT_TAG,
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
pub async fn export_account_contacts(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadExport])
        .await?;

    let file = ContactService::new(&state.db)
        .export_account_contacts(tenant_id, account_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

#[utoipa::path(
    get,
    path = "/api/accounts/{id}/contacts/{contact_id}",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        ("contact_id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Account contact", body = AccountContactDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not linked to the account", body = ErrorDto)
    ),
)]
pub async fn get_account_contact(
    State(state): State<AppState>,
    session: Session,
    Path((account_id, contact_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(CONTACT_READERS)
        .await?;

    let contact = ContactService::new(&state.db)
        .get_account_contact(tenant_id, account_id, contact_id)
        .await?;

    Ok((StatusCode::OK, Json(contact.into_dto())))
}

/// Link an existing contact to another account.
///
/// # Access Control
/// - `Contacts.ReadWrite`, inside a tenant
///
/// # Returns
/// - `204 No Content` - Contact linked
/// - `404 Not Found` - Account or contact not found
/// - `409 Conflict` - Contact already linked to the account
#[utoipa::path(
    put,
    path = "/api/accounts/{id}/contacts/{contact_id}",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        ("contact_id" = Uuid, Path, description = "Contact ID")
    ),
    request_body = AssignContactDto,
    responses(
        (status = 204, description = "Contact linked"),
        (status = 400, description = "Invalid payload", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account or contact not found", body = ErrorDto),
        (status = 409, description = "Contact already linked", body = ErrorDto)
    ),
)]
pub async fn assign_account_contact(
    State(state): State<AppState>,
    session: Session,
    Path((account_id, contact_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AssignContactDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadWrite])
        .await?;
    payload.validate()?;

    ContactService::new(&state.db)
        .assign_to_account(
            tenant_id,
            account_id,
            contact_id,
            payload.contact_type,
            current.executor(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove the link between a contact and an account.
///
/// A contact always keeps at least one account, so removing the last link fails.
///
/// # Access Control
/// - `Contacts.ReadWrite`, inside a tenant
#[utoipa::path(
    delete,
    path = "/api/accounts/{id}/contacts/{contact_id}",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        ("contact_id" = Uuid, Path, description = "Contact ID")
    ),
    responses(
        (status = 204, description = "Contact unlinked"),
        (status = 400, description = "Last account of the contact", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not linked to the account", body = ErrorDto)
    ),
)]
pub async fn unassociate_account_contact(
    State(state): State<AppState>,
    session: Session,
    Path((account_id, contact_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsReadWrite])
        .await?;

    ContactService::new(&state.db)
        .unassociate_from_account(tenant_id, account_id, contact_id, current.executor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate or reactivate a contact within one account.
///
/// # Access Control
/// - `Contacts.Activation`, inside a tenant
#[utoipa::path(
    put,
    path = "/api/accounts/{id}/contacts/{contact_id}/status",
    tag = CONTACT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        ("contact_id" = Uuid, Path, description = "Contact ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated account contact", body = AccountContactDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Contact not linked to the account", body = ErrorDto)
    ),
)]
pub async fn update_account_contact_status(
    State(state): State<AppState>,
    session: Session,
    Path((account_id, contact_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::ContactsActivation])
        .await?;

    let contact = ContactService::new(&state.db)
        .set_account_contact_status(
            tenant_id,
            account_id,
            contact_id,
            payload.status.into(),
            current.executor(),
        )
        .await?;

    Ok((StatusCode::OK, Json(contact.into_dto())))
}
