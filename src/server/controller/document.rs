use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    model::{
        api::{ErrorDto, ExportParams, GridParams, PageDto},
        document::{DocumentDto, UploadDocumentForm},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::document::{Document, UploadParams},
        service::document::DocumentService,
        state::AppState,
    },
};

/// Tag for grouping document endpoints in OpenAPI documentation
pub static DOCUMENT_TAG: &str = "document";

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_documents, upload_document))
        .routes(routes!(export_documents))
        .routes(routes!(download_document))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Get a page of the documents uploaded to an account, newest first.
///
/// # Access Control
/// - `Documents.Read`, `Documents.ReadWrite` or `Documents.ReadExport`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/documents",
    tag = DOCUMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        GridParams
    ),
    responses(
        (status = 200, description = "Page of documents", body = PageDto<DocumentDto>),
        (status = 400, description = "Malformed grid query", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn get_documents(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<GridParams>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[
            Permission::DocumentsRead,
            Permission::DocumentsReadWrite,
            Permission::DocumentsReadExport,
        ])
        .await?;

    let page = DocumentService::new(&state.db, &state.storage)
        .get_page(tenant_id, account_id, &params)
        .await?;

    Ok((StatusCode::OK, Json(page.into_dto(Document::into_dto))))
}

/// Upload a document to an account.
///
/// Expects a multipart body with a single `file` part. The file name and content type
/// of that part are kept as document metadata.
///
/// # Access Control
/// - `Documents.ReadWrite`, inside a tenant
///
/// # Returns
/// - `201 Created` - Stored document metadata
/// - `400 Bad Request` - Missing or empty `file` part
/// - `404 Not Found` - Account not found
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/documents",
    tag = DOCUMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Uploaded document", body = DocumentDto),
        (status = 400, description = "Missing or empty file", body = ErrorDto),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Account not found", body = ErrorDto)
    ),
)]
pub async fn upload_document(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DocumentsReadWrite])
        .await?;

    let upload = read_file_part(multipart).await?;

    let document = DocumentService::new(&state.db, &state.storage)
        .upload(tenant_id, account_id, upload, current.executor())
        .await?;

    Ok((StatusCode::CREATED, Json(document.into_dto())))
}

#[utoipa::path(
    get,
    path = "/api/accounts/{id}/documents/export",
    tag = DOCUMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        ExportParams
    ),
    responses(
        (status = 200, description = "Exported file", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto)
    ),
)]
pub async fn export_documents(
    State(state): State<AppState>,
    session: Session,
    Path(account_id): Path<Uuid>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let (current, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DocumentsReadExport])
        .await?;

    let file = DocumentService::new(&state.db, &state.storage)
        .export(tenant_id, account_id, params.file_type, current.executor())
        .await?;

    Ok(file)
}

/// Download the content of a document.
///
/// # Access Control
/// - `Documents.Read` or `Documents.ReadWrite`, inside a tenant
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = DOCUMENT_TAG,
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document content", content_type = "application/octet-stream"),
        (status = 403, description = "Missing permission or no tenant selected", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto)
    ),
)]
pub async fn download_document(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (_, tenant_id) = AuthGuard::new(&state.db, &session)
        .require_tenant(&[Permission::DocumentsRead, Permission::DocumentsReadWrite])
        .await?;

    let (document, bytes) = DocumentService::new(&state.db, &state.storage)
        .download(tenant_id, id)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, document.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.name),
            ),
        ],
        bytes,
    ))
}

/// Reads the `file` part of an upload. Other parts are ignored.
async fn read_file_part(mut multipart: Multipart) -> Result<UploadParams, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("document").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        return Ok(UploadParams {
            name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::BadRequest("Missing file part".to_string()))
}
