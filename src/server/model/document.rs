//! Account document metadata. File contents live in `DocumentStorage`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    model::document::DocumentDto,
    server::{export::ExportRecord, util::date::format_export_date},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub account_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub content_type: String,
    pub size: i64,
    /// Full name of the uploader.
    pub uploaded_by: String,
    pub created_date: DateTime<Utc>,
}

impl Document {
    pub fn from_entity(entity: entity::document::Model, uploaded_by: String) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            account_id: entity.account_id,
            user_id: entity.user_id,
            name: entity.name,
            content_type: entity.content_type,
            size: entity.size,
            uploaded_by,
            created_date: entity.created_date,
        }
    }

    pub fn into_dto(self) -> DocumentDto {
        DocumentDto {
            id: self.id,
            account_id: self.account_id,
            name: self.name,
            content_type: self.content_type,
            size: self.size,
            uploaded_by: self.uploaded_by,
            created_date: self.created_date,
        }
    }
}

/// Uploaded file as read from the multipart body.
#[derive(Debug, Clone)]
pub struct UploadParams {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct DocumentExportRow(pub Document);

impl ExportRecord for DocumentExportRow {
    const HEADERS: &'static [&'static str] =
        &["Document Name", "Content Type", "Size", "Uploaded By", "Upload Date"];

    fn fields(&self) -> Vec<String> {
        let d = &self.0;
        vec![
            d.name.clone(),
            d.content_type.clone(),
            d.size.to_string(),
            d.uploaded_by.clone(),
            format_export_date(d.created_date),
        ]
    }
}
