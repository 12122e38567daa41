//! Tenant domain models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    model::tenant::TenantDto,
    server::{export::ExportRecord, util::date::format_export_date},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub division_enabled: bool,
    pub created_date: DateTime<Utc>,
}

impl Tenant {
    pub fn from_entity(entity: entity::tenant::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            division_enabled: entity.division_enabled,
            created_date: entity.created_date,
        }
    }

    pub fn into_dto(self) -> TenantDto {
        TenantDto {
            id: self.id,
            name: self.name,
            division_enabled: self.division_enabled,
            created_date: self.created_date,
        }
    }
}

/// Values captured in `TenantUpdated` snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSnapshot {
    pub name: String,
}

pub struct TenantExportRow(pub Tenant);

impl ExportRecord for TenantExportRow {
    const HEADERS: &'static [&'static str] = &["Name", "Creation Date"];

    fn fields(&self) -> Vec<String> {
        vec![self.0.name.clone(), format_export_date(self.0.created_date)]
    }
}
