//! Program catalogue and tenant program models.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Status;
use uuid::Uuid;

use crate::{
    model::{
        program::{ProgramDto, ProgramRequestDto},
        tenant::TenantProgramDto,
    },
    server::{
        export::ExportRecord,
        model::{status_dto, status_label, Named},
        util::date::{format_export_date, format_optional_export_date},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub reference: Option<String>,
    pub overview: Option<String>,
    pub legal_authority: Option<String>,
    pub agency: Option<String>,
    pub jurisdiction: String,
    pub jurisdiction_name: Option<String>,
    pub incentives_area: Option<String>,
    pub incentives_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Status,
    pub created_date: DateTime<Utc>,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

impl Program {
    pub fn from_entity(entity: entity::program::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            reference: entity.reference,
            overview: entity.overview,
            legal_authority: entity.legal_authority,
            agency: entity.agency,
            jurisdiction: entity.jurisdiction,
            jurisdiction_name: entity.jurisdiction_name,
            incentives_area: entity.incentives_area,
            incentives_type: entity.incentives_type,
            start_date: entity.start_date,
            end_date: entity.end_date,
            status: entity.status,
            created_date: entity.created_date,
            deactivation_date: entity.deactivation_date,
            reactivation_date: entity.reactivation_date,
        }
    }

    pub fn into_dto(self) -> ProgramDto {
        ProgramDto {
            id: self.id,
            name: self.name,
            reference: self.reference,
            overview: self.overview,
            legal_authority: self.legal_authority,
            agency: self.agency,
            jurisdiction: self.jurisdiction,
            jurisdiction_name: self.jurisdiction_name,
            incentives_area: self.incentives_area,
            incentives_type: self.incentives_type,
            start_date: self.start_date,
            end_date: self.end_date,
            status: status_dto(self.status),
            created_date: self.created_date,
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgramParams {
    pub name: String,
    pub reference: Option<String>,
    pub overview: Option<String>,
    pub legal_authority: Option<String>,
    pub agency: Option<String>,
    pub jurisdiction: String,
    pub jurisdiction_name: Option<String>,
    pub incentives_area: Option<String>,
    pub incentives_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ProgramParams {
    pub fn from_dto(dto: ProgramRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            reference: dto.reference,
            overview: dto.overview,
            legal_authority: dto.legal_authority,
            agency: dto.agency,
            jurisdiction: dto.jurisdiction,
            jurisdiction_name: dto.jurisdiction_name,
            incentives_area: dto.incentives_area,
            incentives_type: dto.incentives_type,
            start_date: dto.start_date,
            end_date: dto.end_date,
        }
    }
}

/// Program as assigned to a tenant, with the tenant's own status and org units.
#[derive(Debug, Clone, PartialEq)]
pub struct TenantProgram {
    pub program_id: Uuid,
    pub name: String,
    pub reference: Option<String>,
    pub jurisdiction: String,
    pub jurisdiction_name: Option<String>,
    pub status: Status,
    pub department: Option<Named>,
    pub service_area: Option<Named>,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

impl TenantProgram {
    pub fn into_dto(self) -> TenantProgramDto {
        TenantProgramDto {
            program_id: self.program_id,
            name: self.name,
            reference: self.reference,
            jurisdiction: self.jurisdiction,
            jurisdiction_name: self.jurisdiction_name,
            status: status_dto(self.status),
            department_id: self.department.as_ref().map(|d| d.id),
            department: self.department.map(|d| d.name),
            service_area_id: self.service_area.as_ref().map(|s| s.id),
            service_area: self.service_area.map(|s| s.name),
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
        }
    }
}

pub struct ProgramExportRow(pub Program);

impl ExportRecord for ProgramExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Name",
        "Reference",
        "Overview",
        "Legal Authority",
        "Agency",
        "Jurisdiction",
        "Jurisdiction Name",
        "Incentives Area",
        "Incentives Type",
        "Start Date",
        "End Date",
        "Status",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let p = &self.0;
        vec![
            p.name.clone(),
            p.reference.clone().unwrap_or_default(),
            p.overview.clone().unwrap_or_default(),
            p.legal_authority.clone().unwrap_or_default(),
            p.agency.clone().unwrap_or_default(),
            p.jurisdiction.clone(),
            p.jurisdiction_name.clone().unwrap_or_default(),
            p.incentives_area.clone().unwrap_or_default(),
            p.incentives_type.clone().unwrap_or_default(),
            format_optional_export_date(p.start_date),
            format_optional_export_date(p.end_date),
            status_label(p.status).to_string(),
            format_export_date(p.created_date),
        ]
    }
}
