//! Legal entity domain models and their state registrations.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Status;
use uuid::Uuid;

use crate::{
    model::entity::{EntityDto, EntityRequestDto, StateIdDto, StateIdRequestDto},
    server::{
        export::ExportRecord,
        model::{status_dto, status_label},
        util::{
            date::{format_export_date, format_optional_export_date},
            mask::{
                apply_fein_mask, apply_phone_mask, apply_zip_mask, remove_fein_mask,
                remove_phone_mask, remove_zip_mask,
            },
        },
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct LegalEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub entity_id: String,
    pub doing_business_as: Option<String>,
    pub country: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub entity_type: String,
    pub tax_year_end_type: Option<String>,
    pub date_of_incorporation: Option<DateTime<Utc>>,
    pub fein: Option<String>,
    pub ein: Option<String>,
    pub jurisdiction_id: Option<String>,
    pub primary_naics_code: Option<i32>,
    pub status: Status,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

impl LegalEntity {
    pub fn from_entity(entity: entity::legal_entity::Model) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            account_id: entity.account_id,
            name: entity.name,
            entity_id: entity.entity_id,
            doing_business_as: entity.doing_business_as,
            country: entity.country,
            address1: entity.address1,
            address2: entity.address2,
            city: entity.city,
            state: entity.state,
            zip: entity.zip,
            county: entity.county,
            address: entity.address,
            phone: entity.phone,
            entity_type: entity.entity_type,
            tax_year_end_type: entity.tax_year_end_type,
            date_of_incorporation: entity.date_of_incorporation,
            fein: entity.fein,
            ein: entity.ein,
            jurisdiction_id: entity.jurisdiction_id,
            primary_naics_code: entity.primary_naics_code,
            status: entity.status,
            deactivation_date: entity.deactivation_date,
            reactivation_date: entity.reactivation_date,
            created_date: entity.created_date,
        }
    }

    pub fn into_dto(self) -> EntityDto {
        EntityDto {
            id: self.id,
            account_id: self.account_id,
            name: self.name,
            entity_id: self.entity_id,
            doing_business_as: self.doing_business_as,
            country: self.country,
            address1: self.address1,
            address2: self.address2,
            city: self.city,
            state: self.state,
            zip: self.zip,
            county: self.county,
            address: self.address,
            phone: self.phone,
            entity_type: self.entity_type,
            tax_year_end_type: self.tax_year_end_type,
            date_of_incorporation: self.date_of_incorporation,
            fein: self.fein,
            ein: self.ein,
            jurisdiction_id: self.jurisdiction_id,
            primary_naics_code: self.primary_naics_code,
            status: status_dto(self.status),
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
            created_date: self.created_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateId {
    pub id: Uuid,
    pub entity_id: Uuid,
    pub state: String,
    pub state_id_type: String,
    pub state_id_code: String,
    pub local_jurisdiction: Option<String>,
}

impl StateId {
    pub fn from_entity(entity: entity::state_id::Model) -> Self {
        Self {
            id: entity.id,
            entity_id: entity.entity_id,
            state: entity.state,
            state_id_type: entity.state_id_type,
            state_id_code: entity.state_id_code,
            local_jurisdiction: entity.local_jurisdiction,
        }
    }

    pub fn into_dto(self) -> StateIdDto {
        StateIdDto {
            id: self.id,
            state: self.state,
            state_id_type: self.state_id_type,
            state_id_code: self.state_id_code,
            local_jurisdiction: self.local_jurisdiction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateIdParams {
    pub state: String,
    pub state_id_type: String,
    pub state_id_code: String,
    pub local_jurisdiction: Option<String>,
}

impl StateIdParams {
    pub fn from_dto(dto: StateIdRequestDto) -> Self {
        Self {
            state: dto.state.trim().to_uppercase(),
            state_id_type: dto.state_id_type,
            state_id_code: dto.state_id_code.trim().to_string(),
            local_jurisdiction: dto.local_jurisdiction,
        }
    }
}

/// Entity fields. FEIN, phone and zip are stored without masks.
#[derive(Debug, Clone)]
pub struct EntityParams {
    pub name: String,
    pub entity_id: String,
    pub doing_business_as: Option<String>,
    pub country: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub entity_type: String,
    pub tax_year_end_type: Option<String>,
    pub date_of_incorporation: Option<DateTime<Utc>>,
    pub fein: Option<String>,
    pub ein: Option<String>,
    pub jurisdiction_id: Option<String>,
    pub primary_naics_code: Option<i32>,
    /// Only used on create.
    pub state_ids: Vec<StateIdParams>,
}

impl EntityParams {
    pub fn from_dto(dto: EntityRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            entity_id: dto.entity_id.trim().to_string(),
            doing_business_as: dto.doing_business_as,
            country: dto.country,
            address1: dto.address1,
            address2: dto.address2,
            city: dto.city,
            state: dto.state,
            zip: dto.zip.as_deref().map(remove_zip_mask),
            county: dto.county,
            address: dto.address,
            phone: dto.phone.as_deref().map(remove_phone_mask),
            entity_type: dto.entity_type,
            tax_year_end_type: dto.tax_year_end_type,
            date_of_incorporation: dto.date_of_incorporation,
            fein: dto
                .fein
                .as_deref()
                .map(remove_fein_mask)
                .filter(|f| !f.is_empty()),
            ein: dto.ein.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            jurisdiction_id: dto.jurisdiction_id,
            primary_naics_code: dto.primary_naics_code,
            state_ids: dto.state_ids.into_iter().map(StateIdParams::from_dto).collect(),
        }
    }
}

pub struct EntityExportRow {
    pub entity: LegalEntity,
    /// Ordered by state.
    pub state_ids: Vec<StateId>,
}

impl ExportRecord for EntityExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Entity Name",
        "Entity ID",
        "DBA",
        "Type",
        "Country",
        "Address 1",
        "Address 2",
        "City",
        "State",
        "Zip",
        "County",
        "Phone",
        "FEIN",
        "EIN",
        "Jurisdiction ID",
        "Tax Year End Type",
        "Date of Incorporation",
        "Primary NAICS Code",
        "State IDs",
        "Status",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let e = &self.entity;
        let state_ids = self
            .state_ids
            .iter()
            .map(|s| format!("{}: {}", s.state, s.state_id_code))
            .collect::<Vec<_>>()
            .join(", ");

        vec![
            e.name.clone(),
            e.entity_id.clone(),
            e.doing_business_as.clone().unwrap_or_default(),
            e.entity_type.clone(),
            e.country.clone(),
            e.address1.clone().unwrap_or_default(),
            e.address2.clone().unwrap_or_default(),
            e.city.clone().unwrap_or_default(),
            e.state.clone().unwrap_or_default(),
            e.zip.as_deref().map(apply_zip_mask).unwrap_or_default(),
            e.county.clone().unwrap_or_default(),
            e.phone.as_deref().map(apply_phone_mask).unwrap_or_default(),
            e.fein.as_deref().map(apply_fein_mask).unwrap_or_default(),
            e.ein.clone().unwrap_or_default(),
            e.jurisdiction_id.clone().unwrap_or_default(),
            e.tax_year_end_type.clone().unwrap_or_default(),
            format_optional_export_date(e.date_of_incorporation),
            e.primary_naics_code
                .map(|c| c.to_string())
                .unwrap_or_default(),
            state_ids,
            status_label(e.status).to_string(),
            format_export_date(e.created_date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> LegalEntity {
        LegalEntity {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: "Acme Holdings".to_string(),
            entity_id: "E-1".to_string(),
            doing_business_as: None,
            country: "United States".to_string(),
            address1: None,
            address2: None,
            city: None,
            state: None,
            zip: None,
            county: None,
            address: None,
            phone: None,
            entity_type: "LLC".to_string(),
            tax_year_end_type: None,
            date_of_incorporation: None,
            fein: Some("123456789".to_string()),
            ein: None,
            jurisdiction_id: None,
            primary_naics_code: None,
            status: Status::Active,
            deactivation_date: None,
            reactivation_date: None,
            created_date: Utc::now(),
        }
    }

    fn state_id(state: &str, code: &str) -> StateId {
        StateId {
            id: Uuid::new_v4(),
            entity_id: Uuid::new_v4(),
            state: state.to_string(),
            state_id_type: "Tax".to_string(),
            state_id_code: code.to_string(),
            local_jurisdiction: None,
        }
    }

    #[test]
    fn masks_fein_and_lists_state_ids_in_export() {
        let row = EntityExportRow {
            entity: entity(),
            state_ids: vec![state_id("AL", "A1"), state_id("NY", "N2")],
        };

        let fields = row.fields();

        assert_eq!(fields.len(), EntityExportRow::HEADERS.len());
        assert_eq!(fields[12], "12-3456789");
        assert_eq!(fields[18], "AL: A1, NY: N2");
        assert_eq!(fields[19], "Active");
    }
}
