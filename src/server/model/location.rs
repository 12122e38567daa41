//! Location domain models.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Status;
use uuid::Uuid;

use crate::{
    model::location::{LocationDto, LocationRequestDto},
    server::{
        export::ExportRecord,
        model::{join_names, names_of, status_dto, status_label, Named},
        util::{
            date::{format_export_date, format_optional_export_date},
            mask::{apply_phone_mask, apply_zip_mask, remove_phone_mask, remove_zip_mask},
        },
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub location_id: String,
    pub location_type: String,
    pub country: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub primary_naics_code: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Status,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    /// Associated entities ordered by name.
    pub entities: Vec<Named>,
}

impl Location {
    pub fn from_entity(entity: entity::location::Model, entities: Vec<Named>) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            account_id: entity.account_id,
            name: entity.name,
            location_id: entity.location_id,
            location_type: entity.location_type,
            country: entity.country,
            address1: entity.address1,
            address2: entity.address2,
            city: entity.city,
            state: entity.state,
            zip: entity.zip,
            county: entity.county,
            address: entity.address,
            phone: entity.phone,
            primary_naics_code: entity.primary_naics_code,
            start_date: entity.start_date,
            end_date: entity.end_date,
            status: entity.status,
            deactivation_date: entity.deactivation_date,
            reactivation_date: entity.reactivation_date,
            created_date: entity.created_date,
            entities,
        }
    }

    pub fn into_dto(self) -> LocationDto {
        LocationDto {
            id: self.id,
            account_id: self.account_id,
            name: self.name,
            location_id: self.location_id,
            location_type: self.location_type,
            country: self.country,
            address1: self.address1,
            address2: self.address2,
            city: self.city,
            state: self.state,
            zip: self.zip,
            county: self.county,
            address: self.address,
            phone: self.phone,
            primary_naics_code: self.primary_naics_code,
            start_date: self.start_date,
            end_date: self.end_date,
            status: status_dto(self.status),
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
            created_date: self.created_date,
            entities: self.entities.into_iter().map(Named::into_dto).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationParams {
    pub name: String,
    pub location_id: String,
    pub location_type: String,
    pub country: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub primary_naics_code: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Only used on create.
    pub entity_ids: Vec<Uuid>,
}

impl LocationParams {
    pub fn from_dto(dto: LocationRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            location_id: dto.location_id.trim().to_string(),
            location_type: dto.location_type,
            country: dto.country,
            address1: dto.address1,
            address2: dto.address2,
            city: dto.city,
            state: dto.state,
            zip: dto.zip.as_deref().map(remove_zip_mask),
            county: dto.county,
            address: dto.address,
            phone: dto.phone.as_deref().map(remove_phone_mask),
            primary_naics_code: dto.primary_naics_code,
            start_date: dto.start_date,
            end_date: dto.end_date,
            entity_ids: dto.entity_ids,
        }
    }

    /// End date may not precede the start date.
    pub fn has_valid_period(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => end >= start,
            _ => true,
        }
    }
}

pub struct LocationExportRow(pub Location);

impl ExportRecord for LocationExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Location Name",
        "Location ID",
        "Type",
        "Country",
        "Address 1",
        "Address 2",
        "City",
        "State",
        "Zip",
        "County",
        "Phone",
        "Primary NAICS Code",
        "Start Date",
        "End Date",
        "Entities",
        "Status",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let l = &self.0;
        vec![
            l.name.clone(),
            l.location_id.clone(),
            l.location_type.clone(),
            l.country.clone(),
            l.address1.clone().unwrap_or_default(),
            l.address2.clone().unwrap_or_default(),
            l.city.clone().unwrap_or_default(),
            l.state.clone().unwrap_or_default(),
            l.zip.as_deref().map(apply_zip_mask).unwrap_or_default(),
            l.county.clone().unwrap_or_default(),
            l.phone.as_deref().map(apply_phone_mask).unwrap_or_default(),
            l.primary_naics_code
                .map(|c| c.to_string())
                .unwrap_or_default(),
            format_optional_export_date(l.start_date),
            format_optional_export_date(l.end_date),
            join_names(&names_of(&l.entities)),
            status_label(l.status).to_string(),
            format_export_date(l.created_date),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn params(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> LocationParams {
        LocationParams {
            name: "Plant".to_string(),
            location_id: "L-1".to_string(),
            location_type: "Warehouse".to_string(),
            country: "United States".to_string(),
            address1: None,
            address2: None,
            city: None,
            state: None,
            zip: None,
            county: None,
            address: None,
            phone: None,
            primary_naics_code: None,
            start_date: start,
            end_date: end,
            entity_ids: Vec::new(),
        }
    }

    #[test]
    fn rejects_end_before_start() {
        let now = Utc::now();

        assert!(params(Some(now), Some(now)).has_valid_period());
        assert!(params(Some(now), None).has_valid_period());
        assert!(params(None, Some(now)).has_valid_period());
        assert!(!params(Some(now), Some(now - Duration::days(1))).has_valid_period());
    }
}
