//! Contact domain models. A contact belongs to the tenant and is attached to one or more
//! accounts through account links that carry their own type and status.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Status;
use uuid::Uuid;

use crate::{
    model::contact::{AccountContactDto, ContactDto, ContactRequestDto, LinkedContactDto},
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
pub struct Contact {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub secondary_email: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub address: Option<String>,
    pub created_date: DateTime<Utc>,
    /// Accounts the contact is linked to, ordered by name.
    pub accounts: Vec<Named>,
}

impl Contact {
    pub fn from_entity(entity: entity::contact::Model, accounts: Vec<Named>) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            full_name: entity.full_name,
            email: entity.email,
            secondary_email: entity.secondary_email,
            job_title: entity.job_title,
            phone: entity.phone,
            mobile_phone: entity.mobile_phone,
            country: entity.country,
            city: entity.city,
            state: entity.state,
            zip: entity.zip,
            address: entity.address,
            created_date: entity.created_date,
            accounts,
        }
    }

    pub fn into_dto(self) -> ContactDto {
        ContactDto {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            email: self.email,
            secondary_email: self.secondary_email,
            job_title: self.job_title,
            phone: self.phone,
            mobile_phone: self.mobile_phone,
            country: self.country,
            city: self.city,
            state: self.state,
            zip: self.zip,
            address: self.address,
            created_date: self.created_date,
            accounts: self.accounts.into_iter().map(Named::into_dto).collect(),
        }
    }
}

/// A contact as listed under one account.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountContact {
    pub contact_id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub contact_type: String,
    pub status: Status,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

impl AccountContact {
    pub fn from_entities(
        link: entity::account_contact::Model,
        contact: entity::contact::Model,
    ) -> Self {
        Self {
            contact_id: contact.id,
            account_id: link.account_id,
            full_name: contact.full_name,
            email: contact.email,
            job_title: contact.job_title,
            phone: contact.phone,
            contact_type: link.contact_type,
            status: link.status,
            deactivation_date: link.deactivation_date,
            reactivation_date: link.reactivation_date,
        }
    }

    pub fn into_dto(self) -> AccountContactDto {
        AccountContactDto {
            id: self.contact_id,
            account_id: self.account_id,
            full_name: self.full_name,
            email: self.email,
            job_title: self.job_title,
            phone: self.phone,
            contact_type: self.contact_type,
            status: status_dto(self.status),
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkedContact {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub comment: Option<String>,
}

impl LinkedContact {
    pub fn from_entities(
        link: entity::linked_contact::Model,
        contact: entity::contact::Model,
    ) -> Self {
        Self {
            id: contact.id,
            full_name: contact.full_name,
            email: contact.email,
            job_title: contact.job_title,
            phone: contact.phone,
            comment: link.comment,
        }
    }

    pub fn into_dto(self) -> LinkedContactDto {
        LinkedContactDto {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            job_title: self.job_title,
            phone: self.phone,
            comment: self.comment,
        }
    }
}

/// Contact fields. Phone numbers and zip are stored without masks.
#[derive(Debug, Clone)]
pub struct ContactParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub secondary_email: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub address: Option<String>,
}

impl ContactParams {
    pub fn from_dto(dto: ContactRequestDto) -> Self {
        Self {
            first_name: dto.first_name.trim().to_string(),
            last_name: dto.last_name.trim().to_string(),
            email: dto.email.trim().to_lowercase(),
            secondary_email: dto.secondary_email.map(|e| e.trim().to_lowercase()),
            job_title: dto.job_title,
            phone: dto.phone.as_deref().map(remove_phone_mask),
            mobile_phone: dto.mobile_phone.as_deref().map(remove_phone_mask),
            country: dto.country,
            city: dto.city,
            state: dto.state,
            zip: dto.zip.as_deref().map(remove_zip_mask),
            address: dto.address,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub struct ContactExportRow(pub Contact);

impl ExportRecord for ContactExportRow {
    const HEADERS: &'static [&'static str] = &[
        "First Name",
        "Last Name",
        "Email",
        "Secondary Email",
        "Job Title",
        "Phone",
        "Mobile Phone",
        "Country",
        "City",
        "State",
        "Zip",
        "Address",
        "Accounts",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let c = &self.0;
        vec![
            c.first_name.clone(),
            c.last_name.clone(),
            c.email.clone(),
            c.secondary_email.clone().unwrap_or_default(),
            c.job_title.clone().unwrap_or_default(),
            c.phone.as_deref().map(apply_phone_mask).unwrap_or_default(),
            c.mobile_phone.as_deref().map(apply_phone_mask).unwrap_or_default(),
            c.country.clone().unwrap_or_default(),
            c.city.clone().unwrap_or_default(),
            c.state.clone().unwrap_or_default(),
            c.zip.as_deref().map(apply_zip_mask).unwrap_or_default(),
            c.address.clone().unwrap_or_default(),
            join_names(&names_of(&c.accounts)),
            format_export_date(c.created_date),
        ]
    }
}

pub struct AccountContactExportRow(pub AccountContact);

impl ExportRecord for AccountContactExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Full Name",
        "Email",
        "Job Title",
        "Phone",
        "Type",
        "Status",
        "Deactivation Date",
        "Reactivation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let c = &self.0;
        vec![
            c.full_name.clone(),
            c.email.clone(),
            c.job_title.clone().unwrap_or_default(),
            c.phone.as_deref().map(apply_phone_mask).unwrap_or_default(),
            c.contact_type.clone(),
            status_label(c.status).to_string(),
            format_optional_export_date(c.deactivation_date),
            format_optional_export_date(c.reactivation_date),
        ]
    }
}
