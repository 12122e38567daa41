//! Account domain models. An account may additionally be a client and/or a referral.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{AccountPart, ClientState, ReferralState, Status};
use uuid::Uuid;

use crate::{
    model::account::{
        AccountDetailsDto, AccountDto, AccountRequestDto, ClientDto,
        ClientStateDto, ReferralDto, ReferralStateDto,
    },
    server::{
        export::ExportRecord,
        model::{status_dto, status_label},
        util::{
            date::{days_open, format_export_date},
            mask::{apply_phone_mask, apply_zip_mask, remove_phone_mask, remove_zip_mask},
        },
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub state: ClientState,
    pub status: Status,
    pub created_date: Option<DateTime<Utc>>,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

impl Client {
    pub fn days_open(&self, now: DateTime<Utc>) -> Option<i64> {
        let deactivated = match self.status {
            Status::Deactivated => self.deactivation_date,
            Status::Active => None,
        };

        self.created_date
            .map(|created| days_open(created, self.reactivation_date, deactivated, now))
    }

    fn into_dto(self, now: DateTime<Utc>) -> ClientDto {
        ClientDto {
            days_open: self.days_open(now),
            state: match self.state {
                ClientState::ClientProspect => ClientStateDto::ClientProspect,
                ClientState::Client => ClientStateDto::Client,
            },
            status: status_dto(self.status),
            created_date: self.created_date,
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Referral {
    pub state: ReferralState,
    pub status: Status,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
}

impl Referral {
    fn into_dto(self) -> ReferralDto {
        ReferralDto {
            state: match self.state {
                ReferralState::ReferralProspect => ReferralStateDto::ReferralProspect,
                ReferralState::ReferralPartner => ReferralStateDto::ReferralPartner,
            },
            status: status_dto(self.status),
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub account_id: String,
    pub doing_business_as: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
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
    pub client: Option<Client>,
    pub referral: Option<Referral>,
    pub created_date: DateTime<Utc>,
}

impl Account {
    pub fn from_entity(entity: entity::account::Model) -> Self {
        let client = entity.client_state.map(|state| Client {
            state,
            status: entity.client_status.unwrap_or(Status::Active),
            created_date: entity.client_created_date,
            deactivation_date: entity.client_deactivation_date,
            reactivation_date: entity.client_reactivation_date,
        });
        let referral = entity.referral_state.map(|state| Referral {
            state,
            status: entity.referral_status.unwrap_or(Status::Active),
            deactivation_date: entity.referral_deactivation_date,
            reactivation_date: entity.referral_reactivation_date,
        });

        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            name: entity.name,
            account_id: entity.account_id,
            doing_business_as: entity.doing_business_as,
            linkedin_url: entity.linkedin_url,
            website: entity.website,
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
            client,
            referral,
            created_date: entity.created_date,
        }
    }

    pub fn into_dto(self, now: DateTime<Utc>) -> AccountDto {
        AccountDto {
            id: self.id,
            name: self.name,
            account_id: self.account_id,
            doing_business_as: self.doing_business_as,
            linkedin_url: self.linkedin_url,
            website: self.website,
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
            client: self.client.map(|c| c.into_dto(now)),
            referral: self.referral.map(Referral::into_dto),
            created_date: self.created_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountDetails {
    pub account: Account,
    pub contacts_count: u64,
    pub entities_count: u64,
    pub locations_count: u64,
}

impl AccountDetails {
    pub fn into_dto(self, now: DateTime<Utc>) -> AccountDetailsDto {
        AccountDetailsDto {
            account: self.account.into_dto(now),
            contacts_count: self.contacts_count,
            entities_count: self.entities_count,
            locations_count: self.locations_count,
        }
    }
}

/// Profile fields of an account. Phone and zip are stored without masks.
#[derive(Debug, Clone)]
pub struct AccountParams {
    pub name: String,
    pub account_id: String,
    pub doing_business_as: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
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
    pub client_state: Option<ClientState>,
    pub referral_state: Option<ReferralState>,
}

impl AccountParams {
    pub fn from_dto(dto: AccountRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            account_id: dto.account_id.trim().to_string(),
            doing_business_as: dto.doing_business_as,
            linkedin_url: dto.linkedin_url,
            website: dto.website,
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
            client_state: dto.client_state.map(|s| match s {
                ClientStateDto::ClientProspect => ClientState::ClientProspect,
                ClientStateDto::Client => ClientState::Client,
            }),
            referral_state: dto.referral_state.map(|s| match s {
                ReferralStateDto::ReferralProspect => ReferralState::ReferralProspect,
                ReferralStateDto::ReferralPartner => ReferralState::ReferralPartner,
            }),
        }
    }
}

/// Parses the comma separated `parts` filter of account activities. Unknown names are
/// ignored.
pub fn parse_account_parts(parts: Option<&str>) -> Vec<AccountPart> {
    parts
        .unwrap_or_default()
        .split(',')
        .filter_map(|p| match p.trim() {
            "General" => Some(AccountPart::General),
            "Client" => Some(AccountPart::Client),
            "Referral" => Some(AccountPart::Referral),
            _ => None,
        })
        .collect()
}

pub struct AccountExportRow(pub Account);

impl ExportRecord for AccountExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Account Name",
        "Account ID",
        "DBA",
        "Country",
        "Address 1",
        "Address 2",
        "City",
        "State",
        "Zip",
        "County",
        "Phone",
        "Website",
        "LinkedIn URL",
        "Primary NAICS Code",
        "Client State",
        "Client Status",
        "Referral State",
        "Referral Status",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let a = &self.0;
        vec![
            a.name.clone(),
            a.account_id.clone(),
            a.doing_business_as.clone().unwrap_or_default(),
            a.country.clone(),
            a.address1.clone().unwrap_or_default(),
            a.address2.clone().unwrap_or_default(),
            a.city.clone().unwrap_or_default(),
            a.state.clone().unwrap_or_default(),
            a.zip.as_deref().map(apply_zip_mask).unwrap_or_default(),
            a.county.clone().unwrap_or_default(),
            a.phone.as_deref().map(apply_phone_mask).unwrap_or_default(),
            a.website.clone().unwrap_or_default(),
            a.linkedin_url.clone().unwrap_or_default(),
            a.primary_naics_code
                .map(|c| c.to_string())
                .unwrap_or_default(),
            a.client
                .as_ref()
                .map(|c| client_state_label(c.state).to_string())
                .unwrap_or_default(),
            a.client
                .as_ref()
                .map(|c| status_label(c.status).to_string())
                .unwrap_or_default(),
            a.referral
                .as_ref()
                .map(|r| referral_state_label(r.state).to_string())
                .unwrap_or_default(),
            a.referral
                .as_ref()
                .map(|r| status_label(r.status).to_string())
                .unwrap_or_default(),
            format_export_date(a.created_date),
        ]
    }
}

fn client_state_label(state: ClientState) -> &'static str {
    match state {
        ClientState::ClientProspect => "Client Prospect",
        ClientState::Client => "Client",
    }
}

fn referral_state_label(state: ReferralState) -> &'static str {
    match state {
        ReferralState::ReferralProspect => "Referral Prospect",
        ReferralState::ReferralPartner => "Referral Partner",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn client(status: Status) -> Client {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Client {
            state: ClientState::Client,
            status,
            created_date: Some(created),
            deactivation_date: Some(created + Duration::days(10)),
            reactivation_date: None,
        }
    }

    /// Tests days open for an active client.
    ///
    /// Verifies that an active client counts up to now even when an old deactivation
    /// date is still stored.
    ///
    /// Expected: 30 days
    #[test]
    fn counts_active_client_until_now() {
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(client(Status::Active).days_open(now), Some(30));
    }

    /// Tests days open for a deactivated client.
    ///
    /// Verifies that counting stops at the deactivation date.
    ///
    /// Expected: 10 days
    #[test]
    fn stops_counting_at_deactivation() {
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(client(Status::Deactivated).days_open(now), Some(10));
    }

    #[test]
    fn parses_account_parts() {
        assert_eq!(
            parse_account_parts(Some("Client, Referral,Bogus")),
            vec![AccountPart::Client, AccountPart::Referral]
        );
        assert!(parse_account_parts(None).is_empty());
    }
}
