//! Account factory for creating test account entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::{ClientState, ReferralState, Status};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for creating accounts inside a tenant.
///
/// # Example
///
/// ```rust,ignore
/// let account = AccountFactory::new(&db, tenant.id)
///     .account_id("ACC-1")
///     .client()
///     .build()
///     .await?;
/// ```
pub struct AccountFactory<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Uuid,
    name: String,
    account_id: String,
    city: Option<String>,
    state: Option<String>,
    client: bool,
    referral: bool,
}

impl<'a> AccountFactory<'a> {
    /// Defaults: name `"Account {id}"`, account id `"ACC{id}"`, no client or referral part.
    pub fn new(db: &'a DatabaseConnection, tenant_id: Uuid) -> Self {
        let id = next_id();
        Self {
            db,
            tenant_id,
            name: format!("Account {}", id),
            account_id: format!("ACC{}", id),
            city: None,
            state: None,
            client: false,
            referral: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Marks the account as an active client.
    pub fn client(mut self) -> Self {
        self.client = true;
        self
    }

    /// Marks the account as an active referral partner.
    pub fn referral(mut self) -> Self {
        self.referral = true;
        self
    }

    pub async fn build(self) -> Result<entity::account::Model, DbErr> {
        let now = Utc::now();
        entity::account::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(self.tenant_id),
            name: ActiveValue::Set(self.name),
            account_id: ActiveValue::Set(self.account_id),
            doing_business_as: ActiveValue::Set(None),
            linkedin_url: ActiveValue::Set(None),
            website: ActiveValue::Set(None),
            country: ActiveValue::Set("United States".to_string()),
            address1: ActiveValue::Set(None),
            address2: ActiveValue::Set(None),
            city: ActiveValue::Set(self.city),
            state: ActiveValue::Set(self.state),
            zip: ActiveValue::Set(None),
            county: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            phone: ActiveValue::Set(None),
            primary_naics_code: ActiveValue::Set(None),
            client_state: ActiveValue::Set(self.client.then_some(ClientState::Client)),
            client_status: ActiveValue::Set(self.client.then_some(Status::Active)),
            client_created_date: ActiveValue::Set(self.client.then_some(now)),
            client_deactivation_date: ActiveValue::Set(None),
            client_reactivation_date: ActiveValue::Set(None),
            referral_state: ActiveValue::Set(
                self.referral.then_some(ReferralState::ReferralPartner),
            ),
            referral_status: ActiveValue::Set(self.referral.then_some(Status::Active)),
            referral_deactivation_date: ActiveValue::Set(None),
            referral_reactivation_date: ActiveValue::Set(None),
            created_date: ActiveValue::Set(now),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an account with default values.
pub async fn create_account(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> Result<entity::account::Model, DbErr> {
    AccountFactory::new(db, tenant_id).build().await
}
