//! Contact factory. Contacts can be linked to an account on creation.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::Status;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

pub struct ContactFactory<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    account_id: Option<Uuid>,
    contact_type: String,
}

impl<'a> ContactFactory<'a> {
    /// Defaults: `"Contact {id}"`, email `"contact{id}@example.com"`, type `"Client"`, no account.
    pub fn new(db: &'a DatabaseConnection, tenant_id: Uuid) -> Self {
        let id = next_id();
        Self {
            db,
            tenant_id,
            first_name: "Contact".to_string(),
            last_name: id.to_string(),
            email: format!("contact{}@example.com", id),
            account_id: None,
            contact_type: "Client".to_string(),
        }
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Links the contact to the account once built.
    pub fn account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn contact_type(mut self, contact_type: impl Into<String>) -> Self {
        self.contact_type = contact_type.into();
        self
    }

    pub async fn build(self) -> Result<entity::contact::Model, DbErr> {
        let now = Utc::now();
        let contact = entity::contact::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(self.tenant_id),
            full_name: ActiveValue::Set(format!("{} {}", self.first_name, self.last_name)),
            first_name: ActiveValue::Set(self.first_name),
            last_name: ActiveValue::Set(self.last_name),
            email: ActiveValue::Set(self.email),
            secondary_email: ActiveValue::Set(None),
            job_title: ActiveValue::Set(None),
            phone: ActiveValue::Set(None),
            mobile_phone: ActiveValue::Set(None),
            country: ActiveValue::Set(None),
            city: ActiveValue::Set(None),
            state: ActiveValue::Set(None),
            zip: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            created_date: ActiveValue::Set(now),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        if let Some(account_id) = self.account_id {
            link_contact(self.db, account_id, &contact, &self.contact_type).await?;
        }

        Ok(contact)
    }
}

/// Creates a contact linked to the account with default values.
pub async fn create_contact(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    account_id: Uuid,
) -> Result<entity::contact::Model, DbErr> {
    ContactFactory::new(db, tenant_id)
        .account(account_id)
        .build()
        .await
}

/// Links an existing contact to an account as active.
pub async fn link_contact(
    db: &DatabaseConnection,
    account_id: Uuid,
    contact: &entity::contact::Model,
    contact_type: &str,
) -> Result<entity::account_contact::Model, DbErr> {
    entity::account_contact::ActiveModel {
        account_id: ActiveValue::Set(account_id),
        contact_id: ActiveValue::Set(contact.id),
        tenant_id: ActiveValue::Set(contact.tenant_id),
        contact_type: ActiveValue::Set(contact_type.to_string()),
        status: ActiveValue::Set(Status::Active),
        deactivation_date: ActiveValue::Set(None),
        reactivation_date: ActiveValue::Set(None),
        created_date: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
