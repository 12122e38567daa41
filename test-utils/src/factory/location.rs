//! Location factory.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::Status;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

pub struct LocationFactory<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Uuid,
    account_id: Uuid,
    name: String,
    location_id: String,
}

impl<'a> LocationFactory<'a> {
    /// Defaults: name `"Location {id}"`, location id `"LOC{id}"`.
    pub fn new(db: &'a DatabaseConnection, tenant_id: Uuid, account_id: Uuid) -> Self {
        let id = next_id();
        Self {
            db,
            tenant_id,
            account_id,
            name: format!("Location {}", id),
            location_id: format!("LOC{}", id),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = location_id.into();
        self
    }

    pub async fn build(self) -> Result<entity::location::Model, DbErr> {
        entity::location::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(self.tenant_id),
            account_id: ActiveValue::Set(self.account_id),
            name: ActiveValue::Set(self.name),
            location_id: ActiveValue::Set(self.location_id),
            location_type: ActiveValue::Set("Office".to_string()),
            country: ActiveValue::Set("United States".to_string()),
            address1: ActiveValue::Set(None),
            address2: ActiveValue::Set(None),
            city: ActiveValue::Set(None),
            state: ActiveValue::Set(None),
            zip: ActiveValue::Set(None),
            county: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            phone: ActiveValue::Set(None),
            primary_naics_code: ActiveValue::Set(None),
            start_date: ActiveValue::Set(None),
            end_date: ActiveValue::Set(None),
            status: ActiveValue::Set(Status::Active),
            deactivation_date: ActiveValue::Set(None),
            reactivation_date: ActiveValue::Set(None),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a location under the account with default values.
pub async fn create_location(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    account_id: Uuid,
) -> Result<entity::location::Model, DbErr> {
    LocationFactory::new(db, tenant_id, account_id)
        .build()
        .await
}
