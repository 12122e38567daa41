//! Legal entity factory.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::Status;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

pub struct LegalEntityFactory<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Uuid,
    account_id: Uuid,
    name: String,
    entity_id: String,
    fein: Option<String>,
    ein: Option<String>,
    status: Status,
}

impl<'a> LegalEntityFactory<'a> {
    /// Defaults: name `"Entity {id}"`, entity id `"ENT{id}"`, no FEIN or EIN, `Active`.
    pub fn new(db: &'a DatabaseConnection, tenant_id: Uuid, account_id: Uuid) -> Self {
        let id = next_id();
        Self {
            db,
            tenant_id,
            account_id,
            name: format!("Entity {}", id),
            entity_id: format!("ENT{}", id),
            fein: None,
            ein: None,
            status: Status::Active,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn fein(mut self, fein: impl Into<String>) -> Self {
        self.fein = Some(fein.into());
        self
    }

    pub fn ein(mut self, ein: impl Into<String>) -> Self {
        self.ein = Some(ein.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub async fn build(self) -> Result<entity::legal_entity::Model, DbErr> {
        entity::legal_entity::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(self.tenant_id),
            account_id: ActiveValue::Set(self.account_id),
            name: ActiveValue::Set(self.name),
            entity_id: ActiveValue::Set(self.entity_id),
            doing_business_as: ActiveValue::Set(None),
            country: ActiveValue::Set("United States".to_string()),
            address1: ActiveValue::Set(None),
            address2: ActiveValue::Set(None),
            city: ActiveValue::Set(None),
            state: ActiveValue::Set(None),
            zip: ActiveValue::Set(None),
            county: ActiveValue::Set(None),
            address: ActiveValue::Set(None),
            phone: ActiveValue::Set(None),
            entity_type: ActiveValue::Set("LLC".to_string()),
            tax_year_end_type: ActiveValue::Set(None),
            date_of_incorporation: ActiveValue::Set(None),
            fein: ActiveValue::Set(self.fein),
            ein: ActiveValue::Set(self.ein),
            jurisdiction_id: ActiveValue::Set(None),
            primary_naics_code: ActiveValue::Set(None),
            status: ActiveValue::Set(self.status),
            deactivation_date: ActiveValue::Set(None),
            reactivation_date: ActiveValue::Set(None),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a legal entity under the account with default values.
pub async fn create_legal_entity(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    account_id: Uuid,
) -> Result<entity::legal_entity::Model, DbErr> {
    LegalEntityFactory::new(db, tenant_id, account_id)
        .build()
        .await
}

/// Adds a state id to a legal entity.
pub async fn create_state_id(
    db: &DatabaseConnection,
    entity: &entity::legal_entity::Model,
    state: &str,
) -> Result<entity::state_id::Model, DbErr> {
    entity::state_id::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        tenant_id: ActiveValue::Set(entity.tenant_id),
        entity_id: ActiveValue::Set(entity.id),
        state: ActiveValue::Set(state.to_string()),
        state_id_type: ActiveValue::Set("Sales tax".to_string()),
        state_id_code: ActiveValue::Set(format!("SID{}", next_id())),
        local_jurisdiction: ActiveValue::Set(None),
        created_date: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
