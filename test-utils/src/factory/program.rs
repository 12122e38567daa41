//! Program factory and tenant program assignment helper.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::Status;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for catalogue programs.
pub struct ProgramFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    jurisdiction: String,
    status: Status,
}

impl<'a> ProgramFactory<'a> {
    /// Defaults: name `"Program {id}"`, jurisdiction `"Federal"`, status `Active`.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("Program {}", next_id()),
            jurisdiction: "Federal".to_string(),
            status: Status::Active,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = jurisdiction.into();
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub async fn build(self) -> Result<entity::program::Model, DbErr> {
        entity::program::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(self.name),
            reference: ActiveValue::Set(None),
            overview: ActiveValue::Set(None),
            legal_authority: ActiveValue::Set(None),
            agency: ActiveValue::Set(None),
            jurisdiction: ActiveValue::Set(self.jurisdiction),
            jurisdiction_name: ActiveValue::Set(None),
            incentives_area: ActiveValue::Set(None),
            incentives_type: ActiveValue::Set(None),
            start_date: ActiveValue::Set(None),
            end_date: ActiveValue::Set(None),
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

/// Creates a program with default values.
pub async fn create_program(db: &DatabaseConnection) -> Result<entity::program::Model, DbErr> {
    ProgramFactory::new(db).build().await
}

/// Assigns a program to a tenant as active.
pub async fn assign_program(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    program_id: Uuid,
) -> Result<entity::tenant_program::Model, DbErr> {
    entity::tenant_program::ActiveModel {
        tenant_id: ActiveValue::Set(tenant_id),
        program_id: ActiveValue::Set(program_id),
        department_id: ActiveValue::Set(None),
        service_area_id: ActiveValue::Set(None),
        status: ActiveValue::Set(Status::Active),
        deactivation_date: ActiveValue::Set(None),
        reactivation_date: ActiveValue::Set(None),
        created_date: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
