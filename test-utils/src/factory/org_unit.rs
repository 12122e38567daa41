//! Factories for divisions, departments, service areas, job titles and teams.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for divisions.
pub struct DivisionFactory<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Uuid,
    name: String,
}

impl<'a> DivisionFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, tenant_id: Uuid) -> Self {
        Self {
            db,
            tenant_id,
            name: format!("Division {}", next_id()),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub async fn build(self) -> Result<entity::division::Model, DbErr> {
        entity::division::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(self.tenant_id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Factory for departments, optionally attached to a division.
pub struct DepartmentFactory<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Uuid,
    division_id: Option<Uuid>,
    name: String,
}

impl<'a> DepartmentFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, tenant_id: Uuid) -> Self {
        Self {
            db,
            tenant_id,
            division_id: None,
            name: format!("Department {}", next_id()),
        }
    }

    pub fn division(mut self, division_id: Uuid) -> Self {
        self.division_id = Some(division_id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub async fn build(self) -> Result<entity::department::Model, DbErr> {
        entity::department::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(self.tenant_id),
            division_id: ActiveValue::Set(self.division_id),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a division with default values.
pub async fn create_division(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> Result<entity::division::Model, DbErr> {
    DivisionFactory::new(db, tenant_id).build().await
}

/// Creates a department with default values under an optional division.
pub async fn create_department(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    division_id: Option<Uuid>,
) -> Result<entity::department::Model, DbErr> {
    let factory = DepartmentFactory::new(db, tenant_id);
    match division_id {
        Some(division_id) => factory.division(division_id).build().await,
        None => factory.build().await,
    }
}

/// Creates a service area with default values under an optional department.
pub async fn create_service_area(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    department_id: Option<Uuid>,
) -> Result<entity::service_area::Model, DbErr> {
    entity::service_area::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        tenant_id: ActiveValue::Set(tenant_id),
        department_id: ActiveValue::Set(department_id),
        name: ActiveValue::Set(format!("Service Area {}", next_id())),
        description: ActiveValue::Set(None),
        created_date: ActiveValue::Set(Utc::now()),
        last_modified_date: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}

/// Creates a job title with default values under an optional department.
pub async fn create_job_title(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    department_id: Option<Uuid>,
) -> Result<entity::job_title::Model, DbErr> {
    entity::job_title::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        tenant_id: ActiveValue::Set(tenant_id),
        department_id: ActiveValue::Set(department_id),
        name: ActiveValue::Set(format!("Job Title {}", next_id())),
        description: ActiveValue::Set(None),
        created_date: ActiveValue::Set(Utc::now()),
        last_modified_date: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}

/// Creates a team with default values.
pub async fn create_team(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> Result<entity::team::Model, DbErr> {
    entity::team::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        tenant_id: ActiveValue::Set(tenant_id),
        name: ActiveValue::Set(format!("Team {}", next_id())),
        description: ActiveValue::Set(None),
        created_date: ActiveValue::Set(Utc::now()),
        last_modified_date: ActiveValue::Set(None),
    }
    .insert(db)
    .await
}
