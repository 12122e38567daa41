//! User factory for creating test user entities.
//!
//! Users are global; `tenant()` additionally inserts the `tenant_user` membership row
//! so the user shows up in tenant-scoped queries.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::sea_orm_active_enums::Status;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let user = UserFactory::new(&db)
///     .email("jane@example.com")
///     .tenant(tenant.id)
///     .department(department.id)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    first_name: String,
    last_name: String,
    email: String,
    status: Status,
    tenant_id: Option<Uuid>,
    division_id: Option<Uuid>,
    department_id: Option<Uuid>,
    service_area_id: Option<Uuid>,
    job_title_id: Option<Uuid>,
    team_id: Option<Uuid>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - first_name: `"User"`
    /// - last_name: `"{id}"`
    /// - email: `"user{id}@example.com"`
    /// - status: `Active`
    /// - no tenant membership and no org units
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            first_name: "User".to_string(),
            last_name: id.to_string(),
            email: format!("user{}@example.com", id),
            status: Status::Active,
            tenant_id: None,
            division_id: None,
            department_id: None,
            service_area_id: None,
            job_title_id: None,
            team_id: None,
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

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Adds the user to the tenant once built.
    pub fn tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn division(mut self, division_id: Uuid) -> Self {
        self.division_id = Some(division_id);
        self
    }

    pub fn department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn service_area(mut self, service_area_id: Uuid) -> Self {
        self.service_area_id = Some(service_area_id);
        self
    }

    pub fn job_title(mut self, job_title_id: Uuid) -> Self {
        self.job_title_id = Some(job_title_id);
        self
    }

    pub fn team(mut self, team_id: Uuid) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Builds and inserts the user, plus the tenant membership when requested.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        let full_name = format!("{} {}", self.first_name, self.last_name);
        let user = entity::user::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            first_name: ActiveValue::Set(self.first_name),
            last_name: ActiveValue::Set(self.last_name),
            legal_name: ActiveValue::Set(full_name.clone()),
            full_name: ActiveValue::Set(full_name),
            email: ActiveValue::Set(self.email),
            status: ActiveValue::Set(self.status),
            last_login_date: ActiveValue::Set(None),
            deactivation_date: ActiveValue::Set(None),
            reactivation_date: ActiveValue::Set(None),
            division_id: ActiveValue::Set(self.division_id),
            department_id: ActiveValue::Set(self.department_id),
            service_area_id: ActiveValue::Set(self.service_area_id),
            job_title_id: ActiveValue::Set(self.job_title_id),
            team_id: ActiveValue::Set(self.team_id),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        if let Some(tenant_id) = self.tenant_id {
            entity::tenant_user::ActiveModel {
                tenant_id: ActiveValue::Set(tenant_id),
                user_id: ActiveValue::Set(user.id),
            }
            .insert(self.db)
            .await?;
        }

        Ok(user)
    }
}

/// Creates a user belonging to the tenant with default values.
///
/// Shorthand for `UserFactory::new(db).tenant(tenant_id).build().await`.
pub async fn create_user(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).tenant(tenant_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::TestBuilder, factory::tenant::create_tenant};
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn creates_user_with_tenant_membership() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let tenant = create_tenant(db).await?;
        let user = create_user(db, tenant.id).await?;

        assert_eq!(user.status, Status::Active);
        assert!(user.email.ends_with("@example.com"));
        assert_eq!(entity::prelude::TenantUser::find().count(db).await?, 1);

        Ok(())
    }
}
