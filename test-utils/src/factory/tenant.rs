//! Tenant factory for creating test tenant entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for creating test tenants with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let tenant = TenantFactory::new(&db)
///     .name("Acme")
///     .division_enabled(true)
///     .build()
///     .await?;
/// ```
pub struct TenantFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    division_enabled: bool,
}

impl<'a> TenantFactory<'a> {
    /// Creates a new TenantFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Tenant {id}"`
    /// - division_enabled: `true`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            name: format!("Tenant {}", id),
            division_enabled: true,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn division_enabled(mut self, division_enabled: bool) -> Self {
        self.division_enabled = division_enabled;
        self
    }

    /// Builds and inserts the tenant entity into the database.
    pub async fn build(self) -> Result<entity::tenant::Model, DbErr> {
        entity::tenant::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(self.name),
            division_enabled: ActiveValue::Set(self.division_enabled),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a tenant with default values.
///
/// Shorthand for `TenantFactory::new(db).build().await`.
pub async fn create_tenant(db: &DatabaseConnection) -> Result<entity::tenant::Model, DbErr> {
    TenantFactory::new(db).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_tenant_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::Tenant)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let tenant = create_tenant(db).await?;

        assert!(tenant.name.starts_with("Tenant "));
        assert!(tenant.division_enabled);

        Ok(())
    }
}
