//! Role factory plus helpers for permissions and role assignments.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait};
use uuid::Uuid;

/// Factory for creating roles with an optional tenant and permission set.
///
/// Permissions listed with `permission()` are inserted into the `permission` table when
/// missing and linked to the role.
///
/// # Example
///
/// ```rust,ignore
/// let role = RoleFactory::new(&db)
///     .tenant(tenant.id)
///     .name("Admin")
///     .permission("Users.Read")
///     .build()
///     .await?;
/// ```
pub struct RoleFactory<'a> {
    db: &'a DatabaseConnection,
    tenant_id: Option<Uuid>,
    name: String,
    permissions: Vec<String>,
}

impl<'a> RoleFactory<'a> {
    /// Creates a new RoleFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Role {id}"`
    /// - system role (no tenant)
    /// - no permissions
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            tenant_id: None,
            name: format!("Role {}", id),
            permissions: Vec::new(),
        }
    }

    pub fn tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn permission(mut self, name: impl Into<String>) -> Self {
        self.permissions.push(name.into());
        self
    }

    pub async fn build(self) -> Result<entity::role::Model, DbErr> {
        let role = entity::role::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(self.tenant_id),
            name: ActiveValue::Set(self.name),
            created_date: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        for permission in self.permissions {
            create_permission(self.db, &permission).await?;
            entity::role_permission::ActiveModel {
                role_id: ActiveValue::Set(role.id),
                permission_name: ActiveValue::Set(permission),
            }
            .insert(self.db)
            .await?;
        }

        Ok(role)
    }
}

/// Creates a role with default values.
pub async fn create_role(
    db: &DatabaseConnection,
    tenant_id: Option<Uuid>,
) -> Result<entity::role::Model, DbErr> {
    let factory = RoleFactory::new(db);
    match tenant_id {
        Some(tenant_id) => factory.tenant(tenant_id).build().await,
        None => factory.build().await,
    }
}

/// Inserts a permission name unless it already exists.
pub async fn create_permission(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entity::permission::Model, DbErr> {
    if let Some(existing) = entity::prelude::Permission::find_by_id(name.to_string())
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    entity::permission::ActiveModel {
        name: ActiveValue::Set(name.to_string()),
    }
    .insert(db)
    .await
}

/// Assigns a role to a user within the role's tenant.
pub async fn assign_role(
    db: &DatabaseConnection,
    user_id: Uuid,
    role: &entity::role::Model,
) -> Result<entity::user_role::Model, DbErr> {
    entity::user_role::ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4()),
        user_id: ActiveValue::Set(user_id),
        role_id: ActiveValue::Set(role.id),
        tenant_id: ActiveValue::Set(role.tenant_id),
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn creates_role_with_shared_permissions() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_role_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        RoleFactory::new(db)
            .permission("Users.Read")
            .build()
            .await?;
        RoleFactory::new(db)
            .permission("Users.Read")
            .permission("Users.ReadWrite")
            .build()
            .await?;

        assert_eq!(entity::prelude::Permission::find().count(db).await?, 2);
        assert_eq!(entity::prelude::RolePermission::find().count(db).await?, 3);

        Ok(())
    }
}
