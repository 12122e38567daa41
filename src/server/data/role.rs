//! Role, permission and role membership repository.
//!
//! Roles without a tenant are system roles. `user_role.tenant_id` mirrors the role's
//! tenant so the roles that apply in a tenant can be selected without a join.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::server::{data::fetch_page, model::Page, util::grid::GridQuery};

/// Roles that apply in `tenant_id`: system roles plus the tenant's own roles.
fn applicable(tenant_id: Option<Uuid>) -> Condition {
    match tenant_id {
        Some(tenant_id) => Condition::any()
            .add(entity::user_role::Column::TenantId.is_null())
            .add(entity::user_role::Column::TenantId.eq(tenant_id)),
        None => Condition::all().add(entity::user_role::Column::TenantId.is_null()),
    }
}

/// Roles listed in a scope: the tenant's roles, or system roles without a tenant.
fn scope(tenant_id: Option<Uuid>) -> Condition {
    match tenant_id {
        Some(tenant_id) => Condition::all().add(entity::role::Column::TenantId.eq(tenant_id)),
        None => Condition::all().add(entity::role::Column::TenantId.is_null()),
    }
}

pub struct RoleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RoleRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts permission names missing from the catalogue table.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of names inserted
    pub async fn sync_permissions(&self, names: &[String]) -> Result<u64, DbErr> {
        let existing: HashSet<String> = entity::prelude::Permission::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect();

        let mut inserted = 0;
        for name in names.iter().filter(|n| !existing.contains(*n)) {
            entity::permission::ActiveModel {
                name: ActiveValue::Set(name.clone()),
            }
            .insert(self.db)
            .await?;
            inserted += 1;
        }

        Ok(inserted)
    }

    pub async fn find_system_role(&self, name: &str) -> Result<Option<entity::role::Model>, DbErr> {
        entity::prelude::Role::find()
            .filter(entity::role::Column::TenantId.is_null())
            .filter(entity::role::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        tenant_id: Option<Uuid>,
        name: &str,
    ) -> Result<entity::role::Model, DbErr> {
        entity::role::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            name: ActiveValue::Set(name.to_string()),
            created_date: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }

    /// Links permissions to a role, skipping ones it already holds.
    pub async fn grant_permissions(&self, role_id: Uuid, names: &[String]) -> Result<(), DbErr> {
        let held: HashSet<String> = self.get_permissions(role_id).await?.into_iter().collect();

        for name in names.iter().filter(|n| !held.contains(*n)) {
            entity::role_permission::ActiveModel {
                role_id: ActiveValue::Set(role_id),
                permission_name: ActiveValue::Set(name.clone()),
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }

    /// Permission names held by a role, sorted.
    pub async fn get_permissions(&self, role_id: Uuid) -> Result<Vec<String>, DbErr> {
        entity::prelude::RolePermission::find()
            .filter(entity::role_permission::Column::RoleId.eq(role_id))
            .order_by_asc(entity::role_permission::Column::PermissionName)
            .all(self.db)
            .await
            .map(|rows| rows.into_iter().map(|r| r.permission_name).collect())
    }

    /// Distinct permission names held by any of the roles.
    pub async fn get_permission_names(&self, role_ids: &[Uuid]) -> Result<Vec<String>, DbErr> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let names: BTreeSet<String> = entity::prelude::RolePermission::find()
            .filter(entity::role_permission::Column::RoleId.is_in(role_ids.to_vec()))
            .all(self.db)
            .await?
            .into_iter()
            .map(|r| r.permission_name)
            .collect();

        Ok(names.into_iter().collect())
    }

    pub async fn count_users(&self, role_id: Uuid) -> Result<u64, DbErr> {
        entity::prelude::UserRole::find()
            .filter(entity::user_role::Column::RoleId.eq(role_id))
            .count(self.db)
            .await
    }

    /// Roles of the scope with their assigned user counts, ordered by name.
    pub async fn list(
        &self,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<(entity::role::Model, u64)>, DbErr> {
        let roles = entity::prelude::Role::find()
            .filter(scope(tenant_id))
            .order_by_asc(entity::role::Column::Name)
            .all(self.db)
            .await?;

        let mut result = Vec::with_capacity(roles.len());
        for role in roles {
            let count = self.count_users(role.id).await?;
            result.push((role, count));
        }

        Ok(result)
    }

    /// Finds a role visible in the scope.
    pub async fn find_in_scope(
        &self,
        id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<Option<entity::role::Model>, DbErr> {
        entity::prelude::Role::find_by_id(id)
            .filter(scope(tenant_id))
            .one(self.db)
            .await
    }

    /// Roles among `ids` that can be assigned in the scope: tenant roles and, for super
    /// admins outside a tenant, system roles.
    pub async fn find_many_in_scope(
        &self,
        ids: &[Uuid],
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<entity::role::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Role::find()
            .filter(entity::role::Column::Id.is_in(ids.to_vec()))
            .filter(scope(tenant_id))
            .order_by_asc(entity::role::Column::Name)
            .all(self.db)
            .await
    }

    /// Roles that apply to the user in `tenant_id`, system roles included.
    pub async fn get_user_roles(
        &self,
        user_id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<entity::role::Model>, DbErr> {
        entity::prelude::Role::find()
            .filter(
                entity::role::Column::Id.in_subquery(
                    Query::select()
                        .column(entity::user_role::Column::RoleId)
                        .from(entity::user_role::Entity)
                        .and_where(entity::user_role::Column::UserId.eq(user_id))
                        .cond_where(applicable(tenant_id))
                        .to_owned(),
                ),
            )
            .order_by_asc(entity::role::Column::Name)
            .all(self.db)
            .await
    }

    /// Role names per user among the roles that apply in `tenant_id`.
    pub async fn get_role_names_by_users(
        &self,
        user_ids: &[Uuid],
        tenant_id: Option<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<String>>, DbErr> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let memberships = entity::prelude::UserRole::find()
            .filter(entity::user_role::Column::UserId.is_in(user_ids.to_vec()))
            .filter(applicable(tenant_id))
            .all(self.db)
            .await?;

        let role_ids: Vec<Uuid> = memberships.iter().map(|m| m.role_id).collect();
        let names: HashMap<Uuid, String> = entity::prelude::Role::find()
            .filter(entity::role::Column::Id.is_in(role_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let mut result: HashMap<Uuid, Vec<String>> = HashMap::new();
        for membership in memberships {
            if let Some(name) = names.get(&membership.role_id) {
                result
                    .entry(membership.user_id)
                    .or_default()
                    .push(name.clone());
            }
        }
        for roles in result.values_mut() {
            roles.sort();
        }

        Ok(result)
    }

    /// Assigns the role to users that do not hold it yet.
    ///
    /// # Returns
    /// - `Ok(Vec<Uuid>)` - Ids of the users that were newly assigned
    pub async fn add_users(
        &self,
        role: &entity::role::Model,
        user_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, DbErr> {
        let assigned: HashSet<Uuid> = self.get_user_ids(role.id).await?.into_iter().collect();

        let mut added = Vec::new();
        for user_id in user_ids.iter().filter(|id| !assigned.contains(*id)) {
            entity::user_role::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(*user_id),
                role_id: ActiveValue::Set(role.id),
                tenant_id: ActiveValue::Set(role.tenant_id),
            }
            .insert(self.db)
            .await?;
            added.push(*user_id);
        }

        Ok(added)
    }

    /// Removes the role from users.
    ///
    /// # Returns
    /// - `Ok(Vec<Uuid>)` - Ids of the users that held the role
    pub async fn remove_users(&self, role_id: Uuid, user_ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr> {
        let assigned: HashSet<Uuid> = self.get_user_ids(role_id).await?.into_iter().collect();
        let removed: Vec<Uuid> = user_ids
            .iter()
            .filter(|id| assigned.contains(*id))
            .copied()
            .collect();

        if !removed.is_empty() {
            entity::prelude::UserRole::delete_many()
                .filter(entity::user_role::Column::RoleId.eq(role_id))
                .filter(entity::user_role::Column::UserId.is_in(removed.clone()))
                .exec(self.db)
                .await?;
        }

        Ok(removed)
    }

    pub async fn get_user_ids(&self, role_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        entity::prelude::UserRole::find()
            .select_only()
            .column(entity::user_role::Column::UserId)
            .filter(entity::user_role::Column::RoleId.eq(role_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Users holding the role.
    pub async fn get_users_page(
        &self,
        role_id: Uuid,
        grid: &GridQuery<entity::user::Column>,
    ) -> Result<Page<entity::user::Model>, DbErr> {
        let query = entity::prelude::User::find().filter(
            entity::user::Column::Id.in_subquery(
                Query::select()
                    .column(entity::user_role::Column::UserId)
                    .from(entity::user_role::Entity)
                    .and_where(entity::user_role::Column::RoleId.eq(role_id))
                    .to_owned(),
            ),
        );

        let query = grid.apply(query).order_by_asc(entity::user::Column::Email);

        fetch_page(self.db, query, grid).await
    }
}
