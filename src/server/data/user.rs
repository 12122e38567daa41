//! User data repository for database operations.
//!
//! Users are global rows; tenant membership lives in `tenant_user`. Tenant-scoped
//! queries filter through that table.

use std::collections::HashMap;

use chrono::Utc;
use entity::{sea_orm_active_enums::Status, user::Column};
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id, role::RoleRepository},
    model::{
        status_dates,
        user::{CreateUserParams, UpdateUserParams, User},
        Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

/// Fields accepted by the users grid.
pub const USER_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("email", Column::Email, FieldKind::Text),
    GridField::new("firstName", Column::FirstName, FieldKind::Text),
    GridField::new("lastName", Column::LastName, FieldKind::Text),
    GridField::new("legalName", Column::LegalName, FieldKind::Text),
    GridField::new("fullName", Column::FullName, FieldKind::Text),
    GridField::new("status", Column::Status, FieldKind::Enum),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
    GridField::new("lastLoginDate", Column::LastLoginDate, FieldKind::Date),
    GridField::new("divisionId", Column::DivisionId, FieldKind::Uuid),
    GridField::new("departmentId", Column::DepartmentId, FieldKind::Uuid),
    GridField::new("serviceAreaId", Column::ServiceAreaId, FieldKind::Uuid),
    GridField::new("jobTitleId", Column::JobTitleId, FieldKind::Uuid),
    GridField::new("teamId", Column::TeamId, FieldKind::Uuid),
];

/// Restricts a user query to members of the tenant.
pub(crate) fn in_tenant(tenant_id: Uuid) -> Condition {
    Condition::all().add(
        Column::Id.in_subquery(
            Query::select()
                .column(entity::tenant_user::Column::UserId)
                .from(entity::tenant_user::Entity)
                .and_where(entity::tenant_user::Column::TenantId.eq(tenant_id))
                .to_owned(),
        ),
    )
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find_by_id(id).one(self.db).await
    }

    /// Finds a user by id, restricted to tenant members when a tenant is given.
    pub async fn find_in_scope(
        &self,
        id: Uuid,
        tenant_id: Option<Uuid>,
    ) -> Result<Option<entity::user::Model>, DbErr> {
        let mut query = entity::prelude::User::find_by_id(id);
        if let Some(tenant_id) = tenant_id {
            query = query.filter(in_tenant(tenant_id));
        }
        query.one(self.db).await
    }

    /// Finds a user by email, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    /// Inserts an active user and, when a tenant is given, the tenant membership.
    pub async fn create(&self, params: CreateUserParams) -> Result<entity::user::Model, DbErr> {
        let full_name = format!("{} {}", params.first_name, params.last_name);

        let user = entity::user::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            first_name: ActiveValue::Set(params.first_name),
            last_name: ActiveValue::Set(params.last_name),
            legal_name: ActiveValue::Set(params.legal_name),
            full_name: ActiveValue::Set(full_name),
            email: ActiveValue::Set(params.email.to_lowercase()),
            status: ActiveValue::Set(Status::Active),
            last_login_date: ActiveValue::Set(None),
            deactivation_date: ActiveValue::Set(None),
            reactivation_date: ActiveValue::Set(None),
            division_id: ActiveValue::Set(params.division_id),
            department_id: ActiveValue::Set(params.department_id),
            service_area_id: ActiveValue::Set(params.service_area_id),
            job_title_id: ActiveValue::Set(params.job_title_id),
            team_id: ActiveValue::Set(params.team_id),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        if let Some(tenant_id) = params.tenant_id {
            self.add_to_tenant(user.id, tenant_id).await?;
        }

        Ok(user)
    }

    pub async fn add_to_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> Result<(), DbErr> {
        entity::tenant_user::ActiveModel {
            tenant_id: ActiveValue::Set(tenant_id),
            user_id: ActiveValue::Set(user_id),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Updates names and org units.
    ///
    /// # Returns
    /// - `Ok(Model)` - Updated user
    /// - `Err(DbErr::RecordNotFound)` - User does not exist
    pub async fn update(&self, params: UpdateUserParams) -> Result<entity::user::Model, DbErr> {
        let user = self.get(params.id).await?;
        let full_name = format!("{} {}", params.first_name, params.last_name);

        let mut active: entity::user::ActiveModel = user.into();
        active.first_name = ActiveValue::Set(params.first_name);
        active.last_name = ActiveValue::Set(params.last_name);
        active.legal_name = ActiveValue::Set(params.legal_name);
        active.full_name = ActiveValue::Set(full_name);
        active.division_id = ActiveValue::Set(params.org_units.division_id);
        active.department_id = ActiveValue::Set(params.org_units.department_id);
        active.service_area_id = ActiveValue::Set(params.org_units.service_area_id);
        active.job_title_id = ActiveValue::Set(params.org_units.job_title_id);
        active.team_id = ActiveValue::Set(params.org_units.team_id);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));

        active.update(self.db).await
    }

    /// Sets the status together with the matching deactivation/reactivation dates.
    pub async fn set_status(&self, id: Uuid, status: Status) -> Result<entity::user::Model, DbErr> {
        let user = self.get(id).await?;
        let now = Utc::now();
        let (deactivation_date, reactivation_date) = status_dates(status, now);

        let mut active: entity::user::ActiveModel = user.into();
        active.status = ActiveValue::Set(status);
        active.deactivation_date = ActiveValue::Set(deactivation_date);
        active.reactivation_date = ActiveValue::Set(reactivation_date);
        active.last_modified_date = ActiveValue::Set(Some(now));

        active.update(self.db).await
    }

    pub async fn set_last_login(&self, id: Uuid) -> Result<entity::user::Model, DbErr> {
        let user = self.get(id).await?;

        let mut active: entity::user::ActiveModel = user.into();
        active.last_login_date = ActiveValue::Set(Some(Utc::now()));

        active.update(self.db).await
    }

    /// Users of a tenant, or all users when no tenant is given.
    pub async fn get_page(
        &self,
        tenant_id: Option<Uuid>,
        grid: &GridQuery<Column>,
    ) -> Result<Page<entity::user::Model>, DbErr> {
        let mut query = entity::prelude::User::find();
        if let Some(tenant_id) = tenant_id {
            query = query.filter(in_tenant(tenant_id));
        }

        let query = grid.apply(query).order_by_asc(Column::Email);

        fetch_page(self.db, query, grid).await
    }

    /// Tenant users assigned to an org unit, e.g. `Column::DivisionId`.
    pub async fn get_page_by_org_unit(
        &self,
        tenant_id: Uuid,
        column: Column,
        org_unit_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<entity::user::Model>, DbErr> {
        let query = entity::prelude::User::find()
            .filter(in_tenant(tenant_id))
            .filter(column.eq(org_unit_id));

        let query = grid.apply(query).order_by_asc(Column::Email);

        fetch_page(self.db, query, grid).await
    }

    /// Export source: every user in scope ordered by email.
    pub async fn get_all(&self, tenant_id: Option<Uuid>) -> Result<Vec<entity::user::Model>, DbErr> {
        let mut query = entity::prelude::User::find();
        if let Some(tenant_id) = tenant_id {
            query = query.filter(in_tenant(tenant_id));
        }

        query.order_by_asc(Column::Email).all(self.db).await
    }

    /// Number of tenant users per org unit id in `column`.
    pub async fn count_by_org_unit(
        &self,
        tenant_id: Uuid,
        column: Column,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u64>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = entity::prelude::User::find()
            .filter(in_tenant(tenant_id))
            .filter(column.is_in(ids.to_vec()))
            .all(self.db)
            .await?;

        let mut counts = HashMap::new();
        for user in users {
            let key = match column {
                Column::DivisionId => user.division_id,
                Column::DepartmentId => user.department_id,
                Column::ServiceAreaId => user.service_area_id,
                Column::JobTitleId => user.job_title_id,
                Column::TeamId => user.team_id,
                _ => None,
            };
            if let Some(key) = key {
                *counts.entry(key).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }

    /// Tenant the user belongs to. Users are members of at most one tenant; super admins
    /// of none.
    pub async fn get_tenant_id(&self, user_id: Uuid) -> Result<Option<Uuid>, DbErr> {
        let membership = entity::prelude::TenantUser::find()
            .filter(entity::tenant_user::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        Ok(membership.map(|m| m.tenant_id))
    }

    pub async fn is_in_tenant(&self, user_id: Uuid, tenant_id: Uuid) -> Result<bool, DbErr> {
        let count = entity::prelude::TenantUser::find()
            .filter(entity::tenant_user::Column::TenantId.eq(tenant_id))
            .filter(entity::tenant_user::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Converts entity models to domain users, resolving org unit names and the names of
    /// the roles that apply in `tenant_id`.
    pub async fn with_details(
        &self,
        users: Vec<entity::user::Model>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<User>, DbErr> {
        let collect = |f: fn(&entity::user::Model) -> Option<Uuid>| -> Vec<Uuid> {
            users.iter().filter_map(f).collect()
        };

        let divisions = names_by_id::<entity::prelude::Division, _>(
            self.db,
            entity::division::Column::Id,
            entity::division::Column::Name,
            collect(|u| u.division_id),
        )
        .await?;
        let departments = names_by_id::<entity::prelude::Department, _>(
            self.db,
            entity::department::Column::Id,
            entity::department::Column::Name,
            collect(|u| u.department_id),
        )
        .await?;
        let service_areas = names_by_id::<entity::prelude::ServiceArea, _>(
            self.db,
            entity::service_area::Column::Id,
            entity::service_area::Column::Name,
            collect(|u| u.service_area_id),
        )
        .await?;
        let job_titles = names_by_id::<entity::prelude::JobTitle, _>(
            self.db,
            entity::job_title::Column::Id,
            entity::job_title::Column::Name,
            collect(|u| u.job_title_id),
        )
        .await?;
        let teams = names_by_id::<entity::prelude::Team, _>(
            self.db,
            entity::team::Column::Id,
            entity::team::Column::Name,
            collect(|u| u.team_id),
        )
        .await?;

        let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let mut roles = RoleRepository::new(self.db)
            .get_role_names_by_users(&user_ids, tenant_id)
            .await?;

        let lookup = |names: &HashMap<Uuid, String>, id: Option<Uuid>| {
            id.and_then(|id| names.get(&id).cloned())
        };

        Ok(users
            .into_iter()
            .map(|model| {
                let mut user = User::from_entity(model);
                user.division = lookup(&divisions, user.division_id);
                user.department = lookup(&departments, user.department_id);
                user.service_area = lookup(&service_areas, user.service_area_id);
                user.job_title = lookup(&job_titles, user.job_title_id);
                user.team = lookup(&teams, user.team_id);
                user.roles = roles.remove(&user.id).unwrap_or_default();
                user
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<entity::user::Model, DbErr> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("User {} not found", id)))
    }
}
