//! Roles, permissions and role membership, plus the startup seeding of both.

use entity::sea_orm_active_enums::SubjectType;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::{
    model::api::GridParams,
    server::{
        activity::{event::NamesEvent, Activity, Executor, Subject},
        data::{
            role::RoleRepository,
            user::{UserRepository, USER_GRID_FIELDS},
        },
        error::AppError,
        middleware::auth::{Permission, SUPER_ADMIN_ROLE},
        model::{
            role::{Role, RolePermission},
            user::CreateUserParams,
            Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

/// Tenant role holding every tenant-level permission.
pub const TENANT_ADMIN_ROLE: &str = "Admin";
/// Tenant role holding read permissions.
pub const TENANT_USER_ROLE: &str = "User";

pub struct RoleService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RoleService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Syncs the permission catalogue and makes sure the super admin role holds all of it.
    pub async fn seed_permissions(&self) -> Result<(), AppError> {
        let repo = RoleRepository::new(self.db);
        let names: Vec<String> = Permission::iter().map(|p| p.to_string()).collect();

        let inserted = repo.sync_permissions(&names).await?;
        if inserted > 0 {
            tracing::info!("Added {} permissions to the catalogue", inserted);
        }

        let role = match repo.find_system_role(SUPER_ADMIN_ROLE).await? {
            Some(role) => role,
            None => repo.create(None, SUPER_ADMIN_ROLE).await?,
        };
        repo.grant_permissions(role.id, &names).await?;

        Ok(())
    }

    /// Creates the super admin user for `email` unless some user already holds the role.
    pub async fn ensure_bootstrap_admin(&self, email: &str) -> Result<(), AppError> {
        let role_repo = RoleRepository::new(self.db);
        let user_repo = UserRepository::new(self.db);

        let role = role_repo
            .find_system_role(SUPER_ADMIN_ROLE)
            .await?
            .ok_or_else(|| AppError::InternalError("Super admin role is missing".to_string()))?;

        if role_repo.count_users(role.id).await? > 0 {
            return Ok(());
        }

        let user = match user_repo.find_by_email(email).await? {
            Some(user) => user,
            None => {
                user_repo
                    .create(CreateUserParams {
                        tenant_id: None,
                        first_name: "Super".to_string(),
                        last_name: "Admin".to_string(),
                        legal_name: "Super Admin".to_string(),
                        email: email.to_lowercase(),
                        division_id: None,
                        department_id: None,
                        service_area_id: None,
                        job_title_id: None,
                        team_id: None,
                    })
                    .await?
            }
        };

        role_repo.add_users(&role, &[user.id]).await?;
        tracing::info!("Granted {} to {}", SUPER_ADMIN_ROLE, user.email);

        Ok(())
    }

    /// Creates the default "Admin" and "User" roles of a new tenant, on the connection
    /// or transaction that created the tenant.
    pub async fn seed_tenant_roles<C: ConnectionTrait>(
        db: &C,
        tenant_id: Uuid,
    ) -> Result<(), AppError> {
        let repo = RoleRepository::new(db);

        let admin_permissions: Vec<String> = Permission::iter()
            .filter(|p| p.is_tenant_level())
            .map(|p| p.to_string())
            .collect();
        let user_permissions: Vec<String> = Permission::iter()
            .filter(|p| p.is_tenant_level() && p.is_read())
            .map(|p| p.to_string())
            .collect();

        let admin = repo.create(Some(tenant_id), TENANT_ADMIN_ROLE).await?;
        repo.grant_permissions(admin.id, &admin_permissions).await?;

        let user = repo.create(Some(tenant_id), TENANT_USER_ROLE).await?;
        repo.grant_permissions(user.id, &user_permissions).await?;

        Ok(())
    }

    pub async fn list(&self, tenant_id: Option<Uuid>) -> Result<Vec<Role>, AppError> {
        let roles = RoleRepository::new(self.db).list(tenant_id).await?;

        Ok(roles
            .into_iter()
            .map(|(role, count)| Role::from_entity(role, count))
            .collect())
    }

    async fn find(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<entity::role::Model, AppError> {
        RoleRepository::new(self.db)
            .find_in_scope(id, tenant_id)
            .await?
            .ok_or_else(|| AppError::missing("Role", id))
    }

    pub async fn permissions(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
    ) -> Result<Vec<RolePermission>, AppError> {
        self.find(tenant_id, id).await?;

        let names = RoleRepository::new(self.db).get_permissions(id).await?;

        Ok(names.into_iter().map(RolePermission::new).collect())
    }

    pub async fn users(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
        params: &GridParams,
    ) -> Result<Page<entity::user::Model>, AppError> {
        self.find(tenant_id, id).await?;
        let grid = GridQuery::parse(params, USER_GRID_FIELDS)?;

        Ok(RoleRepository::new(self.db)
            .get_users_page(id, &grid)
            .await?)
    }

    /// Assigns the role to users, recording `UserRolesAssign` for each newly assigned one.
    ///
    /// # Returns
    /// - `Ok(())` - Users assigned; users already holding the role are skipped
    /// - `Err(AppError::NotFound)` - Role or one of the users is not in the scope
    pub async fn assign_users(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
        user_ids: &[Uuid],
        executor: Executor,
    ) -> Result<(), AppError> {
        let role = self.find(tenant_id, id).await?;
        let user_repo = UserRepository::new(self.db);

        for user_id in user_ids {
            if user_repo.find_in_scope(*user_id, tenant_id).await?.is_none() {
                return Err(AppError::missing("User", user_id));
            }
        }

        let txn = self.db.begin().await?;
        let added = RoleRepository::new(&txn)
            .add_users(&role, user_ids)
            .await?;

        let activity = ActivityService::new(&txn);
        for user_id in &added {
            activity
                .record(
                    Subject::new(SubjectType::User, *user_id, tenant_id),
                    Activity::UserRolesAssign(NamesEvent::new(executor.clone(), &[role.name.as_str()])),
                )
                .await?;
        }
        txn.commit().await?;

        tracing::info!(
            "{} - Role ({}) was assigned to {} user(s) by {}",
            executor.date,
            id,
            added.len(),
            executor.executor_id
        );

        Ok(())
    }

    pub async fn unassign_users(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
        user_ids: &[Uuid],
        executor: Executor,
    ) -> Result<(), AppError> {
        let role = self.find(tenant_id, id).await?;

        let txn = self.db.begin().await?;
        let removed = RoleRepository::new(&txn)
            .remove_users(id, user_ids)
            .await?;

        let activity = ActivityService::new(&txn);
        for user_id in &removed {
            activity
                .record(
                    Subject::new(SubjectType::User, *user_id, tenant_id),
                    Activity::UserRolesUnassign(NamesEvent::new(executor.clone(), &[role.name.as_str()])),
                )
                .await?;
        }
        txn.commit().await?;

        tracing::info!(
            "{} - Role ({}) was unassigned from {} user(s) by {}",
            executor.date,
            id,
            removed.len(),
            executor.executor_id
        );

        Ok(())
    }
}
