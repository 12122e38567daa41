//! User management: listing, creation with org unit validation, status and roles.

use std::collections::HashSet;

use entity::sea_orm_active_enums::{Status, SubjectType};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{
            event::{ExecutorEvent, NamesEvent, UpdatedEvent},
            Activity, ActivityItem, Executor, Subject,
        },
        data::{
            department::DepartmentRepository,
            division::DivisionRepository,
            job_title::JobTitleRepository,
            role::RoleRepository,
            service_area::ServiceAreaRepository,
            team::TeamRepository,
            user::{UserRepository, USER_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            user::{
                CreateUserParams, UpdateUserParams, User, UserExportRow, UserOrgUnits,
                UserSnapshot,
            },
            status_label, Page,
        },
        service::{
            activity::ActivityService,
            email::{EmailSender, UserCreatedMessage},
        },
        util::grid::GridQuery,
    },
};

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Users of `tenant_id`, or every user when `None`.
    pub async fn get_page(
        &self,
        tenant_id: Option<Uuid>,
        params: &GridParams,
    ) -> Result<Page<User>, AppError> {
        let grid = GridQuery::parse(params, USER_GRID_FIELDS)?;

        let repo = UserRepository::new(self.db);
        let page = repo.get_page(tenant_id, &grid).await?;
        let items = repo.with_details(page.items, tenant_id).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get(&self, tenant_id: Option<Uuid>, id: Uuid) -> Result<User, AppError> {
        load(self.db, tenant_id, id).await
    }

    /// Creates an active user, records `UserCreated` and sends the welcome email.
    ///
    /// # Returns
    /// - `Ok(User)` - Created user
    /// - `Err(AppError::Conflict)` - Email already taken
    /// - `Err(AppError::InvalidOperation)` - An org unit does not exist in the tenant
    pub async fn create(
        &self,
        params: CreateUserParams,
        division_enabled: bool,
        executor: Executor,
        email_sender: &EmailSender,
    ) -> Result<User, AppError> {
        let repo = UserRepository::new(self.db);

        if repo.find_by_email(&params.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User with email {} already exists",
                params.email
            )));
        }

        self.check_org_units(params.tenant_id, division_enabled, &params.org_units())
            .await?;

        let tenant_id = params.tenant_id;
        let txn = self.db.begin().await?;
        let user = UserRepository::new(&txn).create(params).await?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::User, user.id, tenant_id),
                Activity::UserCreated(ExecutorEvent::new(executor.clone())),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - User ({}) was created by {}",
            executor.date,
            user.id,
            executor.executor_id
        );

        let message = UserCreatedMessage {
            email: user.email.clone(),
        };
        if let Err(err) = email_sender.send_user_created(&message).await {
            tracing::warn!("Failed to send account details to {}: {}", user.email, err);
        }

        self.get(tenant_id, user.id).await
    }

    pub async fn update(
        &self,
        tenant_id: Option<Uuid>,
        division_enabled: bool,
        params: UpdateUserParams,
        executor: Executor,
    ) -> Result<User, AppError> {
        let id = params.id;
        let previous = self.get(tenant_id, id).await?;

        self.check_org_units(tenant_id, division_enabled, &params.org_units)
            .await?;

        let txn = self.db.begin().await?;
        UserRepository::new(&txn).update(params).await?;
        let current = load(&txn, tenant_id, id).await?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &UserSnapshot::from(&previous),
            &UserSnapshot::from(&current),
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::User, id, tenant_id),
                Activity::UserUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - User ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    pub async fn set_status(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
        status: Status,
        executor: Executor,
    ) -> Result<User, AppError> {
        self.get(tenant_id, id).await?;

        let txn = self.db.begin().await?;
        UserRepository::new(&txn).set_status(id, status).await?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::User, id, tenant_id),
                Activity::status_change(
                    status == Status::Active,
                    Activity::UserReactivated,
                    Activity::UserDeactivated,
                    executor.clone(),
                ),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - User ({}) status was changed to {} by {}",
            executor.date,
            id,
            status_label(status),
            executor.executor_id
        );

        self.get(tenant_id, id).await
    }

    /// Replaces the user's roles of the given scope with `role_ids`.
    ///
    /// Only roles owned by the scope are touched: tenant roles inside a tenant, system
    /// roles without one.
    pub async fn change_roles(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
        role_ids: &[Uuid],
        executor: Executor,
    ) -> Result<User, AppError> {
        self.get(tenant_id, id).await?;
        let role_repo = RoleRepository::new(self.db);

        let requested = role_repo
            .find_many_in_scope(role_ids, tenant_id)
            .await?;
        if let Some(missing) = role_ids
            .iter()
            .find(|rid| !requested.iter().any(|r| r.id == **rid))
        {
            return Err(AppError::missing("Role", missing));
        }

        let current: Vec<_> = role_repo
            .get_user_roles(id, tenant_id)
            .await?
            .into_iter()
            .filter(|r| r.tenant_id == tenant_id)
            .collect();

        let requested_ids: HashSet<Uuid> = requested.iter().map(|r| r.id).collect();
        let current_ids: HashSet<Uuid> = current.iter().map(|r| r.id).collect();

        let txn = self.db.begin().await?;
        let role_repo = RoleRepository::new(&txn);

        let mut removed = Vec::new();
        for role in current.iter().filter(|r| !requested_ids.contains(&r.id)) {
            role_repo.remove_users(role.id, &[id]).await?;
            removed.push(role.name.as_str());
        }

        let mut added = Vec::new();
        for role in requested.iter().filter(|r| !current_ids.contains(&r.id)) {
            role_repo.add_users(role, &[id]).await?;
            added.push(role.name.as_str());
        }

        let activity = ActivityService::new(&txn);
        let subject = Subject::new(SubjectType::User, id, tenant_id);
        if !removed.is_empty() {
            activity
                .record(
                    subject,
                    Activity::UserRolesUnassign(NamesEvent::new(executor.clone(), &removed)),
                )
                .await?;
        }
        if !added.is_empty() {
            activity
                .record(
                    subject,
                    Activity::UserRolesAssign(NamesEvent::new(executor.clone(), &added)),
                )
                .await?;
        }
        txn.commit().await?;

        tracing::info!(
            "{} - User ({}) roles were changed by {}",
            executor.date,
            id,
            executor.executor_id
        );

        self.get(tenant_id, id).await
    }

    /// Checks that every assigned org unit exists in the tenant and that they nest.
    async fn check_org_units(
        &self,
        tenant_id: Option<Uuid>,
        division_enabled: bool,
        units: &UserOrgUnits,
    ) -> Result<(), AppError> {
        let invalid = |kind: &str, id: Uuid| {
            AppError::InvalidOperation(format!("{} with the ID {} does not exist.", kind, id))
        };

        let Some(tenant_id) = tenant_id else {
            return match units {
                UserOrgUnits {
                    division_id: Some(id),
                    ..
                } => Err(invalid("Division", *id)),
                UserOrgUnits {
                    department_id: Some(id),
                    ..
                } => Err(invalid("Department", *id)),
                UserOrgUnits {
                    service_area_id: Some(id),
                    ..
                } => Err(invalid("Service area", *id)),
                UserOrgUnits {
                    job_title_id: Some(id),
                    ..
                } => Err(invalid("Job title", *id)),
                UserOrgUnits {
                    team_id: Some(id),
                    ..
                } => Err(invalid("Team", *id)),
                _ => Ok(()),
            };
        };

        if let Some(division_id) = units.division_id {
            if !DivisionRepository::new(self.db)
                .exists(tenant_id, division_id)
                .await?
            {
                return Err(invalid("Division", division_id));
            }
        }

        if let Some(department_id) = units.department_id {
            let department = DepartmentRepository::new(self.db)
                .find_entity(tenant_id, department_id)
                .await?
                .ok_or_else(|| invalid("Department", department_id))?;

            if division_enabled {
                if let Some(division_id) = units.division_id {
                    if department.division_id != Some(division_id) {
                        return Err(AppError::InvalidOperation(format!(
                            "Division {} and Department {} do not match.",
                            division_id, department_id
                        )));
                    }
                }
            }
        }

        // Without a department a service area or job title only has to exist in the tenant.
        if let Some(service_area_id) = units.service_area_id {
            let area = ServiceAreaRepository::new(self.db)
                .find_entity(tenant_id, service_area_id)
                .await?;
            match area {
                Some(area)
                    if units.department_id.is_none()
                        || area.department_id == units.department_id => {}
                _ => return Err(invalid("Service area", service_area_id)),
            }
        }

        if let Some(job_title_id) = units.job_title_id {
            let title = JobTitleRepository::new(self.db)
                .find_entity(tenant_id, job_title_id)
                .await?;
            match title {
                Some(title)
                    if units.department_id.is_none()
                        || title.department_id == units.department_id => {}
                _ => return Err(invalid("Job title", job_title_id)),
            }
        }

        if let Some(team_id) = units.team_id {
            if TeamRepository::new(self.db)
                .find_entity(tenant_id, team_id)
                .await?
                .is_none()
            {
                return Err(invalid("Team", team_id));
            }
        }

        Ok(())
    }

    pub async fn activities(
        &self,
        tenant_id: Option<Uuid>,
        id: Uuid,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        self.get(tenant_id, id).await?;

        ActivityService::new(self.db)
            .history(SubjectType::User, id, &[], page, page_size)
            .await
    }

    pub async fn export(
        &self,
        tenant_id: Option<Uuid>,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        let repo = UserRepository::new(self.db);
        let users = repo.get_all(tenant_id).await?;
        let rows: Vec<UserExportRow> = repo
            .with_details(users, tenant_id)
            .await?
            .into_iter()
            .map(UserExportRow)
            .collect();

        tracing::info!(
            "{} - Users export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("users", file_type, &rows)?)
    }
}

/// User with roles and org unit names, visible from `tenant_id`.
async fn load<C: ConnectionTrait>(
    db: &C,
    tenant_id: Option<Uuid>,
    id: Uuid,
) -> Result<User, AppError> {
    let repo = UserRepository::new(db);

    let user = repo
        .find_in_scope(id, tenant_id)
        .await?
        .ok_or_else(|| AppError::missing("User", id))?;

    repo.with_details(vec![user], tenant_id)
        .await?
        .pop()
        .ok_or_else(|| AppError::missing("User", id))
}
