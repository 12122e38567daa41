use entity::sea_orm_active_enums::SubjectType;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{event::UpdatedEvent, Activity, ActivityItem, Executor, Subject},
        data::{
            team::{TeamRepository, TEAM_GRID_FIELDS},
            user::{UserRepository, USER_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            org_unit::{Team, TeamExportRow, TeamParams},
            user::User,
            Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct TeamService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TeamService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<Team>, AppError> {
        let grid = GridQuery::parse(params, TEAM_GRID_FIELDS)?;

        Ok(TeamRepository::new(self.db).get_page(tenant_id, &grid).await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Team, AppError> {
        TeamRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Team", id))
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        params: TeamParams,
        executor: Executor,
    ) -> Result<Team, AppError> {
        let id = TeamRepository::new(self.db).create(tenant_id, params).await?;

        tracing::info!(
            "{} - Team ({}) was created by {}",
            executor.date,
            id,
            executor.executor_id
        );

        self.get(tenant_id, id).await
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: TeamParams,
        executor: Executor,
    ) -> Result<Team, AppError> {
        let previous = self.get(tenant_id, id).await?;

        let txn = self.db.begin().await?;
        let repo = TeamRepository::new(&txn);
        repo.update(id, params).await?;
        let current = repo
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Team", id))?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_dto(),
            &current.clone().into_dto(),
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::new(SubjectType::Team, id, Some(tenant_id)),
                Activity::TeamUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Team ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    pub async fn users(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: &GridParams,
    ) -> Result<Page<User>, AppError> {
        self.get(tenant_id, id).await?;
        let grid = GridQuery::parse(params, USER_GRID_FIELDS)?;

        let repo = UserRepository::new(self.db);
        let page = repo
            .get_page_by_org_unit(tenant_id, entity::user::Column::TeamId, id, &grid)
            .await?;
        let items = repo.with_details(page.items, Some(tenant_id)).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn export(
        &self,
        tenant_id: Uuid,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        let rows: Vec<TeamExportRow> = TeamRepository::new(self.db)
            .get_all(tenant_id)
            .await?
            .into_iter()
            .map(TeamExportRow)
            .collect();

        tracing::info!(
            "{} - Teams export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("teams", file_type, &rows)?)
    }

    pub async fn activities(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        self.get(tenant_id, id).await?;

        ActivityService::new(self.db)
            .history(SubjectType::Team, id, &[], page, page_size)
            .await
    }
}
