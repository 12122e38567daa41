//! Locations of an account and their entity associations.

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
            account::AccountRepository,
            legal_entity::LegalEntityRepository,
            location::{LocationRepository, LOCATION_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            legal_entity::LegalEntity,
            location::{Location, LocationExportRow, LocationParams},
            status_label, Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct LocationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LocationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<Location>, AppError> {
        self.check_account(tenant_id, account_id).await?;
        let grid = GridQuery::parse(params, LOCATION_GRID_FIELDS)?;

        Ok(LocationRepository::new(self.db)
            .get_page(account_id, &grid)
            .await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Location, AppError> {
        LocationRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Location", id))
    }

    /// Creates a location, optionally associated with entities of the same account.
    ///
    /// # Returns
    /// - `Err(AppError::Conflict)` - Name taken in the account or location ID taken in the tenant
    /// - `Err(AppError::InvalidOperation)` - End date before start date, or repeated entity ids
    /// - `Err(AppError::NotFound)` - Account or one of the entities does not exist
    pub async fn create(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: LocationParams,
        executor: Executor,
    ) -> Result<Location, AppError> {
        self.check_account(tenant_id, account_id).await?;
        self.check(tenant_id, account_id, None, &params).await?;
        let entities = self
            .find_entities(tenant_id, account_id, &params.entity_ids)
            .await?;

        let entity_ids = params.entity_ids.clone();
        let txn = self.db.begin().await?;
        let id = LocationRepository::new(&txn)
            .create(tenant_id, account_id, params)
            .await?;

        record(
            &txn,
            tenant_id,
            id,
            Activity::LocationCreated(ExecutorEvent::new(executor.clone())),
        )
        .await?;

        if !entity_ids.is_empty() {
            let pairs: Vec<(Uuid, Uuid)> = entity_ids.iter().map(|e| (*e, id)).collect();
            LegalEntityRepository::new(&txn)
                .associate(tenant_id, &pairs)
                .await?;

            let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
            record(
                &txn,
                tenant_id,
                id,
                Activity::LocationEntitiesAssociated(NamesEvent::new(executor.clone(), &names)),
            )
            .await?;
        }
        txn.commit().await?;

        tracing::info!(
            "{} - Location ({}) was created by {}",
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
        params: LocationParams,
        executor: Executor,
    ) -> Result<Location, AppError> {
        let previous = self.get(tenant_id, id).await?;
        self.check(tenant_id, previous.account_id, Some(id), &params)
            .await?;

        let txn = self.db.begin().await?;
        let repo = LocationRepository::new(&txn);
        repo.update(id, params).await?;
        let current = repo
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Location", id))?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_dto(),
            &current.clone().into_dto(),
        )?;
        record(&txn, tenant_id, id, Activity::LocationUpdated(event)).await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Location ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    pub async fn set_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: Status,
        executor: Executor,
    ) -> Result<Location, AppError> {
        self.get(tenant_id, id).await?;

        let txn = self.db.begin().await?;
        LocationRepository::new(&txn)
            .set_status(id, status)
            .await?;
        record(
            &txn,
            tenant_id,
            id,
            Activity::status_change(
                status == Status::Active,
                Activity::LocationReactivated,
                Activity::LocationDeactivated,
                executor.clone(),
            ),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Location ({}) status was changed to {} by {}",
            executor.date,
            id,
            status_label(status),
            executor.executor_id
        );

        self.get(tenant_id, id).await
    }

    /// Associates entities of the same account with the location.
    pub async fn associate_entities(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        entity_ids: &[Uuid],
        executor: Executor,
    ) -> Result<Location, AppError> {
        let location = self.get(tenant_id, id).await?;
        check_unique_ids(entity_ids)?;
        let entities = self
            .find_entities(tenant_id, location.account_id, entity_ids)
            .await?;

        let pairs: Vec<(Uuid, Uuid)> = entity_ids.iter().map(|e| (*e, id)).collect();
        let txn = self.db.begin().await?;
        let added = LegalEntityRepository::new(&txn)
            .associate(tenant_id, &pairs)
            .await?;

        if !added.is_empty() {
            let names: Vec<&str> = entities
                .iter()
                .filter(|e| added.iter().any(|(entity_id, _)| *entity_id == e.id))
                .map(|e| e.name.as_str())
                .collect();
            record(
                &txn,
                tenant_id,
                id,
                Activity::LocationEntitiesAssociated(NamesEvent::new(executor.clone(), &names)),
            )
            .await?;

            tracing::info!(
                "{} - Entities were associated with location ({}) by {}",
                executor.date,
                id,
                executor.executor_id
            );
        }
        txn.commit().await?;

        self.get(tenant_id, id).await
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
            .history(SubjectType::Location, id, &[], page, page_size)
            .await
    }

    pub async fn export(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        self.check_account(tenant_id, account_id).await?;

        let rows: Vec<LocationExportRow> = LocationRepository::new(self.db)
            .get_by_account(account_id)
            .await?
            .into_iter()
            .map(LocationExportRow)
            .collect();

        tracing::info!(
            "{} - Locations export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("locations", file_type, &rows)?)
    }

    async fn check_account(&self, tenant_id: Uuid, account_id: Uuid) -> Result<(), AppError> {
        AccountRepository::new(self.db)
            .find(tenant_id, account_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::missing("Account", account_id))
    }

    async fn check(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        except: Option<Uuid>,
        params: &LocationParams,
    ) -> Result<(), AppError> {
        if !params.has_valid_period() {
            return Err(AppError::InvalidOperation(
                "End date cannot be earlier than the start date".to_string(),
            ));
        }

        let repo = LocationRepository::new(self.db);
        if repo.name_exists(account_id, &params.name, except).await? {
            return Err(AppError::Conflict(
                "Location with the same name already exists".to_string(),
            ));
        }
        if repo
            .location_id_exists(tenant_id, &params.location_id, except)
            .await?
        {
            return Err(AppError::Conflict(
                "Location with the same location ID already exists".to_string(),
            ));
        }

        check_unique_ids(&params.entity_ids)
    }

    /// Loads entities by id, requiring each to exist in the account.
    async fn find_entities(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        entity_ids: &[Uuid],
    ) -> Result<Vec<LegalEntity>, AppError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = LegalEntityRepository::new(self.db)
            .find_many(tenant_id, entity_ids)
            .await?;
        for entity_id in entity_ids {
            let found = entities
                .iter()
                .any(|e| e.id == *entity_id && e.account_id == account_id);
            if !found {
                return Err(AppError::missing("Entity", *entity_id));
            }
        }

        Ok(entities)
    }
}

async fn record<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    location_id: Uuid,
    activity: Activity,
) -> Result<(), AppError> {
    ActivityService::new(db)
        .record(
            Subject::new(SubjectType::Location, location_id, Some(tenant_id)),
            activity,
        )
        .await
}

fn check_unique_ids(ids: &[Uuid]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    if ids.iter().all(|id| seen.insert(id)) {
        Ok(())
    } else {
        Err(AppError::InvalidOperation(
            "Entity IDs must be unique".to_string(),
        ))
    }
}
