//! Legal entities of an account, their state ids and location associations.

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
            legal_entity::{LegalEntityRepository, ENTITY_GRID_FIELDS},
            location::LocationRepository,
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            legal_entity::{EntityExportRow, EntityParams, LegalEntity, StateId, StateIdParams},
            status_label, Named, Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

/// Upper bound of state ids per entity.
pub const MAX_STATE_IDS: usize = 25;

pub struct LegalEntityService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LegalEntityService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<LegalEntity>, AppError> {
        self.check_account(tenant_id, account_id).await?;
        let grid = GridQuery::parse(params, ENTITY_GRID_FIELDS)?;

        Ok(LegalEntityRepository::new(self.db)
            .get_page(account_id, &grid)
            .await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<LegalEntity, AppError> {
        LegalEntityRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Entity", id))
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: EntityParams,
        executor: Executor,
    ) -> Result<LegalEntity, AppError> {
        self.check_account(tenant_id, account_id).await?;
        self.check_unique(tenant_id, account_id, None, &params)
            .await?;
        check_state_ids(&[], &params.state_ids)?;

        let txn = self.db.begin().await?;
        let entity = LegalEntityRepository::new(&txn)
            .create(tenant_id, account_id, params)
            .await?;
        record(
            &txn,
            tenant_id,
            entity.id,
            Activity::EntityCreated(ExecutorEvent::new(executor.clone())),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Entity ({}) was created by {}",
            executor.date,
            entity.id,
            executor.executor_id
        );

        Ok(entity)
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: EntityParams,
        executor: Executor,
    ) -> Result<LegalEntity, AppError> {
        let previous = self.get(tenant_id, id).await?;
        self.check_unique(tenant_id, previous.account_id, Some(id), &params)
            .await?;

        let txn = self.db.begin().await?;
        let current = LegalEntityRepository::new(&txn)
            .update(id, params)
            .await?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_dto(),
            &current.clone().into_dto(),
        )?;
        record(&txn, tenant_id, id, Activity::EntityUpdated(event)).await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Entity ({}) was updated by {}",
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
    ) -> Result<LegalEntity, AppError> {
        self.get(tenant_id, id).await?;

        let txn = self.db.begin().await?;
        let entity = LegalEntityRepository::new(&txn)
            .set_status(id, status)
            .await?;
        record(
            &txn,
            tenant_id,
            id,
            Activity::status_change(
                status == Status::Active,
                Activity::EntityReactivated,
                Activity::EntityDeactivated,
                executor.clone(),
            ),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Entity ({}) status was changed to {} by {}",
            executor.date,
            id,
            status_label(status),
            executor.executor_id
        );

        Ok(entity)
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
            .history(SubjectType::Entity, id, &[], page, page_size)
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
        let repo = LegalEntityRepository::new(self.db);

        let entities = repo.get_by_account(account_id).await?;
        let ids: Vec<Uuid> = entities.iter().map(|e| e.id).collect();
        let mut state_ids = repo.get_state_ids_by_entity(&ids).await?;

        let rows: Vec<EntityExportRow> = entities
            .into_iter()
            .map(|entity| EntityExportRow {
                state_ids: state_ids.remove(&entity.id).unwrap_or_default(),
                entity,
            })
            .collect();

        tracing::info!(
            "{} - Entities export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("entities", file_type, &rows)?)
    }

    pub async fn state_ids(&self, tenant_id: Uuid, id: Uuid) -> Result<Vec<StateId>, AppError> {
        self.get(tenant_id, id).await?;

        Ok(LegalEntityRepository::new(self.db)
            .get_state_ids(id)
            .await?)
    }

    /// # Returns
    /// - `Err(AppError::InvalidOperation)` - A state is repeated or already present, or the
    ///   entity would exceed `MAX_STATE_IDS`
    pub async fn add_state_ids(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: Vec<StateIdParams>,
        executor: Executor,
    ) -> Result<Vec<StateId>, AppError> {
        self.get(tenant_id, id).await?;
        let repo = LegalEntityRepository::new(self.db);

        let existing = repo.get_state_ids(id).await?;
        check_state_ids(&existing, &params)?;

        let txn = self.db.begin().await?;
        let added = LegalEntityRepository::new(&txn)
            .add_state_ids(tenant_id, id, params)
            .await?;
        let codes: Vec<&str> = added.iter().map(|s| s.state_id_code.as_str()).collect();
        record(
            &txn,
            tenant_id,
            id,
            Activity::EntityStateIdAdded(NamesEvent::new(executor.clone(), &codes)),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - State IDs were added to entity ({}) by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(repo.get_state_ids(id).await?)
    }

    pub async fn remove_state_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        state_id: Uuid,
        executor: Executor,
    ) -> Result<(), AppError> {
        self.get(tenant_id, id).await?;
        let repo = LegalEntityRepository::new(self.db);

        let removed = repo
            .find_state_id(id, state_id)
            .await?
            .ok_or_else(|| AppError::missing("State ID", state_id))?;
        let txn = self.db.begin().await?;
        LegalEntityRepository::new(&txn)
            .delete_state_id(state_id)
            .await?;
        record(
            &txn,
            tenant_id,
            id,
            Activity::EntityStateIdDeleted(NamesEvent::new(
                executor.clone(),
                &[removed.state_id_code],
            )),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - State ID ({}) was removed from entity ({}) by {}",
            executor.date,
            state_id,
            id,
            executor.executor_id
        );

        Ok(())
    }

    pub async fn locations(&self, tenant_id: Uuid, id: Uuid) -> Result<Vec<Named>, AppError> {
        self.get(tenant_id, id).await?;

        Ok(LegalEntityRepository::new(self.db)
            .get_locations(id)
            .await?)
    }

    /// Associates locations of the same account with the entity. Existing associations
    /// are kept as they are.
    pub async fn associate_locations(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        location_ids: &[Uuid],
        executor: Executor,
    ) -> Result<Vec<Named>, AppError> {
        let entity = self.get(tenant_id, id).await?;

        let locations = LocationRepository::new(self.db)
            .find_many(tenant_id, location_ids)
            .await?;
        for location_id in location_ids {
            let found = locations
                .iter()
                .any(|l| l.id == *location_id && l.account_id == entity.account_id);
            if !found {
                return Err(AppError::missing("Location", *location_id));
            }
        }

        let pairs: Vec<(Uuid, Uuid)> = location_ids.iter().map(|l| (id, *l)).collect();
        let txn = self.db.begin().await?;
        let added = LegalEntityRepository::new(&txn)
            .associate(tenant_id, &pairs)
            .await?;

        if !added.is_empty() {
            let names: Vec<&str> = locations
                .iter()
                .filter(|l| added.iter().any(|(_, location_id)| *location_id == l.id))
                .map(|l| l.name.as_str())
                .collect();
            record(
                &txn,
                tenant_id,
                id,
                Activity::EntityLocationsAssociated(NamesEvent::new(executor.clone(), &names)),
            )
            .await?;

            tracing::info!(
                "{} - Locations were associated with entity ({}) by {}",
                executor.date,
                id,
                executor.executor_id
            );
        }
        txn.commit().await?;

        Ok(LegalEntityRepository::new(self.db)
            .get_locations(id)
            .await?)
    }

    pub async fn unassociate_location(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        location_id: Uuid,
        executor: Executor,
    ) -> Result<(), AppError> {
        self.get(tenant_id, id).await?;
        let location = LocationRepository::new(self.db)
            .find(tenant_id, location_id)
            .await?
            .ok_or_else(|| AppError::missing("Location", location_id))?;

        let txn = self.db.begin().await?;
        if !LegalEntityRepository::new(&txn)
            .unassociate(id, location_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "Location with the ID {} is not associated with the entity.",
                location_id
            )));
        }
        record(
            &txn,
            tenant_id,
            id,
            Activity::EntityLocationUnassociated(NamesEvent::new(
                executor.clone(),
                &[location.name],
            )),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Location ({}) was unassociated from entity ({}) by {}",
            executor.date,
            location_id,
            id,
            executor.executor_id
        );

        Ok(())
    }

    async fn check_account(&self, tenant_id: Uuid, account_id: Uuid) -> Result<(), AppError> {
        AccountRepository::new(self.db)
            .find(tenant_id, account_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::missing("Account", account_id))
    }

    /// Name is unique per account, FEIN and EIN are unique per tenant.
    async fn check_unique(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        except: Option<Uuid>,
        params: &EntityParams,
    ) -> Result<(), AppError> {
        use entity::legal_entity::Column;

        let repo = LegalEntityRepository::new(self.db);

        if repo.name_exists(account_id, &params.name, except).await? {
            return Err(AppError::Conflict(format!(
                "Entity with the same name {} already exists",
                params.name
            )));
        }
        if let Some(fein) = &params.fein {
            if repo
                .tax_id_exists(tenant_id, Column::Fein, fein, except)
                .await?
            {
                return Err(AppError::InvalidOperation(format!(
                    "Entity with the same FEIN '{}' already exists",
                    fein
                )));
            }
        }
        if let Some(ein) = &params.ein {
            if repo
                .tax_id_exists(tenant_id, Column::Ein, ein, except)
                .await?
            {
                return Err(AppError::InvalidOperation(format!(
                    "Entity with the same EIN '{}' already exists",
                    ein
                )));
            }
        }

        Ok(())
    }
}

async fn record<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    entity_id: Uuid,
    activity: Activity,
) -> Result<(), AppError> {
    ActivityService::new(db)
        .record(
            Subject::new(SubjectType::Entity, entity_id, Some(tenant_id)),
            activity,
        )
        .await
}

/// Each state appears at most once per entity, with at most `MAX_STATE_IDS` in total.
fn check_state_ids(existing: &[StateId], requested: &[StateIdParams]) -> Result<(), AppError> {
    if existing.len() + requested.len() > MAX_STATE_IDS {
        return Err(AppError::InvalidOperation(format!(
            "An entity can have at most {} state IDs",
            MAX_STATE_IDS
        )));
    }

    let mut states: HashSet<&str> = existing.iter().map(|s| s.state.as_str()).collect();
    for state_id in requested {
        if !states.insert(state_id.state.as_str()) {
            return Err(AppError::InvalidOperation(format!(
                "State ID for the state {} already exists",
                state_id.state
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(state: &str) -> StateIdParams {
        StateIdParams {
            state: state.to_string(),
            state_id_type: "Tax".to_string(),
            state_id_code: format!("{}-1", state),
            local_jurisdiction: None,
        }
    }

    fn existing(state: &str) -> StateId {
        StateId {
            id: Uuid::new_v4(),
            entity_id: Uuid::new_v4(),
            state: state.to_string(),
            state_id_type: "Tax".to_string(),
            state_id_code: format!("{}-0", state),
            local_jurisdiction: None,
        }
    }

    #[test]
    fn rejects_state_already_on_entity() {
        let result = check_state_ids(&[existing("NY")], &[params("NY")]);

        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[test]
    fn rejects_state_repeated_in_request() {
        let result = check_state_ids(&[], &[params("CA"), params("CA")]);

        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[test]
    fn rejects_more_than_limit() {
        let full: Vec<StateId> = (0..MAX_STATE_IDS)
            .map(|i| existing(&format!("S{}", i)))
            .collect();

        let result = check_state_ids(&full, &[params("NY")]);

        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[test]
    fn accepts_new_states_within_limit() {
        let result = check_state_ids(&[existing("NY")], &[params("CA"), params("TX")]);

        assert!(result.is_ok());
    }
}
