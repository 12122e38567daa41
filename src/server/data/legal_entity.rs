use std::collections::HashMap;

use chrono::Utc;
use entity::{legal_entity::Column, sea_orm_active_enums::Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id},
    model::{
        legal_entity::{EntityParams, LegalEntity, StateId, StateIdParams},
        status_dates, Named, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const ENTITY_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("entityId", Column::EntityId, FieldKind::Text),
    GridField::new("doingBusinessAs", Column::DoingBusinessAs, FieldKind::Text),
    GridField::new("type", Column::EntityType, FieldKind::Text),
    GridField::new("country", Column::Country, FieldKind::Text),
    GridField::new("city", Column::City, FieldKind::Text),
    GridField::new("state", Column::State, FieldKind::Text),
    GridField::new("fein", Column::Fein, FieldKind::Text),
    GridField::new("ein", Column::Ein, FieldKind::Text),
    GridField::new("status", Column::Status, FieldKind::Enum),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct LegalEntityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LegalEntityRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<LegalEntity>, DbErr> {
        let entity = entity::prelude::LegalEntity::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await?;

        Ok(entity.map(LegalEntity::from_entity))
    }

    pub async fn find_many(
        &self,
        tenant_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<LegalEntity>, DbErr> {
        let entities = entity::prelude::LegalEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(LegalEntity::from_entity).collect())
    }

    pub async fn get_page(
        &self,
        account_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<LegalEntity>, DbErr> {
        let query = entity::prelude::LegalEntity::find().filter(Column::AccountId.eq(account_id));
        let query = grid.apply(query).order_by_asc(Column::Name);

        Ok(fetch_page(self.db, query, grid)
            .await?
            .map(LegalEntity::from_entity))
    }

    pub async fn get_by_account(&self, account_id: Uuid) -> Result<Vec<LegalEntity>, DbErr> {
        let entities = entity::prelude::LegalEntity::find()
            .filter(Column::AccountId.eq(account_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(LegalEntity::from_entity).collect())
    }

    /// Whether another entity of the account already uses `name`.
    pub async fn name_exists(
        &self,
        account_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::LegalEntity::find()
            .filter(Column::AccountId.eq(account_id))
            .filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Whether another entity of the tenant already has `value` in the FEIN or EIN column.
    pub async fn tax_id_exists(
        &self,
        tenant_id: Uuid,
        column: Column,
        value: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::LegalEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(column.eq(value));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Inserts the entity together with its initial state ids.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: EntityParams,
    ) -> Result<LegalEntity, DbErr> {
        let id = Uuid::new_v4();
        let state_ids = params.state_ids;

        let entity = entity::legal_entity::ActiveModel {
            id: ActiveValue::Set(id),
            tenant_id: ActiveValue::Set(tenant_id),
            account_id: ActiveValue::Set(account_id),
            name: ActiveValue::Set(params.name),
            entity_id: ActiveValue::Set(params.entity_id),
            doing_business_as: ActiveValue::Set(params.doing_business_as),
            country: ActiveValue::Set(params.country),
            address1: ActiveValue::Set(params.address1),
            address2: ActiveValue::Set(params.address2),
            city: ActiveValue::Set(params.city),
            state: ActiveValue::Set(params.state),
            zip: ActiveValue::Set(params.zip),
            county: ActiveValue::Set(params.county),
            address: ActiveValue::Set(params.address),
            phone: ActiveValue::Set(params.phone),
            entity_type: ActiveValue::Set(params.entity_type),
            tax_year_end_type: ActiveValue::Set(params.tax_year_end_type),
            date_of_incorporation: ActiveValue::Set(params.date_of_incorporation),
            fein: ActiveValue::Set(params.fein),
            ein: ActiveValue::Set(params.ein),
            jurisdiction_id: ActiveValue::Set(params.jurisdiction_id),
            primary_naics_code: ActiveValue::Set(params.primary_naics_code),
            status: ActiveValue::Set(Status::Active),
            deactivation_date: ActiveValue::Set(None),
            reactivation_date: ActiveValue::Set(None),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        self.add_state_ids(tenant_id, id, state_ids).await?;

        Ok(LegalEntity::from_entity(entity))
    }

    pub async fn update(&self, id: Uuid, params: EntityParams) -> Result<LegalEntity, DbErr> {
        let mut active = self.get_active(id).await?;
        active.name = ActiveValue::Set(params.name);
        active.entity_id = ActiveValue::Set(params.entity_id);
        active.doing_business_as = ActiveValue::Set(params.doing_business_as);
        active.country = ActiveValue::Set(params.country);
        active.address1 = ActiveValue::Set(params.address1);
        active.address2 = ActiveValue::Set(params.address2);
        active.city = ActiveValue::Set(params.city);
        active.state = ActiveValue::Set(params.state);
        active.zip = ActiveValue::Set(params.zip);
        active.county = ActiveValue::Set(params.county);
        active.address = ActiveValue::Set(params.address);
        active.phone = ActiveValue::Set(params.phone);
        active.entity_type = ActiveValue::Set(params.entity_type);
        active.tax_year_end_type = ActiveValue::Set(params.tax_year_end_type);
        active.date_of_incorporation = ActiveValue::Set(params.date_of_incorporation);
        active.fein = ActiveValue::Set(params.fein);
        active.ein = ActiveValue::Set(params.ein);
        active.jurisdiction_id = ActiveValue::Set(params.jurisdiction_id);
        active.primary_naics_code = ActiveValue::Set(params.primary_naics_code);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));

        Ok(LegalEntity::from_entity(active.update(self.db).await?))
    }

    pub async fn set_status(&self, id: Uuid, status: Status) -> Result<LegalEntity, DbErr> {
        let now = Utc::now();
        let (deactivation_date, reactivation_date) = status_dates(status, now);

        let mut active = self.get_active(id).await?;
        active.status = ActiveValue::Set(status);
        active.deactivation_date = ActiveValue::Set(deactivation_date);
        active.reactivation_date = ActiveValue::Set(reactivation_date);
        active.last_modified_date = ActiveValue::Set(Some(now));

        Ok(LegalEntity::from_entity(active.update(self.db).await?))
    }

    /// State ids of an entity ordered by state.
    pub async fn get_state_ids(&self, entity_id: Uuid) -> Result<Vec<StateId>, DbErr> {
        let state_ids = entity::prelude::StateId::find()
            .filter(entity::state_id::Column::EntityId.eq(entity_id))
            .order_by_asc(entity::state_id::Column::State)
            .all(self.db)
            .await?;

        Ok(state_ids.into_iter().map(StateId::from_entity).collect())
    }

    /// State ids for many entities at once, each list ordered by state.
    pub async fn get_state_ids_by_entity(
        &self,
        entity_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<StateId>>, DbErr> {
        let mut grouped: HashMap<Uuid, Vec<StateId>> = HashMap::new();
        for state_id in entity::prelude::StateId::find()
            .filter(entity::state_id::Column::EntityId.is_in(entity_ids.to_vec()))
            .order_by_asc(entity::state_id::Column::State)
            .all(self.db)
            .await?
        {
            grouped
                .entry(state_id.entity_id)
                .or_default()
                .push(StateId::from_entity(state_id));
        }

        Ok(grouped)
    }

    pub async fn add_state_ids(
        &self,
        tenant_id: Uuid,
        entity_id: Uuid,
        params: Vec<StateIdParams>,
    ) -> Result<Vec<StateId>, DbErr> {
        if params.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let ids: Vec<Uuid> = params.iter().map(|_| Uuid::new_v4()).collect();
        let models: Vec<entity::state_id::ActiveModel> = ids
            .iter()
            .zip(params)
            .map(|(id, p)| entity::state_id::ActiveModel {
                id: ActiveValue::Set(*id),
                tenant_id: ActiveValue::Set(tenant_id),
                entity_id: ActiveValue::Set(entity_id),
                state: ActiveValue::Set(p.state),
                state_id_type: ActiveValue::Set(p.state_id_type),
                state_id_code: ActiveValue::Set(p.state_id_code),
                local_jurisdiction: ActiveValue::Set(p.local_jurisdiction),
                created_date: ActiveValue::Set(now),
            })
            .collect();

        entity::prelude::StateId::insert_many(models)
            .exec(self.db)
            .await?;

        let inserted = entity::prelude::StateId::find()
            .filter(entity::state_id::Column::Id.is_in(ids))
            .order_by_asc(entity::state_id::Column::State)
            .all(self.db)
            .await?;

        Ok(inserted.into_iter().map(StateId::from_entity).collect())
    }

    pub async fn find_state_id(
        &self,
        entity_id: Uuid,
        id: Uuid,
    ) -> Result<Option<StateId>, DbErr> {
        let state_id = entity::prelude::StateId::find_by_id(id)
            .filter(entity::state_id::Column::EntityId.eq(entity_id))
            .one(self.db)
            .await?;

        Ok(state_id.map(StateId::from_entity))
    }

    pub async fn delete_state_id(&self, id: Uuid) -> Result<(), DbErr> {
        entity::prelude::StateId::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Locations associated with the entity, ordered by name.
    pub async fn get_locations(&self, entity_id: Uuid) -> Result<Vec<Named>, DbErr> {
        let location_ids: Vec<Uuid> = entity::prelude::EntityLocation::find()
            .filter(entity::entity_location::Column::EntityId.eq(entity_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|l| l.location_id)
            .collect();

        let names = names_by_id::<entity::prelude::Location, _>(
            self.db,
            entity::location::Column::Id,
            entity::location::Column::Name,
            location_ids,
        )
        .await?;

        let mut locations: Vec<Named> = names
            .into_iter()
            .map(|(id, name)| Named::new(id, name))
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(locations)
    }

    /// Adds entity-location pairs. Pairs that already exist are skipped.
    pub async fn associate(
        &self,
        tenant_id: Uuid,
        pairs: &[(Uuid, Uuid)],
    ) -> Result<Vec<(Uuid, Uuid)>, DbErr> {
        let mut added = Vec::new();
        for &(entity_id, location_id) in pairs {
            let exists = entity::prelude::EntityLocation::find_by_id((entity_id, location_id))
                .one(self.db)
                .await?
                .is_some();
            if exists {
                continue;
            }

            entity::entity_location::ActiveModel {
                entity_id: ActiveValue::Set(entity_id),
                location_id: ActiveValue::Set(location_id),
                tenant_id: ActiveValue::Set(tenant_id),
            }
            .insert(self.db)
            .await?;
            added.push((entity_id, location_id));
        }

        Ok(added)
    }

    /// Returns `false` when the pair was not associated.
    pub async fn unassociate(&self, entity_id: Uuid, location_id: Uuid) -> Result<bool, DbErr> {
        let result = entity::prelude::EntityLocation::delete_by_id((entity_id, location_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn get_active(&self, id: Uuid) -> Result<entity::legal_entity::ActiveModel, DbErr> {
        entity::prelude::LegalEntity::find_by_id(id)
            .one(self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| DbErr::RecordNotFound(format!("Entity {} not found", id)))
    }
}
