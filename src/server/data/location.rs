use std::collections::HashMap;

use chrono::Utc;
use entity::{location::Column, sea_orm_active_enums::Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id},
    model::{
        location::{Location, LocationParams},
        status_dates, Named, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const LOCATION_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("locationId", Column::LocationId, FieldKind::Text),
    GridField::new("type", Column::LocationType, FieldKind::Text),
    GridField::new("country", Column::Country, FieldKind::Text),
    GridField::new("city", Column::City, FieldKind::Text),
    GridField::new("state", Column::State, FieldKind::Text),
    GridField::new("county", Column::County, FieldKind::Text),
    GridField::new("startDate", Column::StartDate, FieldKind::Date),
    GridField::new("endDate", Column::EndDate, FieldKind::Date),
    GridField::new("status", Column::Status, FieldKind::Enum),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct LocationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LocationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Location>, DbErr> {
        let Some(entity) = entity::prelude::Location::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.load(vec![entity]).await?.pop())
    }

    pub async fn find_many(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Location>, DbErr> {
        let entities = entity::prelude::Location::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        self.load(entities).await
    }

    pub async fn get_page(
        &self,
        account_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<Location>, DbErr> {
        let query = entity::prelude::Location::find().filter(Column::AccountId.eq(account_id));
        let query = grid.apply(query).order_by_asc(Column::Name);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.load(page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_by_account(&self, account_id: Uuid) -> Result<Vec<Location>, DbErr> {
        let entities = entity::prelude::Location::find()
            .filter(Column::AccountId.eq(account_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        self.load(entities).await
    }

    /// Whether another location of the account already uses `name`.
    pub async fn name_exists(
        &self,
        account_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::Location::find()
            .filter(Column::AccountId.eq(account_id))
            .filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Whether another location of the tenant already uses `location_id`.
    pub async fn location_id_exists(
        &self,
        tenant_id: Uuid,
        location_id: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::Location::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::LocationId.eq(location_id));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: LocationParams,
    ) -> Result<Uuid, DbErr> {
        let entity = entity::location::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            account_id: ActiveValue::Set(account_id),
            name: ActiveValue::Set(params.name),
            location_id: ActiveValue::Set(params.location_id),
            location_type: ActiveValue::Set(params.location_type),
            country: ActiveValue::Set(params.country),
            address1: ActiveValue::Set(params.address1),
            address2: ActiveValue::Set(params.address2),
            city: ActiveValue::Set(params.city),
            state: ActiveValue::Set(params.state),
            zip: ActiveValue::Set(params.zip),
            county: ActiveValue::Set(params.county),
            address: ActiveValue::Set(params.address),
            phone: ActiveValue::Set(params.phone),
            primary_naics_code: ActiveValue::Set(params.primary_naics_code),
            start_date: ActiveValue::Set(params.start_date),
            end_date: ActiveValue::Set(params.end_date),
            status: ActiveValue::Set(Status::Active),
            deactivation_date: ActiveValue::Set(None),
            reactivation_date: ActiveValue::Set(None),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(entity.id)
    }

    pub async fn update(&self, id: Uuid, params: LocationParams) -> Result<(), DbErr> {
        let mut active = self.get_active(id).await?;
        active.name = ActiveValue::Set(params.name);
        active.location_id = ActiveValue::Set(params.location_id);
        active.location_type = ActiveValue::Set(params.location_type);
        active.country = ActiveValue::Set(params.country);
        active.address1 = ActiveValue::Set(params.address1);
        active.address2 = ActiveValue::Set(params.address2);
        active.city = ActiveValue::Set(params.city);
        active.state = ActiveValue::Set(params.state);
        active.zip = ActiveValue::Set(params.zip);
        active.county = ActiveValue::Set(params.county);
        active.address = ActiveValue::Set(params.address);
        active.phone = ActiveValue::Set(params.phone);
        active.primary_naics_code = ActiveValue::Set(params.primary_naics_code);
        active.start_date = ActiveValue::Set(params.start_date);
        active.end_date = ActiveValue::Set(params.end_date);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));
        active.update(self.db).await?;

        Ok(())
    }

    pub async fn set_status(&self, id: Uuid, status: Status) -> Result<(), DbErr> {
        let now = Utc::now();
        let (deactivation_date, reactivation_date) = status_dates(status, now);

        let mut active = self.get_active(id).await?;
        active.status = ActiveValue::Set(status);
        active.deactivation_date = ActiveValue::Set(deactivation_date);
        active.reactivation_date = ActiveValue::Set(reactivation_date);
        active.last_modified_date = ActiveValue::Set(Some(now));
        active.update(self.db).await?;

        Ok(())
    }

    async fn get_active(&self, id: Uuid) -> Result<entity::location::ActiveModel, DbErr> {
        entity::prelude::Location::find_by_id(id)
            .one(self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| DbErr::RecordNotFound(format!("Location {} not found", id)))
    }

    async fn load(&self, entities: Vec<entity::location::Model>) -> Result<Vec<Location>, DbErr> {
        let links = entity::prelude::EntityLocation::find()
            .filter(
                entity::entity_location::Column::LocationId.is_in(entities.iter().map(|l| l.id)),
            )
            .all(self.db)
            .await?;

        let names = names_by_id::<entity::prelude::LegalEntity, _>(
            self.db,
            entity::legal_entity::Column::Id,
            entity::legal_entity::Column::Name,
            links.iter().map(|l| l.entity_id).collect(),
        )
        .await?;

        let mut associated: HashMap<Uuid, Vec<Named>> = HashMap::new();
        for link in links {
            if let Some(name) = names.get(&link.entity_id) {
                associated
                    .entry(link.location_id)
                    .or_default()
                    .push(Named::new(link.entity_id, name.clone()));
            }
        }

        Ok(entities
            .into_iter()
            .map(|entity| {
                let mut named = associated.remove(&entity.id).unwrap_or_default();
                named.sort_by(|a, b| a.name.cmp(&b.name));
                Location::from_entity(entity, named)
            })
            .collect())
    }
}
