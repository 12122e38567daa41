use chrono::Utc;
use entity::tenant::Column;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::fetch_page,
    model::{tenant::Tenant, Page},
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const TENANT_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("divisionEnabled", Column::DivisionEnabled, FieldKind::Bool),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct TenantRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TenantRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, DbErr> {
        let entity = entity::prelude::Tenant::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Tenant::from_entity))
    }

    pub async fn name_exists(&self, name: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
        let mut query = entity::prelude::Tenant::find().filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        Ok(query.one(self.db).await?.is_some())
    }

    pub async fn create(&self, name: &str) -> Result<Tenant, DbErr> {
        let entity = entity::tenant::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(name.to_string()),
            division_enabled: ActiveValue::Set(true),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(Tenant::from_entity(entity))
    }

    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<Tenant, DbErr> {
        let mut active = self.get_active(id).await?;
        active.name = ActiveValue::Set(name.to_string());
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));

        Ok(Tenant::from_entity(active.update(self.db).await?))
    }

    pub async fn set_division_enabled(&self, id: Uuid, enabled: bool) -> Result<Tenant, DbErr> {
        let mut active = self.get_active(id).await?;
        active.division_enabled = ActiveValue::Set(enabled);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));

        Ok(Tenant::from_entity(active.update(self.db).await?))
    }

    pub async fn get_page(&self, grid: &GridQuery<Column>) -> Result<Page<Tenant>, DbErr> {
        let query = grid
            .apply(entity::prelude::Tenant::find())
            .order_by_asc(Column::Name);

        Ok(fetch_page(self.db, query, grid).await?.map(Tenant::from_entity))
    }

    pub async fn get_all(&self) -> Result<Vec<Tenant>, DbErr> {
        let entities = entity::prelude::Tenant::find()
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Tenant::from_entity).collect())
    }

    async fn get_active(&self, id: Uuid) -> Result<entity::tenant::ActiveModel, DbErr> {
        entity::prelude::Tenant::find_by_id(id)
            .one(self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| DbErr::RecordNotFound(format!("Tenant {} not found", id)))
    }
}
