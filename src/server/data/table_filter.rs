use entity::{sea_orm_active_enums::TableType, table_filter::Column};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::model::filter::{CreateTableFilterParams, TableFilter};

/// Filters of a user in the current scope. `None` is the system scope of super admins.
fn owned_by(tenant_id: Option<Uuid>, user_id: Uuid) -> Condition {
    let tenant = match tenant_id {
        Some(id) => Column::TenantId.eq(id),
        None => Column::TenantId.is_null(),
    };

    Condition::all().add(tenant).add(Column::UserId.eq(user_id))
}

pub struct TableFilterRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TableFilterRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(
        &self,
        tenant_id: Option<Uuid>,
        user_id: Uuid,
        table_type: TableType,
    ) -> Result<Vec<TableFilter>, DbErr> {
        let filters = entity::prelude::TableFilter::find()
            .filter(owned_by(tenant_id, user_id))
            .filter(Column::TableType.eq(table_type))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(filters.into_iter().map(TableFilter::from_entity).collect())
    }

    pub async fn find(
        &self,
        tenant_id: Option<Uuid>,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<TableFilter>, DbErr> {
        let filter = entity::prelude::TableFilter::find_by_id(id)
            .filter(owned_by(tenant_id, user_id))
            .one(self.db)
            .await?;

        Ok(filter.map(TableFilter::from_entity))
    }

    pub async fn name_exists(
        &self,
        tenant_id: Option<Uuid>,
        user_id: Uuid,
        name: &str,
    ) -> Result<bool, DbErr> {
        let count = entity::prelude::TableFilter::find()
            .filter(owned_by(tenant_id, user_id))
            .filter(Column::Name.eq(name))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn create(
        &self,
        tenant_id: Option<Uuid>,
        user_id: Uuid,
        params: CreateTableFilterParams,
    ) -> Result<TableFilter, DbErr> {
        let entity = entity::table_filter::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(params.name),
            table_type: ActiveValue::Set(params.table_type),
            configuration: ActiveValue::Set(params.configuration),
        }
        .insert(self.db)
        .await?;

        Ok(TableFilter::from_entity(entity))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbErr> {
        entity::prelude::TableFilter::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(())
    }
}
