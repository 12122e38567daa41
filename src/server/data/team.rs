use chrono::Utc;
use entity::team::Column;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, user::UserRepository},
    model::{
        org_unit::{Team, TeamParams},
        Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const TEAM_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("description", Column::Description, FieldKind::Text),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct TeamRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TeamRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_entity(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<entity::team::Model>, DbErr> {
        entity::prelude::Team::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Team>, DbErr> {
        match self.find_entity(tenant_id, id).await? {
            Some(entity) => Ok(self.load(tenant_id, vec![entity]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<Team>, DbErr> {
        let query = entity::prelude::Team::find().filter(Column::TenantId.eq(tenant_id));
        let query = grid.apply(query).order_by_asc(Column::Name);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.load(tenant_id, page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_all(&self, tenant_id: Uuid) -> Result<Vec<Team>, DbErr> {
        let entities = entity::prelude::Team::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        self.load(tenant_id, entities).await
    }

    pub async fn create(&self, tenant_id: Uuid, params: TeamParams) -> Result<Uuid, DbErr> {
        let team = entity::team::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(team.id)
    }

    pub async fn update(&self, id: Uuid, params: TeamParams) -> Result<(), DbErr> {
        let team = entity::prelude::Team::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Team {} not found", id)))?;

        let mut active: entity::team::ActiveModel = team.into();
        active.name = ActiveValue::Set(params.name);
        active.description = ActiveValue::Set(params.description);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));
        active.update(self.db).await?;

        Ok(())
    }

    async fn load(
        &self,
        tenant_id: Uuid,
        entities: Vec<entity::team::Model>,
    ) -> Result<Vec<Team>, DbErr> {
        let ids: Vec<Uuid> = entities.iter().map(|t| t.id).collect();
        let counts = UserRepository::new(self.db)
            .count_by_org_unit(tenant_id, entity::user::Column::TeamId, &ids)
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| {
                let users = counts.get(&entity.id).copied().unwrap_or(0);
                Team::from_entity(entity, users)
            })
            .collect())
    }
}
