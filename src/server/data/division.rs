use std::collections::HashMap;

use chrono::Utc;
use entity::division::Column;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, user::UserRepository},
    model::{
        org_unit::{Division, DivisionParams},
        Named, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const DIVISION_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("description", Column::Description, FieldKind::Text),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct DivisionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DivisionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Division>, DbErr> {
        let entity = entity::prelude::Division::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await?;

        match entity {
            Some(entity) => Ok(self.load(tenant_id, vec![entity]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, tenant_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        Ok(entity::prelude::Division::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await?
            .is_some())
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<Division>, DbErr> {
        let query = entity::prelude::Division::find().filter(Column::TenantId.eq(tenant_id));
        let query = grid.apply(query).order_by_asc(Column::Name);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.load(tenant_id, page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_all(&self, tenant_id: Uuid) -> Result<Vec<Division>, DbErr> {
        let entities = entity::prelude::Division::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        self.load(tenant_id, entities).await
    }

    /// Inserts a division and attaches the given departments to it.
    pub async fn create(&self, tenant_id: Uuid, params: DivisionParams) -> Result<Uuid, DbErr> {
        let division = entity::division::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        self.set_departments(division.id, &params.department_ids).await?;

        Ok(division.id)
    }

    /// Updates name and description and replaces the attached departments.
    pub async fn update(&self, id: Uuid, params: DivisionParams) -> Result<(), DbErr> {
        let division = entity::prelude::Division::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Division {} not found", id)))?;

        let mut active: entity::division::ActiveModel = division.into();
        active.name = ActiveValue::Set(params.name);
        active.description = ActiveValue::Set(params.description);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));
        active.update(self.db).await?;

        self.set_departments(id, &params.department_ids).await
    }

    /// Detaches departments not in `department_ids` and attaches the listed ones.
    async fn set_departments(&self, division_id: Uuid, department_ids: &[Uuid]) -> Result<(), DbErr> {
        use entity::department::Column as Dept;

        entity::prelude::Department::update_many()
            .col_expr(Dept::DivisionId, Expr::value(Option::<Uuid>::None))
            .filter(Dept::DivisionId.eq(division_id))
            .filter(Dept::Id.is_not_in(department_ids.to_vec()))
            .exec(self.db)
            .await?;

        if !department_ids.is_empty() {
            entity::prelude::Department::update_many()
                .col_expr(Dept::DivisionId, Expr::value(Some(division_id)))
                .filter(Dept::Id.is_in(department_ids.to_vec()))
                .exec(self.db)
                .await?;
        }

        Ok(())
    }

    async fn load(
        &self,
        tenant_id: Uuid,
        entities: Vec<entity::division::Model>,
    ) -> Result<Vec<Division>, DbErr> {
        let ids: Vec<Uuid> = entities.iter().map(|d| d.id).collect();

        let departments = entity::prelude::Department::find()
            .filter(entity::department::Column::DivisionId.is_in(ids.clone()))
            .order_by_asc(entity::department::Column::Name)
            .all(self.db)
            .await?;
        let mut by_division: HashMap<Uuid, Vec<Named>> = HashMap::new();
        for department in departments {
            if let Some(division_id) = department.division_id {
                by_division
                    .entry(division_id)
                    .or_default()
                    .push(Named::new(department.id, department.name));
            }
        }

        let counts = UserRepository::new(self.db)
            .count_by_org_unit(tenant_id, entity::user::Column::DivisionId, &ids)
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| {
                let departments = by_division.remove(&entity.id).unwrap_or_default();
                let users = counts.get(&entity.id).copied().unwrap_or(0);
                Division::from_entity(entity, departments, users)
            })
            .collect())
    }
}
