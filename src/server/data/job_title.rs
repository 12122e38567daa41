use chrono::Utc;
use entity::job_title::Column;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id, user::UserRepository},
    model::{
        org_unit::{DepartmentUnit, DepartmentUnitParams},
        Named, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const JOB_TITLE_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("description", Column::Description, FieldKind::Text),
    GridField::new("departmentId", Column::DepartmentId, FieldKind::Uuid),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct JobTitleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> JobTitleRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_entity(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<entity::job_title::Model>, DbErr> {
        entity::prelude::JobTitle::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<DepartmentUnit>, DbErr> {
        match self.find_entity(tenant_id, id).await? {
            Some(entity) => Ok(self.load(tenant_id, vec![entity]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn find_many(
        &self,
        tenant_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<entity::job_title::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::JobTitle::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await
    }

    pub async fn get_by_department(&self, department_id: Uuid) -> Result<Vec<Named>, DbErr> {
        let titles = entity::prelude::JobTitle::find()
            .filter(Column::DepartmentId.eq(department_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(titles.into_iter().map(|t| Named::new(t.id, t.name)).collect())
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<DepartmentUnit>, DbErr> {
        let query = entity::prelude::JobTitle::find().filter(Column::TenantId.eq(tenant_id));
        let query = grid.apply(query).order_by_asc(Column::Name);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.load(tenant_id, page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_all(&self, tenant_id: Uuid) -> Result<Vec<DepartmentUnit>, DbErr> {
        let entities = entity::prelude::JobTitle::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        self.load(tenant_id, entities).await
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        params: DepartmentUnitParams,
    ) -> Result<Uuid, DbErr> {
        let title = entity::job_title::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            department_id: ActiveValue::Set(params.department_id),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(title.id)
    }

    pub async fn update(&self, id: Uuid, params: DepartmentUnitParams) -> Result<(), DbErr> {
        let title = entity::prelude::JobTitle::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Job title {} not found", id)))?;

        let mut active: entity::job_title::ActiveModel = title.into();
        active.name = ActiveValue::Set(params.name);
        active.description = ActiveValue::Set(params.description);
        active.department_id = ActiveValue::Set(params.department_id);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));
        active.update(self.db).await?;

        Ok(())
    }

    async fn load(
        &self,
        tenant_id: Uuid,
        entities: Vec<entity::job_title::Model>,
    ) -> Result<Vec<DepartmentUnit>, DbErr> {
        let ids: Vec<Uuid> = entities.iter().map(|t| t.id).collect();

        let departments = names_by_id::<entity::prelude::Department, _>(
            self.db,
            entity::department::Column::Id,
            entity::department::Column::Name,
            entities.iter().filter_map(|t| t.department_id).collect(),
        )
        .await?;

        let counts = UserRepository::new(self.db)
            .count_by_org_unit(tenant_id, entity::user::Column::JobTitleId, &ids)
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| DepartmentUnit {
                department: entity.department_id.and_then(|id| {
                    departments.get(&id).map(|name| Named::new(id, name.clone()))
                }),
                number_of_users: counts.get(&entity.id).copied().unwrap_or(0),
                id: entity.id,
                name: entity.name,
                description: entity.description,
                created_date: entity.created_date,
            })
            .collect())
    }
}
