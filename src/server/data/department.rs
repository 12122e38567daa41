use std::collections::HashMap;

use chrono::Utc;
use entity::department::Column;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id, user::UserRepository},
    model::{
        org_unit::{Department, DepartmentParams},
        Named, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const DEPARTMENT_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("description", Column::Description, FieldKind::Text),
    GridField::new("divisionId", Column::DivisionId, FieldKind::Uuid),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct DepartmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DepartmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_entity(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<entity::department::Model>, DbErr> {
        entity::prelude::Department::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Department>, DbErr> {
        match self.find_entity(tenant_id, id).await? {
            Some(entity) => Ok(self.load(tenant_id, vec![entity]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Departments of the tenant among `ids`; unknown ids are left out.
    pub async fn find_many(
        &self,
        tenant_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<entity::department::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Department::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await
    }

    /// Departments attached to a division, ordered by name.
    pub async fn get_by_division(&self, division_id: Uuid) -> Result<Vec<Named>, DbErr> {
        let departments = entity::prelude::Department::find()
            .filter(Column::DivisionId.eq(division_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(departments
            .into_iter()
            .map(|d| Named::new(d.id, d.name))
            .collect())
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<Department>, DbErr> {
        let query = entity::prelude::Department::find().filter(Column::TenantId.eq(tenant_id));
        let query = grid.apply(query).order_by_asc(Column::Name);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.load(tenant_id, page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_all(&self, tenant_id: Uuid) -> Result<Vec<Department>, DbErr> {
        let entities = entity::prelude::Department::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        self.load(tenant_id, entities).await
    }

    pub async fn create(&self, tenant_id: Uuid, params: DepartmentParams) -> Result<Uuid, DbErr> {
        let department = entity::department::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            division_id: ActiveValue::Set(params.division_id),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        self.set_children(department.id, &params.service_area_ids, &params.job_title_ids)
            .await?;

        Ok(department.id)
    }

    pub async fn update(&self, id: Uuid, params: DepartmentParams) -> Result<(), DbErr> {
        let department = entity::prelude::Department::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Department {} not found", id)))?;

        let mut active: entity::department::ActiveModel = department.into();
        active.name = ActiveValue::Set(params.name);
        active.description = ActiveValue::Set(params.description);
        active.division_id = ActiveValue::Set(params.division_id);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));
        active.update(self.db).await?;

        self.set_children(id, &params.service_area_ids, &params.job_title_ids)
            .await
    }

    /// Replaces the service areas and job titles attached to the department.
    async fn set_children(
        &self,
        department_id: Uuid,
        service_area_ids: &[Uuid],
        job_title_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        use entity::{job_title::Column as Jt, service_area::Column as Sa};

        entity::prelude::ServiceArea::update_many()
            .col_expr(Sa::DepartmentId, Expr::value(Option::<Uuid>::None))
            .filter(Sa::DepartmentId.eq(department_id))
            .filter(Sa::Id.is_not_in(service_area_ids.to_vec()))
            .exec(self.db)
            .await?;
        if !service_area_ids.is_empty() {
            entity::prelude::ServiceArea::update_many()
                .col_expr(Sa::DepartmentId, Expr::value(Some(department_id)))
                .filter(Sa::Id.is_in(service_area_ids.to_vec()))
                .exec(self.db)
                .await?;
        }

        entity::prelude::JobTitle::update_many()
            .col_expr(Jt::DepartmentId, Expr::value(Option::<Uuid>::None))
            .filter(Jt::DepartmentId.eq(department_id))
            .filter(Jt::Id.is_not_in(job_title_ids.to_vec()))
            .exec(self.db)
            .await?;
        if !job_title_ids.is_empty() {
            entity::prelude::JobTitle::update_many()
                .col_expr(Jt::DepartmentId, Expr::value(Some(department_id)))
                .filter(Jt::Id.is_in(job_title_ids.to_vec()))
                .exec(self.db)
                .await?;
        }

        Ok(())
    }

    async fn load(
        &self,
        tenant_id: Uuid,
        entities: Vec<entity::department::Model>,
    ) -> Result<Vec<Department>, DbErr> {
        let ids: Vec<Uuid> = entities.iter().map(|d| d.id).collect();

        let divisions = names_by_id::<entity::prelude::Division, _>(
            self.db,
            entity::division::Column::Id,
            entity::division::Column::Name,
            entities.iter().filter_map(|d| d.division_id).collect(),
        )
        .await?;

        let mut service_areas: HashMap<Uuid, Vec<Named>> = HashMap::new();
        for area in entity::prelude::ServiceArea::find()
            .filter(entity::service_area::Column::DepartmentId.is_in(ids.clone()))
            .order_by_asc(entity::service_area::Column::Name)
            .all(self.db)
            .await?
        {
            if let Some(department_id) = area.department_id {
                service_areas
                    .entry(department_id)
                    .or_default()
                    .push(Named::new(area.id, area.name));
            }
        }

        let mut job_titles: HashMap<Uuid, Vec<Named>> = HashMap::new();
        for title in entity::prelude::JobTitle::find()
            .filter(entity::job_title::Column::DepartmentId.is_in(ids.clone()))
            .order_by_asc(entity::job_title::Column::Name)
            .all(self.db)
            .await?
        {
            if let Some(department_id) = title.department_id {
                job_titles
                    .entry(department_id)
                    .or_default()
                    .push(Named::new(title.id, title.name));
            }
        }

        let counts = UserRepository::new(self.db)
            .count_by_org_unit(tenant_id, entity::user::Column::DepartmentId, &ids)
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| Department {
                division: entity.division_id.and_then(|id| {
                    divisions.get(&id).map(|name| Named::new(id, name.clone()))
                }),
                service_areas: service_areas.remove(&entity.id).unwrap_or_default(),
                job_titles: job_titles.remove(&entity.id).unwrap_or_default(),
                number_of_users: counts.get(&entity.id).copied().unwrap_or(0),
                id: entity.id,
                name: entity.name,
                description: entity.description,
                created_date: entity.created_date,
            })
            .collect())
    }
}
