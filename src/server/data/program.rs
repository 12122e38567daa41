//! Program catalogue and tenant program assignments.

use std::collections::HashMap;

use chrono::Utc;
use entity::{program::Column, sea_orm_active_enums::Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id},
    model::{
        program::{Program, ProgramParams, TenantProgram},
        status_dates, Named, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const PROGRAM_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("reference", Column::Reference, FieldKind::Text),
    GridField::new("agency", Column::Agency, FieldKind::Text),
    GridField::new("jurisdiction", Column::Jurisdiction, FieldKind::Text),
    GridField::new("jurisdictionName", Column::JurisdictionName, FieldKind::Text),
    GridField::new("incentivesArea", Column::IncentivesArea, FieldKind::Text),
    GridField::new("incentivesType", Column::IncentivesType, FieldKind::Text),
    GridField::new("startDate", Column::StartDate, FieldKind::Date),
    GridField::new("endDate", Column::EndDate, FieldKind::Date),
    GridField::new("status", Column::Status, FieldKind::Enum),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct ProgramRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ProgramRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Program>, DbErr> {
        let entity = entity::prelude::Program::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Program::from_entity))
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Program>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::Program::find()
            .filter(Column::Id.is_in(ids.to_vec()))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Program::from_entity).collect())
    }

    pub async fn get_page(&self, grid: &GridQuery<Column>) -> Result<Page<Program>, DbErr> {
        let query = grid
            .apply(entity::prelude::Program::find())
            .order_by_asc(Column::Name);

        Ok(fetch_page(self.db, query, grid).await?.map(Program::from_entity))
    }

    pub async fn get_all(&self) -> Result<Vec<Program>, DbErr> {
        let entities = entity::prelude::Program::find()
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Program::from_entity).collect())
    }

    pub async fn create(&self, params: ProgramParams) -> Result<Program, DbErr> {
        let entity = entity::program::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(params.name),
            reference: ActiveValue::Set(params.reference),
            overview: ActiveValue::Set(params.overview),
            legal_authority: ActiveValue::Set(params.legal_authority),
            agency: ActiveValue::Set(params.agency),
            jurisdiction: ActiveValue::Set(params.jurisdiction),
            jurisdiction_name: ActiveValue::Set(params.jurisdiction_name),
            incentives_area: ActiveValue::Set(params.incentives_area),
            incentives_type: ActiveValue::Set(params.incentives_type),
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

        Ok(Program::from_entity(entity))
    }

    pub async fn update(&self, id: Uuid, params: ProgramParams) -> Result<Program, DbErr> {
        let mut active = self.get_active(id).await?;
        active.name = ActiveValue::Set(params.name);
        active.reference = ActiveValue::Set(params.reference);
        active.overview = ActiveValue::Set(params.overview);
        active.legal_authority = ActiveValue::Set(params.legal_authority);
        active.agency = ActiveValue::Set(params.agency);
        active.jurisdiction = ActiveValue::Set(params.jurisdiction);
        active.jurisdiction_name = ActiveValue::Set(params.jurisdiction_name);
        active.incentives_area = ActiveValue::Set(params.incentives_area);
        active.incentives_type = ActiveValue::Set(params.incentives_type);
        active.start_date = ActiveValue::Set(params.start_date);
        active.end_date = ActiveValue::Set(params.end_date);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));

        Ok(Program::from_entity(active.update(self.db).await?))
    }

    pub async fn set_status(&self, id: Uuid, status: Status) -> Result<Program, DbErr> {
        let now = Utc::now();
        let (deactivation_date, reactivation_date) = status_dates(status, now);

        let mut active = self.get_active(id).await?;
        active.status = ActiveValue::Set(status);
        active.deactivation_date = ActiveValue::Set(deactivation_date);
        active.reactivation_date = ActiveValue::Set(reactivation_date);
        active.last_modified_date = ActiveValue::Set(Some(now));

        Ok(Program::from_entity(active.update(self.db).await?))
    }

    async fn get_active(&self, id: Uuid) -> Result<entity::program::ActiveModel, DbErr> {
        entity::prelude::Program::find_by_id(id)
            .one(self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| DbErr::RecordNotFound(format!("Program {} not found", id)))
    }

    pub async fn find_tenant_program(
        &self,
        tenant_id: Uuid,
        program_id: Uuid,
    ) -> Result<Option<entity::tenant_program::Model>, DbErr> {
        entity::prelude::TenantProgram::find_by_id((tenant_id, program_id))
            .one(self.db)
            .await
    }

    pub async fn get_tenant_program_ids(&self, tenant_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        let rows = entity::prelude::TenantProgram::find()
            .filter(entity::tenant_program::Column::TenantId.eq(tenant_id))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|r| r.program_id).collect())
    }

    /// Programs assigned to the tenant, ordered by name.
    pub async fn get_tenant_programs(&self, tenant_id: Uuid) -> Result<Vec<TenantProgram>, DbErr> {
        let rows = entity::prelude::TenantProgram::find()
            .filter(entity::tenant_program::Column::TenantId.eq(tenant_id))
            .find_also_related(entity::prelude::Program)
            .all(self.db)
            .await?;

        let departments = names_by_id::<entity::prelude::Department, _>(
            self.db,
            entity::department::Column::Id,
            entity::department::Column::Name,
            rows.iter().filter_map(|(tp, _)| tp.department_id).collect(),
        )
        .await?;
        let service_areas = names_by_id::<entity::prelude::ServiceArea, _>(
            self.db,
            entity::service_area::Column::Id,
            entity::service_area::Column::Name,
            rows.iter().filter_map(|(tp, _)| tp.service_area_id).collect(),
        )
        .await?;

        let named = |names: &HashMap<Uuid, String>, id: Option<Uuid>| {
            id.and_then(|id| names.get(&id).map(|name| Named::new(id, name.clone())))
        };

        let mut programs: Vec<TenantProgram> = rows
            .into_iter()
            .filter_map(|(tp, program)| {
                program.map(|program| TenantProgram {
                    program_id: program.id,
                    name: program.name,
                    reference: program.reference,
                    jurisdiction: program.jurisdiction,
                    jurisdiction_name: program.jurisdiction_name,
                    status: tp.status,
                    department: named(&departments, tp.department_id),
                    service_area: named(&service_areas, tp.service_area_id),
                    deactivation_date: tp.deactivation_date,
                    reactivation_date: tp.reactivation_date,
                })
            })
            .collect();
        programs.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(programs)
    }

    pub async fn assign_to_tenant(&self, tenant_id: Uuid, program_ids: &[Uuid]) -> Result<(), DbErr> {
        for program_id in program_ids {
            entity::tenant_program::ActiveModel {
                tenant_id: ActiveValue::Set(tenant_id),
                program_id: ActiveValue::Set(*program_id),
                department_id: ActiveValue::Set(None),
                service_area_id: ActiveValue::Set(None),
                status: ActiveValue::Set(Status::Active),
                deactivation_date: ActiveValue::Set(None),
                reactivation_date: ActiveValue::Set(None),
                created_date: ActiveValue::Set(Utc::now()),
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }

    pub async fn unassign_from_tenant(
        &self,
        tenant_id: Uuid,
        program_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        if program_ids.is_empty() {
            return Ok(());
        }

        entity::prelude::TenantProgram::delete_many()
            .filter(entity::tenant_program::Column::TenantId.eq(tenant_id))
            .filter(entity::tenant_program::Column::ProgramId.is_in(program_ids.to_vec()))
            .exec(self.db)
            .await?;

        Ok(())
    }

    pub async fn set_tenant_status(
        &self,
        tenant_program: entity::tenant_program::Model,
        status: Status,
    ) -> Result<(), DbErr> {
        let (deactivation_date, reactivation_date) = status_dates(status, Utc::now());

        let mut active: entity::tenant_program::ActiveModel = tenant_program.into();
        active.status = ActiveValue::Set(status);
        active.deactivation_date = ActiveValue::Set(deactivation_date);
        active.reactivation_date = ActiveValue::Set(reactivation_date);
        active.update(self.db).await?;

        Ok(())
    }

    pub async fn set_tenant_org_units(
        &self,
        tenant_program: entity::tenant_program::Model,
        department_id: Option<Uuid>,
        service_area_id: Option<Uuid>,
    ) -> Result<(), DbErr> {
        let mut active: entity::tenant_program::ActiveModel = tenant_program.into();
        active.department_id = ActiveValue::Set(department_id);
        active.service_area_id = ActiveValue::Set(service_area_id);
        active.update(self.db).await?;

        Ok(())
    }
}
