//! Division, department, service area, job title and team domain models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    model::org_unit::{
        DepartmentDetailsDto, DepartmentDto, DepartmentRequestDto, DepartmentUnitDto,
        DepartmentUnitRequestDto, DivisionDetailsDto, DivisionDto, DivisionRequestDto,
        OrgUnitUserDto, TeamDto, TeamRequestDto,
    },
    server::{
        export::ExportRecord,
        model::{join_names, names_of, user::User, Named},
        util::date::format_export_date,
    },
};

fn trim_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub departments: Vec<Named>,
    pub number_of_users: u64,
}

impl Division {
    pub fn from_entity(
        entity: entity::division::Model,
        departments: Vec<Named>,
        number_of_users: u64,
    ) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            created_date: entity.created_date,
            departments,
            number_of_users,
        }
    }

    pub fn into_dto(self) -> DivisionDto {
        DivisionDto {
            departments: join_names(&names_of(&self.departments)),
            id: self.id,
            name: self.name,
            description: self.description,
            created_date: self.created_date,
            number_of_users: self.number_of_users,
        }
    }

    pub fn into_details_dto(self) -> DivisionDetailsDto {
        DivisionDetailsDto {
            id: self.id,
            name: self.name,
            description: self.description,
            created_date: self.created_date,
            departments: self.departments.into_iter().map(Named::into_dto).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub division: Option<Named>,
    pub service_areas: Vec<Named>,
    pub job_titles: Vec<Named>,
    pub number_of_users: u64,
}

impl Department {
    pub fn into_dto(self) -> DepartmentDto {
        DepartmentDto {
            service_areas: join_names(&names_of(&self.service_areas)),
            division_id: self.division.as_ref().map(|d| d.id),
            division: self.division.map(|d| d.name),
            id: self.id,
            name: self.name,
            description: self.description,
            created_date: self.created_date,
            number_of_users: self.number_of_users,
        }
    }

    pub fn into_details_dto(self) -> DepartmentDetailsDto {
        DepartmentDetailsDto {
            id: self.id,
            name: self.name,
            description: self.description,
            created_date: self.created_date,
            division: self.division.map(Named::into_dto),
            service_areas: self.service_areas.into_iter().map(Named::into_dto).collect(),
            job_titles: self.job_titles.into_iter().map(Named::into_dto).collect(),
        }
    }
}

/// Service area or job title.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentUnit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub department: Option<Named>,
    pub number_of_users: u64,
}

impl DepartmentUnit {
    pub fn into_dto(self) -> DepartmentUnitDto {
        DepartmentUnitDto {
            department_id: self.department.as_ref().map(|d| d.id),
            department: self.department.map(|d| d.name),
            id: self.id,
            name: self.name,
            description: self.description,
            created_date: self.created_date,
            number_of_users: self.number_of_users,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub number_of_users: u64,
}

impl Team {
    pub fn from_entity(entity: entity::team::Model, number_of_users: u64) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            created_date: entity.created_date,
            number_of_users,
        }
    }

    pub fn into_dto(self) -> TeamDto {
        TeamDto {
            id: self.id,
            name: self.name,
            description: self.description,
            created_date: self.created_date,
            number_of_users: self.number_of_users,
        }
    }
}

pub fn org_unit_user_dto(user: User) -> OrgUnitUserDto {
    OrgUnitUserDto {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        department: user.department,
        service_area: user.service_area,
        job_title: user.job_title,
        team: user.team,
    }
}

#[derive(Debug, Clone)]
pub struct DivisionParams {
    pub name: String,
    pub description: Option<String>,
    pub department_ids: Vec<Uuid>,
}

impl DivisionParams {
    pub fn from_dto(dto: DivisionRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: trim_description(dto.description),
            department_ids: dto.department_ids,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepartmentParams {
    pub name: String,
    pub description: Option<String>,
    pub division_id: Option<Uuid>,
    pub service_area_ids: Vec<Uuid>,
    pub job_title_ids: Vec<Uuid>,
}

impl DepartmentParams {
    pub fn from_dto(dto: DepartmentRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: trim_description(dto.description),
            division_id: dto.division_id,
            service_area_ids: dto.service_area_ids,
            job_title_ids: dto.job_title_ids,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepartmentUnitParams {
    pub name: String,
    pub description: Option<String>,
    pub department_id: Option<Uuid>,
}

impl DepartmentUnitParams {
    pub fn from_dto(dto: DepartmentUnitRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: trim_description(dto.description),
            department_id: dto.department_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamParams {
    pub name: String,
    pub description: Option<String>,
}

impl TeamParams {
    pub fn from_dto(dto: TeamRequestDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: trim_description(dto.description),
        }
    }
}

pub struct DivisionExportRow(pub Division);

impl ExportRecord for DivisionExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Division Name",
        "Division Description",
        "Departments",
        "Number of Users",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let d = &self.0;
        vec![
            d.name.clone(),
            d.description.clone().unwrap_or_default(),
            join_names(&names_of(&d.departments)),
            d.number_of_users.to_string(),
            format_export_date(d.created_date),
        ]
    }
}

pub struct DepartmentExportRow(pub Department);

impl ExportRecord for DepartmentExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Department Name",
        "Department Description",
        "Division",
        "Service Areas",
        "Job Titles",
        "Number of Users",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let d = &self.0;
        vec![
            d.name.clone(),
            d.description.clone().unwrap_or_default(),
            d.division.as_ref().map(|n| n.name.clone()).unwrap_or_default(),
            join_names(&names_of(&d.service_areas)),
            join_names(&names_of(&d.job_titles)),
            d.number_of_users.to_string(),
            format_export_date(d.created_date),
        ]
    }
}

pub struct DepartmentUnitExportRow(pub DepartmentUnit);

impl ExportRecord for DepartmentUnitExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Name",
        "Description",
        "Department",
        "Number of Users",
        "Creation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let u = &self.0;
        vec![
            u.name.clone(),
            u.description.clone().unwrap_or_default(),
            u.department.as_ref().map(|n| n.name.clone()).unwrap_or_default(),
            u.number_of_users.to_string(),
            format_export_date(u.created_date),
        ]
    }
}

pub struct TeamExportRow(pub Team);

impl ExportRecord for TeamExportRow {
    const HEADERS: &'static [&'static str] =
        &["Team Name", "Team Description", "Number of Users", "Creation Date"];

    fn fields(&self) -> Vec<String> {
        let t = &self.0;
        vec![
            t.name.clone(),
            t.description.clone().unwrap_or_default(),
            t.number_of_users.to_string(),
            format_export_date(t.created_date),
        ]
    }
}
