//! User domain models and parameters.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Status;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    model::user::{CreateUserDto, UpdateUserDto, UserDto},
    server::{
        export::ExportRecord,
        model::{status_dto, status_label},
        util::date::{format_export_date, format_optional_export_date},
    },
};

/// User with the names of their org units and roles resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub full_name: String,
    pub email: String,
    pub status: Status,
    pub created_date: DateTime<Utc>,
    pub last_login_date: Option<DateTime<Utc>>,
    pub deactivation_date: Option<DateTime<Utc>>,
    pub reactivation_date: Option<DateTime<Utc>>,
    pub division_id: Option<Uuid>,
    pub division: Option<String>,
    pub department_id: Option<Uuid>,
    pub department: Option<String>,
    pub service_area_id: Option<Uuid>,
    pub service_area: Option<String>,
    pub job_title_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub team_id: Option<Uuid>,
    pub team: Option<String>,
    pub roles: Vec<String>,
}

impl User {
    /// Converts an entity model. Org unit names and roles start empty and are filled
    /// in by `UserRepository::with_details`.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            legal_name: entity.legal_name,
            full_name: entity.full_name,
            email: entity.email,
            status: entity.status,
            created_date: entity.created_date,
            last_login_date: entity.last_login_date,
            deactivation_date: entity.deactivation_date,
            reactivation_date: entity.reactivation_date,
            division_id: entity.division_id,
            division: None,
            department_id: entity.department_id,
            department: None,
            service_area_id: entity.service_area_id,
            service_area: None,
            job_title_id: entity.job_title_id,
            job_title: None,
            team_id: entity.team_id,
            team: None,
            roles: Vec::new(),
        }
    }

    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            legal_name: self.legal_name,
            full_name: self.full_name,
            email: self.email,
            status: status_dto(self.status),
            created_date: self.created_date,
            last_login_date: self.last_login_date,
            deactivation_date: self.deactivation_date,
            reactivation_date: self.reactivation_date,
            division_id: self.division_id,
            division: self.division,
            department_id: self.department_id,
            department: self.department,
            service_area_id: self.service_area_id,
            service_area: self.service_area,
            job_title_id: self.job_title_id,
            job_title: self.job_title,
            team_id: self.team_id,
            team: self.team,
            roles: self.roles,
        }
    }
}

/// Values captured in `UserUpdated` previous/current snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub division: Option<String>,
    pub department: Option<String>,
    pub service_area: Option<String>,
    pub job_title: Option<String>,
    pub team: Option<String>,
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            legal_name: user.legal_name.clone(),
            division: user.division.clone(),
            department: user.department.clone(),
            service_area: user.service_area.clone(),
            job_title: user.job_title.clone(),
            team: user.team.clone(),
        }
    }
}

/// Org unit assignment shared by user create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserOrgUnits {
    pub division_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub service_area_id: Option<Uuid>,
    pub job_title_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    /// Tenant the user joins. `None` creates a user without tenant membership.
    pub tenant_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub email: String,
    pub division_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub service_area_id: Option<Uuid>,
    pub job_title_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

impl CreateUserParams {
    pub fn from_dto(tenant_id: Option<Uuid>, dto: CreateUserDto) -> Self {
        Self {
            tenant_id,
            first_name: dto.first_name.trim().to_string(),
            last_name: dto.last_name.trim().to_string(),
            legal_name: dto.legal_name.trim().to_string(),
            email: dto.email.trim().to_lowercase(),
            division_id: dto.division_id,
            department_id: dto.department_id,
            service_area_id: dto.service_area_id,
            job_title_id: dto.job_title_id,
            team_id: dto.team_id,
        }
    }

    pub fn org_units(&self) -> UserOrgUnits {
        UserOrgUnits {
            division_id: self.division_id,
            department_id: self.department_id,
            service_area_id: self.service_area_id,
            job_title_id: self.job_title_id,
            team_id: self.team_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateUserParams {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub org_units: UserOrgUnits,
}

impl UpdateUserParams {
    pub fn from_dto(id: Uuid, dto: UpdateUserDto) -> Self {
        Self {
            id,
            first_name: dto.first_name.trim().to_string(),
            last_name: dto.last_name.trim().to_string(),
            legal_name: dto.legal_name.trim().to_string(),
            org_units: UserOrgUnits {
                division_id: dto.division_id,
                department_id: dto.department_id,
                service_area_id: dto.service_area_id,
                job_title_id: dto.job_title_id,
                team_id: dto.team_id,
            },
        }
    }
}

/// Row of the users export.
pub struct UserExportRow(pub User);

impl ExportRecord for UserExportRow {
    const HEADERS: &'static [&'static str] = &[
        "Email",
        "First Name",
        "Last Name",
        "Legal Name",
        "Division",
        "Department",
        "Service Area",
        "Job Title",
        "Team",
        "Roles",
        "Status",
        "Creation Date",
        "Last Login Date",
        "Deactivation Date",
        "Reactivation Date",
    ];

    fn fields(&self) -> Vec<String> {
        let u = &self.0;
        vec![
            u.email.clone(),
            u.first_name.clone(),
            u.last_name.clone(),
            u.legal_name.clone(),
            u.division.clone().unwrap_or_default(),
            u.department.clone().unwrap_or_default(),
            u.service_area.clone().unwrap_or_default(),
            u.job_title.clone().unwrap_or_default(),
            u.team.clone().unwrap_or_default(),
            u.roles.join(", "),
            status_label(u.status).to_string(),
            format_export_date(u.created_date),
            format_optional_export_date(u.last_login_date),
            format_optional_export_date(u.deactivation_date),
            format_optional_export_date(u.reactivation_date),
        ]
    }
}
