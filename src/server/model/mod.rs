//! Server-side domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary and
//! transformed to DTOs at the controller boundary. Operation parameters are built from
//! request DTOs in the controllers, with the tenant and executor resolved by `AuthGuard`.

pub mod account;
pub mod contact;
pub mod document;
pub mod filter;
pub mod legal_entity;
pub mod location;
pub mod org_unit;
pub mod program;
pub mod role;
pub mod search;
pub mod tenant;
pub mod user;

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Status;
use serde::Serialize;
use uuid::Uuid;

use crate::model::api::{NamedDto, PageDto, StatusDto};

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub count: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    pub fn into_dto<D>(self, f: impl FnMut(T) -> D) -> PageDto<D> {
        PageDto {
            count: self.count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl From<StatusDto> for Status {
    fn from(status: StatusDto) -> Self {
        match status {
            StatusDto::Active => Status::Active,
            StatusDto::Deactivated => Status::Deactivated,
        }
    }
}

pub fn status_dto(status: Status) -> StatusDto {
    match status {
        Status::Active => StatusDto::Active,
        Status::Deactivated => StatusDto::Deactivated,
    }
}

/// `(deactivation_date, reactivation_date)` after switching to `status` at `now`.
pub fn status_dates(
    status: Status,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match status {
        Status::Deactivated => (Some(now), None),
        Status::Active => (None, Some(now)),
    }
}

/// Joins names for list columns such as a division's departments.
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Active => "Active",
        Status::Deactivated => "Deactivated",
    }
}

/// Id and display name of a related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Named {
    pub id: Uuid,
    pub name: String,
}

impl Named {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn into_dto(self) -> NamedDto {
        NamedDto {
            id: self.id,
            name: self.name,
        }
    }
}

pub fn names_of(items: &[Named]) -> Vec<&str> {
    items.iter().map(|n| n.name.as_str()).collect()
}
