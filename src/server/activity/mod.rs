//! Activity (audit) log.
//!
//! State changes are recorded as JSON payloads in the single `activity_log` table,
//! keyed by subject type and subject id. Each row stores the event type and payload
//! revision. `Activity` ties each event type to its payload shape, and
//! `registry::render` turns a stored row back into an `ActivityItem` with a
//! human-readable message.

pub mod event;
pub mod registry;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use entity::sea_orm_active_enums::{AccountPart, SubjectType};

use crate::{
    model::api::{ActivityDto, ActivityItemDto},
    server::model::Page,
};

pub use registry::{decode, render, Activity, EventType, CURRENT_REVISION};

/// Who performed an action and when. Flattened into every event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Executor {
    pub executor_id: Uuid,
    pub executor_full_name: String,
    /// Comma-joined role names at the time of the action.
    pub executor_roles: String,
    pub date: DateTime<Utc>,
}

impl Executor {
    pub fn new(executor_id: Uuid, full_name: &str, roles: String) -> Self {
        Self {
            executor_id,
            executor_full_name: full_name.to_string(),
            executor_roles: roles,
            date: Utc::now(),
        }
    }
}

/// Payload shape stored for an event. Every shape carries its executor.
pub trait EventPayload: Serialize + DeserializeOwned {
    fn executor(&self) -> &Executor;
}

/// An event that can be written to the activity log.
pub trait ActivityEvent {
    /// Payload revision written for new rows.
    const REVISION: i32 = CURRENT_REVISION;

    fn event_type(&self) -> EventType;

    fn executor(&self) -> &Executor;

    /// Human-readable audit message.
    fn message(&self) -> String;

    /// JSON payload stored next to the event type.
    fn payload(&self) -> Result<String, serde_json::Error>;
}

/// Row an activity event is attached to.
#[derive(Debug, Clone, Copy)]
pub struct Subject {
    pub subject_type: SubjectType,
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub account_part: Option<AccountPart>,
}

impl Subject {
    pub fn new(subject_type: SubjectType, id: Uuid, tenant_id: Option<Uuid>) -> Self {
        Self {
            subject_type,
            id,
            tenant_id,
            account_part: None,
        }
    }

    /// Account events additionally carry the account part they belong to.
    pub fn account(id: Uuid, tenant_id: Uuid, part: AccountPart) -> Self {
        Self {
            subject_type: SubjectType::Account,
            id,
            tenant_id: Some(tenant_id),
            account_part: Some(part),
        }
    }
}

/// Rendered activity entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityItem {
    pub date: DateTime<Utc>,
    pub full_name: String,
    pub message: String,
}

impl ActivityItem {
    pub fn into_dto(self) -> ActivityItemDto {
        ActivityItemDto {
            date: self.date,
            full_name: self.full_name,
            message: self.message,
        }
    }
}

impl Page<ActivityItem> {
    pub fn into_activity_dto(self) -> ActivityDto {
        ActivityDto {
            count: self.count,
            items: self.items.into_iter().map(ActivityItem::into_dto).collect(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ActivityError {
    /// No renderer registered for the stored event type and revision.
    #[error("Unknown activity event {event_type} revision {revision}")]
    UnknownEvent { event_type: String, revision: i32 },

    /// Stored payload does not match the registered payload type.
    #[error("Failed to read {event_type} payload: {source}")]
    Payload {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}
