//! Event payload types.
//!
//! Payloads are grouped by shape rather than by event. `Activity` fixes which shape
//! each event type stores.

use serde::{Deserialize, Serialize};

use crate::server::activity::{EventPayload, Executor};

/// Event with nothing besides its executor (created, deactivated, reactivated, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorEvent {
    #[serde(flatten)]
    pub executor: Executor,
}

/// Details update with JSON snapshots taken before and after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedEvent {
    #[serde(flatten)]
    pub executor: Executor,
    pub previous_values: String,
    pub current_values: String,
}

/// Event naming one or more related records, e.g. assigned roles or associated locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamesEvent {
    #[serde(flatten)]
    pub executor: Executor,
    /// Comma-joined names.
    pub names: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionsStatusEvent {
    #[serde(flatten)]
    pub executor: Executor,
    pub division_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramOrgUnitEvent {
    #[serde(flatten)]
    pub executor: Executor,
    pub department: String,
    pub service_area: String,
}

impl ExecutorEvent {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl UpdatedEvent {
    /// Serializes both snapshots.
    pub fn new<T: Serialize>(
        executor: Executor,
        previous: &T,
        current: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            executor,
            previous_values: serde_json::to_string(previous)?,
            current_values: serde_json::to_string(current)?,
        })
    }
}

impl NamesEvent {
    pub fn new<S: AsRef<str>>(executor: Executor, names: &[S]) -> Self {
        Self {
            executor,
            names: names
                .iter()
                .map(|n| n.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl EventPayload for ExecutorEvent {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}

impl EventPayload for UpdatedEvent {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}

impl EventPayload for NamesEvent {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}

impl EventPayload for DivisionsStatusEvent {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}

impl EventPayload for ProgramOrgUnitEvent {
    fn executor(&self) -> &Executor {
        &self.executor
    }
}
