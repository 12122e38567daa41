//! TaxBeacon backend: Axum handlers over SeaORM repositories.
//!
//! Every tenant-owned row carries its tenant id and every repository query is scoped by
//! the tenant selected in the caller's session. System-level data (tenants, system
//! roles, programs) lives outside any tenant.
//!
//! Layers, outermost first:
//!
//! - `controller/` - routes, permission checks through `AuthGuard`, DTO conversion
//! - `service/` - business rules, uniqueness checks and activity recording
//! - `data/` - repositories mapping SeaORM entities to domain models
//! - `model/` - domain models and create/update params
//! - `error/` - `AppError` and its HTTP mapping
//! - `middleware/` - session wrappers and the permission guard
//!
//! Shared pieces: `config` and `startup` build the `state`, `router` assembles the
//! OpenAPI router, `activity/` renders audit events, `export` writes CSV/XLSX files,
//! `storage` keeps uploaded documents on disk and `util/` parses grid queries and
//! applies masks.

pub mod activity;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod export;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod storage;
pub mod util;
