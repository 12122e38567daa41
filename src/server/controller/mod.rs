//! HTTP request handlers.
//!
//! Each module exposes a `routes()` function returning an `OpenApiRouter` with its
//! handlers and their `utoipa::path` documentation. Handlers check access with
//! `AuthGuard`, validate request DTOs, call one service and convert the result back
//! into DTOs.

pub mod account;
pub mod auth;
pub mod contact;
pub mod department;
pub mod division;
pub mod document;
pub mod job_title;
pub mod legal_entity;
pub mod location;
pub mod program;
pub mod role;
pub mod search;
pub mod service_area;
pub mod table_filter;
pub mod team;
pub mod tenant;
pub mod user;
