//! Request and response DTOs exposed by the HTTP API.
//!
//! Every type here derives `Serialize`/`Deserialize` with camelCase field names and
//! `utoipa::ToSchema` so it appears in the OpenAPI document. Request bodies derive
//! `validator::Validate`; controllers call `validate()` before handing them to services.

pub mod account;
pub mod api;
pub mod auth;
pub mod contact;
pub mod document;
pub mod entity;
pub mod filter;
pub mod location;
pub mod org_unit;
pub mod program;
pub mod role;
pub mod search;
pub mod tenant;
pub mod user;
