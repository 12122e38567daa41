//! SeaORM entities for the TaxBeacon database schema.
//!
//! Each module maps one table. Shared string-backed enums live in
//! `sea_orm_active_enums`, and `prelude` re-exports every entity under its
//! table-style name for use in queries and test schemas.

pub mod prelude;

pub mod account;
pub mod account_contact;
pub mod activity_log;
pub mod contact;
pub mod department;
pub mod division;
pub mod document;
pub mod entity_location;
pub mod job_title;
pub mod legal_entity;
pub mod linked_contact;
pub mod location;
pub mod permission;
pub mod program;
pub mod role;
pub mod role_permission;
pub mod sea_orm_active_enums;
pub mod service_area;
pub mod state_id;
pub mod table_filter;
pub mod team;
pub mod tenant;
pub mod tenant_program;
pub mod tenant_user;
pub mod user;
pub mod user_role;
