//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Uniqueness checks, status transitions and tenant scoping
//! - **Orchestration**: Coordinating repository calls, file storage and email delivery
//! - **Activity Log**: Recording an event for every state change they perform
//! - **Exports**: Building CSV and XLSX files from domain models

pub mod account;
pub mod activity;
pub mod auth;
pub mod contact;
pub mod department;
pub mod division;
pub mod document;
pub mod email;
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

#[cfg(test)]
mod test;
