//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation. Every factory
//! takes the ids of the rows it depends on explicitly; nothing is created implicitly
//! except the tenant membership row added by `UserFactory::tenant`.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let tenant = factory::create_tenant(db).await?;
//! let account = factory::create_account(db, tenant.id).await?;
//! let entity = factory::legal_entity::LegalEntityFactory::new(db, tenant.id, account.id)
//!     .fein("123456789")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `tenant` - Tenants
//! - `user` - Users and tenant membership
//! - `role` - Roles, permissions and role assignments
//! - `org_unit` - Divisions, departments, service areas, job titles and teams
//! - `program` - Programs and tenant program assignments
//! - `account` - Accounts
//! - `contact` - Contacts and account links
//! - `legal_entity` - Legal entities and state ids
//! - `location` - Locations
//! - `helpers` - Shared id counter

pub mod account;
pub mod contact;
pub mod helpers;
pub mod legal_entity;
pub mod location;
pub mod org_unit;
pub mod program;
pub mod role;
pub mod tenant;
pub mod user;

pub use account::create_account;
pub use contact::{create_contact, link_contact};
pub use legal_entity::{create_legal_entity, create_state_id};
pub use location::create_location;
pub use org_unit::{
    create_department, create_division, create_job_title, create_service_area, create_team,
};
pub use program::{assign_program, create_program};
pub use role::{assign_role, create_permission, create_role};
pub use tenant::create_tenant;
pub use user::create_user;
