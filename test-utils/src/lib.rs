//! TaxBeacon Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the TaxBeacon
//! service. This crate offers a builder pattern for creating test contexts with in-memory
//! SQLite databases, customizable table schemas, and factories for tenant-scoped test data.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection and session
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Builders that insert entities with sensible defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn test_user_operations() -> Result<(), sea_orm::DbErr> {
//!     let test = TestBuilder::new()
//!         .with_user_tables()
//!         .build()
//!         .await
//!         .unwrap();
//!     let db = test.db.as_ref().unwrap();
//!
//!     let tenant = factory::create_tenant(db).await?;
//!     let user = factory::user::UserFactory::new(db).tenant(tenant.id).build().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
