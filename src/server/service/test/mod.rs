//! Service tests run against the full in-memory schema so that activity log rows and
//! cross-vertical checks are exercised together.

use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, context::TestContext, factory};

use crate::server::{activity::Executor, error::AppError};

mod account;
mod contact;
mod department;
mod division;
mod document;
mod legal_entity;
mod location;
mod program;
mod search;
mod table_filter;
mod tenant;
mod user;

async fn setup() -> TestContext {
    TestBuilder::new().with_all_tables().build().await.unwrap()
}

/// Executor backed by a real user row.
async fn executor(db: &DatabaseConnection) -> Result<Executor, AppError> {
    let user = factory::user::UserFactory::new(db)
        .first_name("Test")
        .last_name("Executor")
        .build()
        .await?;

    Ok(Executor::new(user.id, &user.full_name, "Admin".to_string()))
}
