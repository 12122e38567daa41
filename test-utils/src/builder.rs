use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Tables are created in the order they are added, so tables holding foreign
/// keys must come after the tables they reference.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{Tenant, Division};
///
/// let test = TestBuilder::new()
///     .with_table(Tenant)
///     .with_table(Division)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. The table will be created when `build()` is called.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity implementing `EntityTrait` to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the tenant, user and tenant membership tables.
    pub fn with_user_tables(self) -> Self {
        self.with_table(Tenant)
            .with_table(User)
            .with_table(TenantUser)
    }

    /// Adds user tables plus roles, permissions and role memberships.
    pub fn with_role_tables(self) -> Self {
        self.with_user_tables()
            .with_table(Role)
            .with_table(Permission)
            .with_table(RolePermission)
            .with_table(UserRole)
    }

    /// Adds divisions, departments, service areas, job titles and teams.
    ///
    /// Requires `Tenant` to be added first.
    pub fn with_org_unit_tables(self) -> Self {
        self.with_table(Division)
            .with_table(Department)
            .with_table(ServiceArea)
            .with_table(JobTitle)
            .with_table(Team)
    }

    /// Adds accounts and everything hanging off an account.
    ///
    /// Requires `Tenant` to be added first.
    pub fn with_account_tables(self) -> Self {
        self.with_table(Account)
            .with_table(Contact)
            .with_table(AccountContact)
            .with_table(LinkedContact)
            .with_table(LegalEntity)
            .with_table(StateId)
            .with_table(Location)
            .with_table(EntityLocation)
            .with_table(Document)
    }

    /// Adds every table in the schema in dependency order.
    ///
    /// Service-level tests touch several verticals plus the activity log, so most of them
    /// start from the full schema.
    pub fn with_all_tables(self) -> Self {
        self.with_role_tables()
            .with_org_unit_tables()
            .with_table(Program)
            .with_table(TenantProgram)
            .with_account_tables()
            .with_table(ActivityLog)
            .with_table(TableFilter)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)` - Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}
