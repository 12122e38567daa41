//! Permission-based access control.
//!
//! `AuthGuard` resolves the signed-in user from the session, loads the roles that
//! apply in the selected tenant and checks the requested permissions. Handlers get a
//! `CurrentUser` back and use it for tenant scoping and activity attribution.

use std::collections::BTreeSet;

use sea_orm::DatabaseConnection;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tower_sessions::Session;
use uuid::Uuid;

use entity::sea_orm_active_enums::Status;

use crate::{
    model::auth::LoginUserDto,
    server::{
        activity::Executor,
        data::{role::RoleRepository, tenant::TenantRepository, user::UserRepository},
        error::{auth::AuthError, AppError},
        middleware::session::AuthSession,
    },
};

/// Name of the system role that holds every permission.
pub const SUPER_ADMIN_ROLE: &str = "Super admin";

/// Permission catalogue. The string form is what gets stored in the `permission` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, EnumString, IntoStaticStr)]
pub enum Permission {
    #[strum(serialize = "Users.Read")]
    UsersRead,
    #[strum(serialize = "Users.ReadWrite")]
    UsersReadWrite,
    #[strum(serialize = "Users.ReadExport")]
    UsersReadExport,
    #[strum(serialize = "Roles.Read")]
    RolesRead,
    #[strum(serialize = "Roles.ReadWrite")]
    RolesReadWrite,
    #[strum(serialize = "Tenants.Read")]
    TenantsRead,
    #[strum(serialize = "Tenants.ReadWrite")]
    TenantsReadWrite,
    #[strum(serialize = "Tenants.ReadExport")]
    TenantsReadExport,
    #[strum(serialize = "Divisions.Read")]
    DivisionsRead,
    #[strum(serialize = "Divisions.ReadWrite")]
    DivisionsReadWrite,
    #[strum(serialize = "Divisions.ReadExport")]
    DivisionsReadExport,
    #[strum(serialize = "Departments.Read")]
    DepartmentsRead,
    #[strum(serialize = "Departments.ReadWrite")]
    DepartmentsReadWrite,
    #[strum(serialize = "Departments.ReadExport")]
    DepartmentsReadExport,
    #[strum(serialize = "ServiceAreas.Read")]
    ServiceAreasRead,
    #[strum(serialize = "ServiceAreas.ReadWrite")]
    ServiceAreasReadWrite,
    #[strum(serialize = "ServiceAreas.ReadExport")]
    ServiceAreasReadExport,
    #[strum(serialize = "JobTitles.Read")]
    JobTitlesRead,
    #[strum(serialize = "JobTitles.ReadWrite")]
    JobTitlesReadWrite,
    #[strum(serialize = "JobTitles.ReadExport")]
    JobTitlesReadExport,
    #[strum(serialize = "Teams.Read")]
    TeamsRead,
    #[strum(serialize = "Teams.ReadWrite")]
    TeamsReadWrite,
    #[strum(serialize = "Teams.ReadExport")]
    TeamsReadExport,
    #[strum(serialize = "Programs.Read")]
    ProgramsRead,
    #[strum(serialize = "Programs.ReadWrite")]
    ProgramsReadWrite,
    #[strum(serialize = "Programs.ReadExport")]
    ProgramsReadExport,
    #[strum(serialize = "Programs.ReadActivation")]
    ProgramsReadActivation,
    #[strum(serialize = "Programs.ReadAssignTenantOrgUnits")]
    ProgramsReadAssignTenantOrgUnits,
    #[strum(serialize = "Accounts.Read")]
    AccountsRead,
    #[strum(serialize = "Accounts.ReadWrite")]
    AccountsReadWrite,
    #[strum(serialize = "Accounts.ReadExport")]
    AccountsReadExport,
    #[strum(serialize = "Clients.Read")]
    ClientsRead,
    #[strum(serialize = "Clients.ReadWrite")]
    ClientsReadWrite,
    #[strum(serialize = "Clients.ReadActivation")]
    ClientsReadActivation,
    #[strum(serialize = "Referrals.Read")]
    ReferralsRead,
    #[strum(serialize = "Referrals.ReadWrite")]
    ReferralsReadWrite,
    #[strum(serialize = "Referrals.ReadActivation")]
    ReferralsReadActivation,
    #[strum(serialize = "Contacts.Read")]
    ContactsRead,
    #[strum(serialize = "Contacts.ReadWrite")]
    ContactsReadWrite,
    #[strum(serialize = "Contacts.ReadExport")]
    ContactsReadExport,
    #[strum(serialize = "Contacts.Activation")]
    ContactsActivation,
    #[strum(serialize = "Entities.Read")]
    EntitiesRead,
    #[strum(serialize = "Entities.ReadWrite")]
    EntitiesReadWrite,
    #[strum(serialize = "Entities.ReadExport")]
    EntitiesReadExport,
    #[strum(serialize = "Entities.ReadActivation")]
    EntitiesReadActivation,
    #[strum(serialize = "Locations.Read")]
    LocationsRead,
    #[strum(serialize = "Locations.ReadWrite")]
    LocationsReadWrite,
    #[strum(serialize = "Locations.ReadExport")]
    LocationsReadExport,
    #[strum(serialize = "Locations.ReadActivation")]
    LocationsReadActivation,
    #[strum(serialize = "Documents.Read")]
    DocumentsRead,
    #[strum(serialize = "Documents.ReadWrite")]
    DocumentsReadWrite,
    #[strum(serialize = "Documents.ReadExport")]
    DocumentsReadExport,
    #[strum(serialize = "Filters.Read")]
    FiltersRead,
    #[strum(serialize = "Filters.ReadWrite")]
    FiltersReadWrite,
}

impl Permission {
    /// Whether the permission can be held by a tenant role. Tenant management and
    /// editing the program catalogue stay with system roles.
    pub fn is_tenant_level(self) -> bool {
        !matches!(
            self,
            Permission::TenantsReadWrite | Permission::TenantsReadExport | Permission::ProgramsReadWrite
        )
    }

    pub fn is_read(self) -> bool {
        <&'static str>::from(self).ends_with(".Read")
    }
}

/// The authenticated user of a request together with everything resolved for it.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// Names of the roles that apply in the selected tenant, system roles included.
    pub roles: Vec<String>,
    pub permissions: BTreeSet<String>,
    pub tenant_id: Option<Uuid>,
    pub is_super_admin: bool,
    pub division_enabled: bool,
}

impl CurrentUser {
    /// Loads roles, permissions and tenant flags for a user.
    ///
    /// Roles of the selected tenant and system roles both apply. Without a selected
    /// tenant only system roles apply.
    pub async fn load(
        db: &DatabaseConnection,
        user: entity::user::Model,
        tenant_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        let role_repo = RoleRepository::new(db);

        let roles = role_repo.get_user_roles(user.id, tenant_id).await?;
        let role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        let permissions = role_repo
            .get_permission_names(&role_ids)
            .await?
            .into_iter()
            .collect();

        let is_super_admin = roles
            .iter()
            .any(|r| r.tenant_id.is_none() && r.name == SUPER_ADMIN_ROLE);

        let division_enabled = match tenant_id {
            Some(tenant_id) => TenantRepository::new(db)
                .find_by_id(tenant_id)
                .await?
                .map(|t| t.division_enabled)
                .unwrap_or(false),
            None => false,
        };

        Ok(Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            roles: roles.into_iter().map(|r| r.name).collect(),
            permissions,
            tenant_id,
            is_super_admin,
            division_enabled,
        })
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(<&'static str>::from(permission))
    }

    /// Returns the selected tenant or `AuthError::TenantRequired`.
    pub fn tenant_id(&self) -> Result<Uuid, AuthError> {
        self.tenant_id.ok_or(AuthError::TenantRequired(self.id))
    }

    /// Attribution recorded with every activity event.
    pub fn executor(&self) -> Executor {
        Executor::new(self.id, &self.full_name, self.roles.join(", "))
    }

    pub fn into_dto(self) -> LoginUserDto {
        LoginUserDto {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            roles: self.roles,
            permissions: self.permissions.into_iter().collect(),
            is_super_admin: self.is_super_admin,
            division_enabled: self.division_enabled,
            tenant_id: self.tenant_id,
        }
    }
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Requires a signed-in, active user holding at least one of `permissions`.
    ///
    /// An empty slice only requires authentication.
    ///
    /// # Returns
    /// - `Ok(CurrentUser)` - Access granted
    /// - `Err(AuthError::UserNotInSession)` - Nobody is signed in
    /// - `Err(AuthError::UserNotInDatabase)` - Session refers to a deleted user
    /// - `Err(AuthError::UserDeactivated)` - User is deactivated
    /// - `Err(AuthError::AccessDenied)` - None of the permissions is held
    pub async fn require(&self, permissions: &[Permission]) -> Result<CurrentUser, AppError> {
        let auth_session = AuthSession::new(self.session);
        let user_repo = UserRepository::new(self.db);

        let Some(user_id) = auth_session.get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        let Some(user) = user_repo.find_by_id(user_id).await? else {
            return Err(AuthError::UserNotInDatabase(user_id.to_string()).into());
        };

        if user.status == Status::Deactivated {
            return Err(AuthError::UserDeactivated(user_id).into());
        }

        let tenant_id = auth_session.get_tenant_id().await?;
        let current = CurrentUser::load(self.db, user, tenant_id).await?;

        if !permissions.is_empty() && !permissions.iter().any(|p| current.has(*p)) {
            let required: Vec<&'static str> = permissions.iter().map(|p| (*p).into()).collect();
            return Err(AuthError::AccessDenied(
                user_id,
                format!("missing any of [{}]", required.join(", ")),
            )
            .into());
        }

        Ok(current)
    }

    /// Same as `require`, additionally demanding a selected tenant.
    ///
    /// # Returns
    /// - `Ok((CurrentUser, tenant_id))` - Access granted within the tenant
    /// - `Err(AuthError::TenantRequired)` - No tenant selected in the session
    pub async fn require_tenant(
        &self,
        permissions: &[Permission],
    ) -> Result<(CurrentUser, Uuid), AppError> {
        let current = self.require(permissions).await?;
        let tenant_id = current.tenant_id()?;
        Ok((current, tenant_id))
    }
}
