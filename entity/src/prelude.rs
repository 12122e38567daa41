pub use super::account::Entity as Account;
pub use super::account_contact::Entity as AccountContact;
pub use super::activity_log::Entity as ActivityLog;
pub use super::contact::Entity as Contact;
pub use super::department::Entity as Department;
pub use super::division::Entity as Division;
pub use super::document::Entity as Document;
pub use super::entity_location::Entity as EntityLocation;
pub use super::job_title::Entity as JobTitle;
pub use super::legal_entity::Entity as LegalEntity;
pub use super::linked_contact::Entity as LinkedContact;
pub use super::location::Entity as Location;
pub use super::permission::Entity as Permission;
pub use super::program::Entity as Program;
pub use super::role::Entity as Role;
pub use super::role_permission::Entity as RolePermission;
pub use super::service_area::Entity as ServiceArea;
pub use super::state_id::Entity as StateId;
pub use super::table_filter::Entity as TableFilter;
pub use super::team::Entity as Team;
pub use super::tenant::Entity as Tenant;
pub use super::tenant_program::Entity as TenantProgram;
pub use super::tenant_user::Entity as TenantUser;
pub use super::user::Entity as User;
pub use super::user_role::Entity as UserRole;
