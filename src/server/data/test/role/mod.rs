use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

use crate::server::data::role::RoleRepository;

mod add_users;
mod get_user_roles;
mod sync_permissions;
