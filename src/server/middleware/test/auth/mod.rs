use entity::sea_orm_active_enums::Status;
use test_utils::{builder::TestBuilder, factory};

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::{
        auth::{AuthGuard, Permission, SUPER_ADMIN_ROLE},
        session::AuthSession,
    },
};

mod require;
mod require_tenant;
