//! Role domain models.

use uuid::Uuid;

use crate::{
    model::role::{PermissionDto, RoleDto, RoleUserDto},
    server::model::status_dto,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub assigned_users_count: u64,
}

impl Role {
    pub fn from_entity(entity: entity::role::Model, assigned_users_count: u64) -> Self {
        Self {
            id: entity.id,
            tenant_id: entity.tenant_id,
            name: entity.name,
            assigned_users_count,
        }
    }

    pub fn into_dto(self) -> RoleDto {
        RoleDto {
            id: self.id,
            name: self.name,
            is_system: self.tenant_id.is_none(),
            assigned_users_count: self.assigned_users_count,
        }
    }
}

/// Permission name with its category, the text before the first `.`.
#[derive(Debug, Clone, PartialEq)]
pub struct RolePermission {
    pub name: String,
    pub category: String,
}

impl RolePermission {
    pub fn new(name: String) -> Self {
        let category = name
            .split_once('.')
            .map(|(category, _)| category)
            .unwrap_or(&name)
            .to_string();
        Self { name, category }
    }

    pub fn into_dto(self) -> PermissionDto {
        PermissionDto {
            name: self.name,
            category: self.category,
        }
    }
}

pub fn role_user_dto(user: entity::user::Model) -> RoleUserDto {
    RoleUserDto {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        status: status_dto(user.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_category_is_prefix() {
        assert_eq!(RolePermission::new("Users.ReadWrite".into()).category, "Users");
        assert_eq!(RolePermission::new("Standalone".into()).category, "Standalone");
    }
}
