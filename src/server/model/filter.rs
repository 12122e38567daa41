//! Saved table filters, private to a user within a tenant.

use entity::sea_orm_active_enums::TableType;
use uuid::Uuid;

use crate::model::filter::{CreateTableFilterDto, TableFilterDto, TableTypeDto};

#[derive(Debug, Clone, PartialEq)]
pub struct TableFilter {
    pub id: Uuid,
    pub name: String,
    pub table_type: TableType,
    pub configuration: String,
}

impl TableFilter {
    pub fn from_entity(entity: entity::table_filter::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            table_type: entity.table_type,
            configuration: entity.configuration,
        }
    }

    pub fn into_dto(self) -> TableFilterDto {
        TableFilterDto {
            id: self.id,
            name: self.name,
            table_type: table_type_dto(self.table_type),
            configuration: self.configuration,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTableFilterParams {
    pub name: String,
    pub table_type: TableType,
    pub configuration: String,
}

impl CreateTableFilterParams {
    pub fn from_dto(dto: CreateTableFilterDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            table_type: dto.table_type.into(),
            configuration: dto.configuration,
        }
    }
}

impl From<TableTypeDto> for TableType {
    fn from(dto: TableTypeDto) -> Self {
        match dto {
            TableTypeDto::Users => TableType::Users,
            TableTypeDto::Roles => TableType::Roles,
            TableTypeDto::Tenants => TableType::Tenants,
            TableTypeDto::Divisions => TableType::Divisions,
            TableTypeDto::Departments => TableType::Departments,
            TableTypeDto::ServiceAreas => TableType::ServiceAreas,
            TableTypeDto::JobTitles => TableType::JobTitles,
            TableTypeDto::Teams => TableType::Teams,
            TableTypeDto::Programs => TableType::Programs,
            TableTypeDto::Accounts => TableType::Accounts,
            TableTypeDto::Contacts => TableType::Contacts,
            TableTypeDto::Entities => TableType::Entities,
            TableTypeDto::Locations => TableType::Locations,
            TableTypeDto::Documents => TableType::Documents,
        }
    }
}

fn table_type_dto(table_type: TableType) -> TableTypeDto {
    match table_type {
        TableType::Users => TableTypeDto::Users,
        TableType::Roles => TableTypeDto::Roles,
        TableType::Tenants => TableTypeDto::Tenants,
        TableType::Divisions => TableTypeDto::Divisions,
        TableType::Departments => TableTypeDto::Departments,
        TableType::ServiceAreas => TableTypeDto::ServiceAreas,
        TableType::JobTitles => TableTypeDto::JobTitles,
        TableType::Teams => TableTypeDto::Teams,
        TableType::Programs => TableTypeDto::Programs,
        TableType::Accounts => TableTypeDto::Accounts,
        TableType::Contacts => TableTypeDto::Contacts,
        TableType::Entities => TableTypeDto::Entities,
        TableType::Locations => TableTypeDto::Locations,
        TableType::Documents => TableTypeDto::Documents,
    }
}
