use uuid::Uuid;

use crate::model::search::{SearchEntityTypeDto, SearchResultDto};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEntityType {
    User,
    Account,
    Contact,
    Entity,
    Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub id: Uuid,
    pub entity_type: SearchEntityType,
    pub display_name: String,
    pub description: Option<String>,
}

impl SearchResult {
    pub fn into_dto(self) -> SearchResultDto {
        SearchResultDto {
            id: self.id,
            entity_type: match self.entity_type {
                SearchEntityType::User => SearchEntityTypeDto::User,
                SearchEntityType::Account => SearchEntityTypeDto::Account,
                SearchEntityType::Contact => SearchEntityTypeDto::Contact,
                SearchEntityType::Entity => SearchEntityTypeDto::Entity,
                SearchEntityType::Location => SearchEntityTypeDto::Location,
            },
            display_name: self.display_name,
            description: self.description,
        }
    }
}
