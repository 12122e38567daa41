use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::server::{
    data::search::SearchRepository,
    error::AppError,
    middleware::auth::{CurrentUser, Permission},
    model::{
        search::{SearchEntityType, SearchResult},
        Page,
    },
    util::grid::PageRequest,
};

/// Searchable types and the permissions that make each one readable.
const SEARCHABLE: &[(SearchEntityType, &[Permission])] = &[
    (
        SearchEntityType::User,
        &[Permission::UsersRead, Permission::UsersReadWrite, Permission::UsersReadExport],
    ),
    (
        SearchEntityType::Account,
        &[Permission::AccountsRead, Permission::AccountsReadWrite, Permission::AccountsReadExport],
    ),
    (
        SearchEntityType::Contact,
        &[Permission::ContactsRead, Permission::ContactsReadWrite, Permission::ContactsReadExport],
    ),
    (
        SearchEntityType::Entity,
        &[Permission::EntitiesRead, Permission::EntitiesReadWrite, Permission::EntitiesReadExport],
    ),
    (
        SearchEntityType::Location,
        &[
            Permission::LocationsRead,
            Permission::LocationsReadWrite,
            Permission::LocationsReadExport,
        ],
    ),
];

pub fn readable_types(current: &CurrentUser) -> Vec<SearchEntityType> {
    SEARCHABLE
        .iter()
        .filter(|(_, permissions)| permissions.iter().any(|p| current.has(*p)))
        .map(|(entity_type, _)| *entity_type)
        .collect()
}

pub struct SearchService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SearchService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Case-insensitive contains search across the types in `types`, ordered by
    /// display name.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Blank search text
    pub async fn search(
        &self,
        tenant_id: Uuid,
        types: &[SearchEntityType],
        text: &str,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<SearchResult>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Search text is required".to_string()));
        }
        let request = PageRequest::new(page, page_size)?;

        let repo = SearchRepository::new(self.db);
        let mut results = Vec::new();
        for entity_type in types {
            results.extend(repo.search(tenant_id, *entity_type, text).await?);
        }
        results.sort_by_cached_key(|r| r.display_name.to_lowercase());

        let count = results.len() as u64;
        let items = results
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(request.page_size()).unwrap_or(usize::MAX))
            .collect();

        Ok(Page { count, items })
    }
}
