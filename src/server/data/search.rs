//! Text search over the searchable tables of a tenant with SQL `LIKE`.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use uuid::Uuid;

use crate::server::{
    data::user::in_tenant,
    model::search::{SearchEntityType, SearchResult},
    util::grid::contains_literal,
};

pub struct SearchRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SearchRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// All rows of `entity_type` in the tenant whose searchable columns contain `text`.
    ///
    /// `%` and `_` in `text` match literally.
    pub async fn search(
        &self,
        tenant_id: Uuid,
        entity_type: SearchEntityType,
        text: &str,
    ) -> Result<Vec<SearchResult>, DbErr> {
        let rows: Vec<(Uuid, String, Option<String>)> = match entity_type {
            SearchEntityType::User => {
                use entity::user::Column;
                entity::prelude::User::find()
                    .select_only()
                    .column(Column::Id)
                    .column(Column::FullName)
                    .column(Column::Email)
                    .filter(in_tenant(tenant_id))
                    .filter(
                        Condition::any()
                            .add(Column::FullName.like(contains_literal(text)))
                            .add(Column::Email.like(contains_literal(text))),
                    )
                    .into_tuple()
                    .all(self.db)
                    .await?
            }
            SearchEntityType::Account => {
                use entity::account::Column;
                entity::prelude::Account::find()
                    .select_only()
                    .column(Column::Id)
                    .column(Column::Name)
                    .column(Column::AccountId)
                    .filter(Column::TenantId.eq(tenant_id))
                    .filter(
                        Condition::any()
                            .add(Column::Name.like(contains_literal(text)))
                            .add(Column::AccountId.like(contains_literal(text)))
                            .add(Column::DoingBusinessAs.like(contains_literal(text))),
                    )
                    .into_tuple()
                    .all(self.db)
                    .await?
            }
            SearchEntityType::Contact => {
                use entity::contact::Column;
                entity::prelude::Contact::find()
                    .select_only()
                    .column(Column::Id)
                    .column(Column::FullName)
                    .column(Column::Email)
                    .filter(Column::TenantId.eq(tenant_id))
                    .filter(
                        Condition::any()
                            .add(Column::FullName.like(contains_literal(text)))
                            .add(Column::Email.like(contains_literal(text))),
                    )
                    .into_tuple()
                    .all(self.db)
                    .await?
            }
            SearchEntityType::Entity => {
                use entity::legal_entity::Column;
                entity::prelude::LegalEntity::find()
                    .select_only()
                    .column(Column::Id)
                    .column(Column::Name)
                    .column(Column::EntityId)
                    .filter(Column::TenantId.eq(tenant_id))
                    .filter(
                        Condition::any()
                            .add(Column::Name.like(contains_literal(text)))
                            .add(Column::EntityId.like(contains_literal(text)))
                            .add(Column::Fein.like(contains_literal(text))),
                    )
                    .into_tuple()
                    .all(self.db)
                    .await?
            }
            SearchEntityType::Location => {
                use entity::location::Column;
                entity::prelude::Location::find()
                    .select_only()
                    .column(Column::Id)
                    .column(Column::Name)
                    .column(Column::LocationId)
                    .filter(Column::TenantId.eq(tenant_id))
                    .filter(
                        Condition::any()
                            .add(Column::Name.like(contains_literal(text)))
                            .add(Column::LocationId.like(contains_literal(text))),
                    )
                    .into_tuple()
                    .all(self.db)
                    .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(id, display_name, description)| SearchResult {
                id,
                entity_type,
                display_name,
                description,
            })
            .collect())
    }
}
