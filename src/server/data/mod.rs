//! Database repository layer for all domain entities.
//!
//! Repositories own every query, insert, update and delete. They return entity models or
//! domain models from `server::model` and report failures as `DbErr`; business rules
//! and `AppError` mapping live in the service layer. Tenant-scoped repositories take the
//! tenant id explicitly on every call.

pub mod account;
pub mod activity_log;
pub mod contact;
pub mod department;
pub mod division;
pub mod document;
pub mod job_title;
pub mod legal_entity;
pub mod location;
pub mod program;
pub mod role;
pub mod search;
pub mod service_area;
pub mod table_filter;
pub mod team;
pub mod tenant;
pub mod user;

#[cfg(test)]
mod test;

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Select,
};
use uuid::Uuid;

use crate::server::{model::Page, util::grid::GridQuery};

/// Fetches the page requested by `grid` together with the total row count.
///
/// `select` is expected to be `grid.apply(..)`-ed already, with the tenant scope and the
/// default ordering added by the caller.
pub(crate) async fn fetch_page<E, C, D>(
    db: &D,
    select: Select<E>,
    grid: &GridQuery<C>,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait<Column = C>,
    E::Model: Send + Sync,
    C: ColumnTrait,
    D: ConnectionTrait,
{
    let paginator = select.paginate(db, grid.page_size());
    let count = paginator.num_items().await?;
    let items = paginator.fetch_page(grid.page_index()).await?;

    Ok(Page { count, items })
}

/// Looks up `(id, name)` pairs for a set of ids.
pub(crate) async fn names_by_id<E: EntityTrait, D: ConnectionTrait>(
    db: &D,
    id_column: E::Column,
    name_column: E::Column,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, String)> = E::find()
        .select_only()
        .column(id_column)
        .column(name_column)
        .filter(id_column.is_in(ids))
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows.into_iter().collect())
}
