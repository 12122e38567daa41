use chrono::{DateTime, Utc};
use entity::{
    activity_log::Column,
    sea_orm_active_enums::{AccountPart, SubjectType},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{activity::Subject, model::Page, util::grid::PageRequest};

pub struct ActivityLogRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ActivityLogRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores a serialized event for its subject.
    pub async fn insert(
        &self,
        subject: &Subject,
        date: DateTime<Utc>,
        event_type: &str,
        revision: i32,
        event: String,
    ) -> Result<entity::activity_log::Model, DbErr> {
        entity::activity_log::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(subject.tenant_id),
            subject_type: ActiveValue::Set(subject.subject_type),
            subject_id: ActiveValue::Set(subject.id),
            account_part: ActiveValue::Set(subject.account_part),
            date: ActiveValue::Set(date),
            event_type: ActiveValue::Set(event_type.to_string()),
            revision: ActiveValue::Set(revision),
            event: ActiveValue::Set(event),
        }
        .insert(self.db)
        .await
    }

    /// Events of a subject, newest first.
    ///
    /// `parts` restricts account history to the given account parts; an empty slice
    /// returns every part.
    pub async fn get_page(
        &self,
        subject_type: SubjectType,
        subject_id: Uuid,
        parts: &[AccountPart],
        request: &PageRequest,
    ) -> Result<Page<entity::activity_log::Model>, DbErr> {
        let mut query = entity::prelude::ActivityLog::find()
            .filter(Column::SubjectType.eq(subject_type))
            .filter(Column::SubjectId.eq(subject_id));

        if !parts.is_empty() {
            query = query.filter(Column::AccountPart.is_in(parts.to_vec()));
        }

        let paginator = query
            .order_by_desc(Column::Date)
            .paginate(self.db, request.page_size());
        let count = paginator.num_items().await?;
        let items = paginator.fetch_page(request.page_index()).await?;

        Ok(Page { count, items })
    }
}
