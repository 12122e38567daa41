//! Recording and reading the activity log.

use entity::sea_orm_active_enums::{AccountPart, SubjectType};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::server::{
    activity::{self, Activity, ActivityEvent, ActivityItem, Subject},
    data::activity_log::ActivityLogRepository,
    error::AppError,
    model::Page,
    util::grid::PageRequest,
};

/// Works on a plain connection or on the transaction of the operation being recorded.
pub struct ActivityService<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ActivityService<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Serializes and stores an activity at the current revision.
    pub async fn record(&self, subject: Subject, activity: Activity) -> Result<(), AppError> {
        let payload = activity.payload()?;

        ActivityLogRepository::new(self.db)
            .insert(
                &subject,
                activity.executor().date,
                activity.event_type().as_ref(),
                Activity::REVISION,
                payload,
            )
            .await?;

        Ok(())
    }

    /// Rendered history of a subject, newest first.
    ///
    /// The caller checks that the subject exists and is visible before calling.
    ///
    /// # Returns
    /// - `Ok(Page<ActivityItem>)` - Requested page of rendered events
    /// - `Err(AppError::Grid(_))` - Page offset out of range
    pub async fn history(
        &self,
        subject_type: SubjectType,
        subject_id: Uuid,
        parts: &[AccountPart],
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        let request = PageRequest::new(page, page_size)?;

        let rows = ActivityLogRepository::new(self.db)
            .get_page(subject_type, subject_id, parts, &request)
            .await?;

        let items = rows
            .items
            .iter()
            .map(|row| activity::render(&row.event_type, row.revision, &row.event))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            count: rows.count,
            items,
        })
    }
}
