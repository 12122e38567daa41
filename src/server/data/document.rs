use chrono::Utc;
use entity::document::Column;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id},
    model::{
        document::{Document, UploadParams},
        Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const DOCUMENT_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("contentType", Column::ContentType, FieldKind::Text),
    GridField::new("size", Column::Size, FieldKind::Number),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct DocumentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DocumentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Document>, DbErr> {
        let Some(entity) = entity::prelude::Document::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.load(vec![entity]).await?.pop())
    }

    pub async fn get_page(
        &self,
        account_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<Document>, DbErr> {
        let query = entity::prelude::Document::find().filter(Column::AccountId.eq(account_id));
        let query = grid.apply(query).order_by_desc(Column::CreatedDate);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.load(page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_by_account(&self, account_id: Uuid) -> Result<Vec<Document>, DbErr> {
        let entities = entity::prelude::Document::find()
            .filter(Column::AccountId.eq(account_id))
            .order_by_desc(Column::CreatedDate)
            .all(self.db)
            .await?;

        self.load(entities).await
    }

    pub async fn create(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        account_id: Uuid,
        user_id: Uuid,
        upload: &UploadParams,
    ) -> Result<Document, DbErr> {
        let entity = entity::document::ActiveModel {
            id: ActiveValue::Set(id),
            tenant_id: ActiveValue::Set(tenant_id),
            account_id: ActiveValue::Set(account_id),
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(upload.name.clone()),
            content_type: ActiveValue::Set(upload.content_type.clone()),
            size: ActiveValue::Set(upload.bytes.len() as i64),
            created_date: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        self.load(vec![entity])
            .await?
            .pop()
            .ok_or(DbErr::RecordNotInserted)
    }

    async fn load(&self, entities: Vec<entity::document::Model>) -> Result<Vec<Document>, DbErr> {
        let users = names_by_id::<entity::prelude::User, _>(
            self.db,
            entity::user::Column::Id,
            entity::user::Column::FullName,
            entities.iter().map(|d| d.user_id).collect(),
        )
        .await?;

        Ok(entities
            .into_iter()
            .map(|entity| {
                let uploaded_by = users.get(&entity.user_id).cloned().unwrap_or_default();
                Document::from_entity(entity, uploaded_by)
            })
            .collect())
    }
}
