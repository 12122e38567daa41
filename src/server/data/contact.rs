use std::collections::HashMap;

use chrono::Utc;
use entity::{contact::Column, sea_orm_active_enums::Status};
use sea_orm::{
    sea_query::Query, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::{fetch_page, names_by_id},
    model::{
        contact::{AccountContact, Contact, ContactParams, LinkedContact},
        status_dates, Named, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const CONTACT_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("firstName", Column::FirstName, FieldKind::Text),
    GridField::new("lastName", Column::LastName, FieldKind::Text),
    GridField::new("fullName", Column::FullName, FieldKind::Text),
    GridField::new("email", Column::Email, FieldKind::Text),
    GridField::new("jobTitle", Column::JobTitle, FieldKind::Text),
    GridField::new("phone", Column::Phone, FieldKind::Text),
    GridField::new("country", Column::Country, FieldKind::Text),
    GridField::new("city", Column::City, FieldKind::Text),
    GridField::new("state", Column::State, FieldKind::Text),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct ContactRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContactRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_entity(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<entity::contact::Model>, DbErr> {
        entity::prelude::Contact::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Contact>, DbErr> {
        let Some(entity) = self.find_entity(tenant_id, id).await? else {
            return Ok(None);
        };

        Ok(self.load(vec![entity]).await?.pop())
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<Contact>, DbErr> {
        let query = entity::prelude::Contact::find().filter(Column::TenantId.eq(tenant_id));
        let query = grid.apply(query).order_by_asc(Column::FullName);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.load(page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_all(&self, tenant_id: Uuid) -> Result<Vec<Contact>, DbErr> {
        let entities = entity::prelude::Contact::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::FullName)
            .all(self.db)
            .await?;

        self.load(entities).await
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        params: ContactParams,
    ) -> Result<entity::contact::Model, DbErr> {
        entity::contact::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            full_name: ActiveValue::Set(params.full_name()),
            first_name: ActiveValue::Set(params.first_name),
            last_name: ActiveValue::Set(params.last_name),
            email: ActiveValue::Set(params.email),
            secondary_email: ActiveValue::Set(params.secondary_email),
            job_title: ActiveValue::Set(params.job_title),
            phone: ActiveValue::Set(params.phone),
            mobile_phone: ActiveValue::Set(params.mobile_phone),
            country: ActiveValue::Set(params.country),
            city: ActiveValue::Set(params.city),
            state: ActiveValue::Set(params.state),
            zip: ActiveValue::Set(params.zip),
            address: ActiveValue::Set(params.address),
            created_date: ActiveValue::Set(Utc::now()),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }

    pub async fn update(&self, id: Uuid, params: ContactParams) -> Result<(), DbErr> {
        let mut active: entity::contact::ActiveModel = entity::prelude::Contact::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Contact {} not found", id)))?
            .into();

        active.full_name = ActiveValue::Set(params.full_name());
        active.first_name = ActiveValue::Set(params.first_name);
        active.last_name = ActiveValue::Set(params.last_name);
        active.email = ActiveValue::Set(params.email);
        active.secondary_email = ActiveValue::Set(params.secondary_email);
        active.job_title = ActiveValue::Set(params.job_title);
        active.phone = ActiveValue::Set(params.phone);
        active.mobile_phone = ActiveValue::Set(params.mobile_phone);
        active.country = ActiveValue::Set(params.country);
        active.city = ActiveValue::Set(params.city);
        active.state = ActiveValue::Set(params.state);
        active.zip = ActiveValue::Set(params.zip);
        active.address = ActiveValue::Set(params.address);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));
        active.update(self.db).await?;

        Ok(())
    }

    pub async fn find_link(
        &self,
        account_id: Uuid,
        contact_id: Uuid,
    ) -> Result<Option<entity::account_contact::Model>, DbErr> {
        entity::prelude::AccountContact::find_by_id((account_id, contact_id))
            .one(self.db)
            .await
    }

    /// Number of accounts the contact is linked to.
    pub async fn count_links(&self, contact_id: Uuid) -> Result<u64, DbErr> {
        entity::prelude::AccountContact::find()
            .filter(entity::account_contact::Column::ContactId.eq(contact_id))
            .count(self.db)
            .await
    }

    pub async fn create_link(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        contact_id: Uuid,
        contact_type: String,
    ) -> Result<(), DbErr> {
        entity::account_contact::ActiveModel {
            account_id: ActiveValue::Set(account_id),
            contact_id: ActiveValue::Set(contact_id),
            tenant_id: ActiveValue::Set(tenant_id),
            contact_type: ActiveValue::Set(contact_type),
            status: ActiveValue::Set(Status::Active),
            deactivation_date: ActiveValue::Set(None),
            reactivation_date: ActiveValue::Set(None),
            created_date: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    pub async fn delete_link(&self, account_id: Uuid, contact_id: Uuid) -> Result<(), DbErr> {
        entity::prelude::AccountContact::delete_by_id((account_id, contact_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    pub async fn set_link_status(
        &self,
        link: entity::account_contact::Model,
        status: Status,
    ) -> Result<(), DbErr> {
        let (deactivation_date, reactivation_date) = status_dates(status, Utc::now());

        let mut active: entity::account_contact::ActiveModel = link.into();
        active.status = ActiveValue::Set(status);
        active.deactivation_date = ActiveValue::Set(deactivation_date);
        active.reactivation_date = ActiveValue::Set(reactivation_date);
        active.update(self.db).await?;

        Ok(())
    }

    pub async fn find_account_contact(
        &self,
        account_id: Uuid,
        contact_id: Uuid,
    ) -> Result<Option<AccountContact>, DbErr> {
        let Some(link) = self.find_link(account_id, contact_id).await? else {
            return Ok(None);
        };
        let contact = entity::prelude::Contact::find_by_id(contact_id)
            .one(self.db)
            .await?;

        Ok(contact.map(|c| AccountContact::from_entities(link, c)))
    }

    /// Contacts of an account. The grid applies to contact fields.
    pub async fn get_account_contacts_page(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<AccountContact>, DbErr> {
        let query = entity::prelude::Contact::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(in_account(account_id));
        let query = grid.apply(query).order_by_asc(Column::FullName);

        let page = fetch_page(self.db, query, grid).await?;
        let items = self.with_links(account_id, page.items).await?;

        Ok(Page {
            count: page.count,
            items,
        })
    }

    pub async fn get_account_contacts(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
    ) -> Result<Vec<AccountContact>, DbErr> {
        let contacts = entity::prelude::Contact::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(in_account(account_id))
            .order_by_asc(Column::FullName)
            .all(self.db)
            .await?;

        self.with_links(account_id, contacts).await
    }

    pub async fn find_contact_link(
        &self,
        source_contact_id: Uuid,
        related_contact_id: Uuid,
    ) -> Result<Option<entity::linked_contact::Model>, DbErr> {
        entity::prelude::LinkedContact::find_by_id((source_contact_id, related_contact_id))
            .one(self.db)
            .await
    }

    pub async fn get_linked_contacts(&self, contact_id: Uuid) -> Result<Vec<LinkedContact>, DbErr> {
        let links = entity::prelude::LinkedContact::find()
            .filter(entity::linked_contact::Column::SourceContactId.eq(contact_id))
            .all(self.db)
            .await?;

        let mut contacts: HashMap<Uuid, entity::contact::Model> = entity::prelude::Contact::find()
            .filter(Column::Id.is_in(links.iter().map(|l| l.related_contact_id)))
            .all(self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut linked: Vec<LinkedContact> = links
            .into_iter()
            .filter_map(|link| {
                let contact = contacts.remove(&link.related_contact_id)?;
                Some(LinkedContact::from_entities(link, contact))
            })
            .collect();
        linked.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        Ok(linked)
    }

    /// Links two contacts in both directions with the same comment.
    pub async fn link_contacts(
        &self,
        tenant_id: Uuid,
        contact_id: Uuid,
        related_contact_id: Uuid,
        comment: Option<String>,
    ) -> Result<(), DbErr> {
        entity::prelude::LinkedContact::insert_many([
            entity::linked_contact::ActiveModel {
                source_contact_id: ActiveValue::Set(contact_id),
                related_contact_id: ActiveValue::Set(related_contact_id),
                tenant_id: ActiveValue::Set(tenant_id),
                comment: ActiveValue::Set(comment.clone()),
            },
            entity::linked_contact::ActiveModel {
                source_contact_id: ActiveValue::Set(related_contact_id),
                related_contact_id: ActiveValue::Set(contact_id),
                tenant_id: ActiveValue::Set(tenant_id),
                comment: ActiveValue::Set(comment),
            },
        ])
        .exec(self.db)
        .await?;

        Ok(())
    }

    pub async fn unlink_contacts(
        &self,
        contact_id: Uuid,
        related_contact_id: Uuid,
    ) -> Result<(), DbErr> {
        for (source, related) in [
            (contact_id, related_contact_id),
            (related_contact_id, contact_id),
        ] {
            entity::prelude::LinkedContact::delete_by_id((source, related))
                .exec(self.db)
                .await?;
        }

        Ok(())
    }

    async fn with_links(
        &self,
        account_id: Uuid,
        contacts: Vec<entity::contact::Model>,
    ) -> Result<Vec<AccountContact>, DbErr> {
        let mut links: HashMap<Uuid, entity::account_contact::Model> =
            entity::prelude::AccountContact::find()
                .filter(entity::account_contact::Column::AccountId.eq(account_id))
                .filter(
                    entity::account_contact::Column::ContactId
                        .is_in(contacts.iter().map(|c| c.id)),
                )
                .all(self.db)
                .await?
                .into_iter()
                .map(|l| (l.contact_id, l))
                .collect();

        Ok(contacts
            .into_iter()
            .filter_map(|contact| {
                let link = links.remove(&contact.id)?;
                Some(AccountContact::from_entities(link, contact))
            })
            .collect())
    }

    async fn load(&self, entities: Vec<entity::contact::Model>) -> Result<Vec<Contact>, DbErr> {
        let links = entity::prelude::AccountContact::find()
            .filter(
                entity::account_contact::Column::ContactId.is_in(entities.iter().map(|c| c.id)),
            )
            .all(self.db)
            .await?;

        let names = names_by_id::<entity::prelude::Account, _>(
            self.db,
            entity::account::Column::Id,
            entity::account::Column::Name,
            links.iter().map(|l| l.account_id).collect(),
        )
        .await?;

        let mut accounts: HashMap<Uuid, Vec<Named>> = HashMap::new();
        for link in links {
            if let Some(name) = names.get(&link.account_id) {
                accounts
                    .entry(link.contact_id)
                    .or_default()
                    .push(Named::new(link.account_id, name.clone()));
            }
        }

        Ok(entities
            .into_iter()
            .map(|entity| {
                let mut named = accounts.remove(&entity.id).unwrap_or_default();
                named.sort_by(|a, b| a.name.cmp(&b.name));
                Contact::from_entity(entity, named)
            })
            .collect())
    }
}

/// Restricts a contact query to contacts linked to the account.
fn in_account(account_id: Uuid) -> sea_orm::Condition {
    sea_orm::Condition::all().add(
        Column::Id.in_subquery(
            Query::select()
                .column(entity::account_contact::Column::ContactId)
                .from(entity::account_contact::Entity)
                .and_where(entity::account_contact::Column::AccountId.eq(account_id))
                .to_owned(),
        ),
    )
}
