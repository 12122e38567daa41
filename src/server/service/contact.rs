//! Tenant contacts, their account links and contact-to-contact links.

use entity::sea_orm_active_enums::{Status, SubjectType};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{
            event::{ExecutorEvent, NamesEvent, UpdatedEvent},
            Activity, ActivityItem, Executor, Subject,
        },
        data::{
            account::AccountRepository,
            contact::{ContactRepository, CONTACT_GRID_FIELDS},
        },
        error::AppError,
        export::{export, ExportFile},
        model::{
            account::Account,
            contact::{
                AccountContact, AccountContactExportRow, Contact, ContactExportRow,
                ContactParams, LinkedContact,
            },
            status_label, Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct ContactService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ContactService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<Contact>, AppError> {
        let grid = GridQuery::parse(params, CONTACT_GRID_FIELDS)?;

        Ok(ContactRepository::new(self.db)
            .get_page(tenant_id, &grid)
            .await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Contact, AppError> {
        ContactRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Contact", id))
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: ContactParams,
        executor: Executor,
    ) -> Result<Contact, AppError> {
        let previous = self.get(tenant_id, id).await?;

        let txn = self.db.begin().await?;
        let repo = ContactRepository::new(&txn);
        repo.update(id, params).await?;
        let current = repo
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Contact", id))?;

        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_dto(),
            &current.clone().into_dto(),
        )?;
        record(&txn, tenant_id, id, Activity::ContactUpdated(event)).await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Contact ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    pub async fn activities(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        self.get(tenant_id, id).await?;

        ActivityService::new(self.db)
            .history(SubjectType::Contact, id, &[], page, page_size)
            .await
    }

    pub async fn export(
        &self,
        tenant_id: Uuid,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        let rows: Vec<ContactExportRow> = ContactRepository::new(self.db)
            .get_all(tenant_id)
            .await?
            .into_iter()
            .map(ContactExportRow)
            .collect();

        tracing::info!(
            "{} - Contacts export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("contacts", file_type, &rows)?)
    }

    pub async fn get_account_contacts(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<AccountContact>, AppError> {
        self.account(tenant_id, account_id).await?;
        let grid = GridQuery::parse(params, CONTACT_GRID_FIELDS)?;

        Ok(ContactRepository::new(self.db)
            .get_account_contacts_page(tenant_id, account_id, &grid)
            .await?)
    }

    pub async fn get_account_contact(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        contact_id: Uuid,
    ) -> Result<AccountContact, AppError> {
        self.account(tenant_id, account_id).await?;

        ContactRepository::new(self.db)
            .find_account_contact(account_id, contact_id)
            .await?
            .ok_or_else(|| AppError::missing("Contact", contact_id))
    }

    /// Creates a contact directly inside an account.
    pub async fn create_in_account(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        params: ContactParams,
        contact_type: String,
        executor: Executor,
    ) -> Result<AccountContact, AppError> {
        let account = self.account(tenant_id, account_id).await?;

        let txn = self.db.begin().await?;
        let repo = ContactRepository::new(&txn);
        let contact = repo.create(tenant_id, params).await?;
        repo.create_link(tenant_id, account_id, contact.id, contact_type)
            .await?;

        record(
            &txn,
            tenant_id,
            contact.id,
            Activity::ContactCreated(ExecutorEvent::new(executor.clone())),
        )
        .await?;
        record(
            &txn,
            tenant_id,
            contact.id,
            Activity::ContactAssignedToAccount(NamesEvent::new(
                executor.clone(),
                &[account.name],
            )),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Contact ({}) was created by {}",
            executor.date,
            contact.id,
            executor.executor_id
        );

        self.get_account_contact(tenant_id, account_id, contact.id)
            .await
    }

    /// Links an existing contact to another account.
    ///
    /// # Returns
    /// - `Err(AppError::Conflict)` - The contact is already linked to the account
    /// - `Err(AppError::NotFound)` - Account or contact does not exist in the tenant
    pub async fn assign_to_account(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        contact_id: Uuid,
        contact_type: String,
        executor: Executor,
    ) -> Result<(), AppError> {
        let repo = ContactRepository::new(self.db);

        if repo.find_link(account_id, contact_id).await?.is_some() {
            return Err(AppError::Conflict(
                "Contact already assigned to this account".to_string(),
            ));
        }

        let account = self.account(tenant_id, account_id).await?;
        self.get(tenant_id, contact_id).await?;

        let txn = self.db.begin().await?;
        ContactRepository::new(&txn)
            .create_link(tenant_id, account_id, contact_id, contact_type)
            .await?;
        record(
            &txn,
            tenant_id,
            contact_id,
            Activity::ContactAssignedToAccount(NamesEvent::new(
                executor.clone(),
                &[account.name],
            )),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Contact ({}) was assigned to account ({}) by {}",
            executor.date,
            contact_id,
            account_id,
            executor.executor_id
        );

        Ok(())
    }

    /// Removes a contact from an account. A contact keeps at least one account.
    pub async fn unassociate_from_account(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        contact_id: Uuid,
        executor: Executor,
    ) -> Result<(), AppError> {
        let account = self.account(tenant_id, account_id).await?;
        let repo = ContactRepository::new(self.db);

        if repo.find_link(account_id, contact_id).await?.is_none() {
            return Err(AppError::missing("Contact", contact_id));
        }
        if repo.count_links(contact_id).await? <= 1 {
            return Err(AppError::InvalidOperation(
                "Contact should be always linked to at least one account.".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        ContactRepository::new(&txn)
            .delete_link(account_id, contact_id)
            .await?;
        record(
            &txn,
            tenant_id,
            contact_id,
            Activity::ContactUnassociatedWithAccount(NamesEvent::new(
                executor.clone(),
                &[account.name],
            )),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Contact ({}) was unassociated with account ({}) by {}",
            executor.date,
            contact_id,
            account_id,
            executor.executor_id
        );

        Ok(())
    }

    pub async fn set_account_contact_status(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        contact_id: Uuid,
        status: Status,
        executor: Executor,
    ) -> Result<AccountContact, AppError> {
        self.account(tenant_id, account_id).await?;
        let repo = ContactRepository::new(self.db);

        let link = repo
            .find_link(account_id, contact_id)
            .await?
            .ok_or_else(|| AppError::missing("Contact", contact_id))?;

        let txn = self.db.begin().await?;
        ContactRepository::new(&txn)
            .set_link_status(link, status)
            .await?;
        record(
            &txn,
            tenant_id,
            contact_id,
            Activity::status_change(
                status == Status::Active,
                Activity::ContactReactivated,
                Activity::ContactDeactivated,
                executor.clone(),
            ),
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Contact ({}) status was changed to {} by {}",
            executor.date,
            contact_id,
            status_label(status),
            executor.executor_id
        );

        self.get_account_contact(tenant_id, account_id, contact_id)
            .await
    }

    pub async fn export_account_contacts(
        &self,
        tenant_id: Uuid,
        account_id: Uuid,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        self.account(tenant_id, account_id).await?;

        let rows: Vec<AccountContactExportRow> = ContactRepository::new(self.db)
            .get_account_contacts(tenant_id, account_id)
            .await?
            .into_iter()
            .map(AccountContactExportRow)
            .collect();

        tracing::info!(
            "{} - Account contacts export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("account-contacts", file_type, &rows)?)
    }

    pub async fn linked_contacts(
        &self,
        tenant_id: Uuid,
        contact_id: Uuid,
    ) -> Result<Vec<LinkedContact>, AppError> {
        self.get(tenant_id, contact_id).await?;

        Ok(ContactRepository::new(self.db)
            .get_linked_contacts(contact_id)
            .await?)
    }

    /// Links two contacts to each other. Both sides get an activity entry.
    ///
    /// # Returns
    /// - `Err(AppError::NotFound)` - Either contact does not exist in the tenant
    /// - `Err(AppError::InvalidOperation)` - A contact cannot be linked to itself
    /// - `Err(AppError::Conflict)` - The contacts are already linked
    pub async fn link(
        &self,
        tenant_id: Uuid,
        contact_id: Uuid,
        related_contact_id: Uuid,
        comment: Option<String>,
        executor: Executor,
    ) -> Result<(), AppError> {
        if contact_id == related_contact_id {
            return Err(AppError::InvalidOperation(
                "Contact cannot be linked to itself".to_string(),
            ));
        }

        let contact = self.get(tenant_id, contact_id).await?;
        let related = self.get(tenant_id, related_contact_id).await?;
        let repo = ContactRepository::new(self.db);

        if repo
            .find_contact_link(contact_id, related_contact_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Contacts are already linked".to_string()));
        }

        let txn = self.db.begin().await?;
        ContactRepository::new(&txn)
            .link_contacts(tenant_id, contact_id, related_contact_id, comment)
            .await?;
        record_pair(
            &txn,
            tenant_id,
            (&contact, &related),
            Activity::ContactLinkedToContact,
            &executor,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Contact ({}) was linked to contact ({}) by {}",
            executor.date,
            contact_id,
            related_contact_id,
            executor.executor_id
        );

        Ok(())
    }

    pub async fn unlink(
        &self,
        tenant_id: Uuid,
        contact_id: Uuid,
        related_contact_id: Uuid,
        executor: Executor,
    ) -> Result<(), AppError> {
        let contact = self.get(tenant_id, contact_id).await?;
        let related = self.get(tenant_id, related_contact_id).await?;
        let repo = ContactRepository::new(self.db);

        if repo
            .find_contact_link(contact_id, related_contact_id)
            .await?
            .is_none()
        {
            return Err(AppError::missing("Linked contact", related_contact_id));
        }

        let txn = self.db.begin().await?;
        ContactRepository::new(&txn)
            .unlink_contacts(contact_id, related_contact_id)
            .await?;
        record_pair(
            &txn,
            tenant_id,
            (&contact, &related),
            Activity::ContactUnlinkedFromContact,
            &executor,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Contact ({}) was unlinked from contact ({}) by {}",
            executor.date,
            contact_id,
            related_contact_id,
            executor.executor_id
        );

        Ok(())
    }

    async fn account(&self, tenant_id: Uuid, account_id: Uuid) -> Result<Account, AppError> {
        AccountRepository::new(self.db)
            .find(tenant_id, account_id)
            .await?
            .ok_or_else(|| AppError::missing("Account", account_id))
    }
}

/// Records the same kind of link activity on both contacts, each naming the other one.
async fn record_pair<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    (contact, related): (&Contact, &Contact),
    activity: fn(NamesEvent) -> Activity,
    executor: &Executor,
) -> Result<(), AppError> {
    record(
        db,
        tenant_id,
        contact.id,
        activity(NamesEvent::new(executor.clone(), &[&related.full_name])),
    )
    .await?;
    record(
        db,
        tenant_id,
        related.id,
        activity(NamesEvent::new(executor.clone(), &[&contact.full_name])),
    )
    .await
}

async fn record<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    contact_id: Uuid,
    activity: Activity,
) -> Result<(), AppError> {
    ActivityService::new(db)
        .record(
            Subject::new(SubjectType::Contact, contact_id, Some(tenant_id)),
            activity,
        )
        .await
}
