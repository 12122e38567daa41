//! Accounts with their client and referral parts.

use chrono::Utc;
use entity::sea_orm_active_enums::{AccountPart, Status, SubjectType};
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::api::{FileType, GridParams},
    server::{
        activity::{
            event::{ExecutorEvent, UpdatedEvent},
            Activity, ActivityItem, Executor, Subject,
        },
        data::account::{AccountRepository, ACCOUNT_GRID_FIELDS},
        error::AppError,
        export::{export, ExportFile},
        model::{
            account::{Account, AccountDetails, AccountExportRow, AccountParams},
            status_label, Page,
        },
        service::activity::ActivityService,
        util::grid::GridQuery,
    },
};

pub struct AccountService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        params: &GridParams,
    ) -> Result<Page<Account>, AppError> {
        let grid = GridQuery::parse(params, ACCOUNT_GRID_FIELDS)?;

        Ok(AccountRepository::new(self.db)
            .get_page(tenant_id, &grid)
            .await?)
    }

    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> Result<Account, AppError> {
        AccountRepository::new(self.db)
            .find(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Account", id))
    }

    pub async fn get_details(&self, tenant_id: Uuid, id: Uuid) -> Result<AccountDetails, AppError> {
        AccountRepository::new(self.db)
            .find_details(tenant_id, id)
            .await?
            .ok_or_else(|| AppError::missing("Account", id))
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        params: AccountParams,
        executor: Executor,
    ) -> Result<Account, AppError> {
        let repo = AccountRepository::new(self.db);

        if repo
            .account_id_exists(tenant_id, &params.account_id, None)
            .await?
        {
            return Err(AppError::Conflict(
                "account with the same account ID already exists".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let account = AccountRepository::new(&txn).create(tenant_id, params).await?;
        ActivityService::new(&txn)
            .record(
                Subject::account(account.id, tenant_id, AccountPart::General),
                Activity::AccountCreated(ExecutorEvent::new(executor.clone())),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Account ({}) was created by {}",
            executor.date,
            account.id,
            executor.executor_id
        );

        Ok(account)
    }

    pub async fn update_profile(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        params: AccountParams,
        executor: Executor,
    ) -> Result<Account, AppError> {
        let repo = AccountRepository::new(self.db);
        let previous = self.get(tenant_id, id).await?;

        if repo
            .account_id_exists(tenant_id, &params.account_id, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "account with the same account ID already exists".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let current = AccountRepository::new(&txn)
            .update_profile(id, params)
            .await?;

        let now = Utc::now();
        let event = UpdatedEvent::new(
            executor.clone(),
            &previous.into_dto(now),
            &current.clone().into_dto(now),
        )?;
        ActivityService::new(&txn)
            .record(
                Subject::account(id, tenant_id, AccountPart::General),
                Activity::AccountProfileUpdated(event),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Account ({}) was updated by {}",
            executor.date,
            id,
            executor.executor_id
        );

        Ok(current)
    }

    /// # Returns
    /// - `Err(AppError::InvalidOperation)` - The account has no client part
    pub async fn set_client_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: Status,
        executor: Executor,
    ) -> Result<Account, AppError> {
        let account = self.get(tenant_id, id).await?;
        if account.client.is_none() {
            return Err(AppError::InvalidOperation(
                "Account is not a client".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let account = AccountRepository::new(&txn)
            .set_client_status(id, status)
            .await?;
        ActivityService::new(&txn)
            .record(
                Subject::account(id, tenant_id, AccountPart::Client),
                Activity::status_change(
                    status == Status::Active,
                    Activity::ClientReactivated,
                    Activity::ClientDeactivated,
                    executor.clone(),
                ),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Client ({}) status was changed to {} by {}",
            executor.date,
            id,
            status_label(status),
            executor.executor_id
        );

        Ok(account)
    }

    /// # Returns
    /// - `Err(AppError::InvalidOperation)` - The account has no referral part
    pub async fn set_referral_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: Status,
        executor: Executor,
    ) -> Result<Account, AppError> {
        let account = self.get(tenant_id, id).await?;
        if account.referral.is_none() {
            return Err(AppError::InvalidOperation(
                "Account is not a referral".to_string(),
            ));
        }

        let txn = self.db.begin().await?;
        let account = AccountRepository::new(&txn)
            .set_referral_status(id, status)
            .await?;
        ActivityService::new(&txn)
            .record(
                Subject::account(id, tenant_id, AccountPart::Referral),
                Activity::status_change(
                    status == Status::Active,
                    Activity::ReferralReactivated,
                    Activity::ReferralDeactivated,
                    executor.clone(),
                ),
            )
            .await?;
        txn.commit().await?;

        tracing::info!(
            "{} - Referral ({}) status was changed to {} by {}",
            executor.date,
            id,
            status_label(status),
            executor.executor_id
        );

        Ok(account)
    }

    /// Account history, optionally restricted to some account parts.
    pub async fn activities(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        parts: &[AccountPart],
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Page<ActivityItem>, AppError> {
        self.get(tenant_id, id).await?;

        ActivityService::new(self.db)
            .history(SubjectType::Account, id, parts, page, page_size)
            .await
    }

    pub async fn export(
        &self,
        tenant_id: Uuid,
        file_type: FileType,
        executor: Executor,
    ) -> Result<ExportFile, AppError> {
        let rows: Vec<AccountExportRow> = AccountRepository::new(self.db)
            .get_all(tenant_id)
            .await?
            .into_iter()
            .map(AccountExportRow)
            .collect();

        tracing::info!(
            "{} - Accounts export in {} format was executed by {}",
            executor.date,
            file_type.extension(),
            executor.executor_id
        );

        Ok(export("accounts", file_type, &rows)?)
    }
}
