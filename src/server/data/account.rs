use chrono::Utc;
use entity::{account::Column, sea_orm_active_enums::Status};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::server::{
    data::fetch_page,
    model::{
        account::{Account, AccountDetails, AccountParams},
        status_dates, Page,
    },
    util::grid::{FieldKind, GridField, GridQuery},
};

pub const ACCOUNT_GRID_FIELDS: &[GridField<Column>] = &[
    GridField::new("name", Column::Name, FieldKind::Text),
    GridField::new("accountId", Column::AccountId, FieldKind::Text),
    GridField::new("doingBusinessAs", Column::DoingBusinessAs, FieldKind::Text),
    GridField::new("country", Column::Country, FieldKind::Text),
    GridField::new("city", Column::City, FieldKind::Text),
    GridField::new("state", Column::State, FieldKind::Text),
    GridField::new("county", Column::County, FieldKind::Text),
    GridField::new("zip", Column::Zip, FieldKind::Text),
    GridField::new("phone", Column::Phone, FieldKind::Text),
    GridField::new("primaryNaicsCode", Column::PrimaryNaicsCode, FieldKind::Number),
    GridField::new("clientState", Column::ClientState, FieldKind::Enum),
    GridField::new("clientStatus", Column::ClientStatus, FieldKind::Enum),
    GridField::new("referralState", Column::ReferralState, FieldKind::Enum),
    GridField::new("referralStatus", Column::ReferralStatus, FieldKind::Enum),
    GridField::new("createdDate", Column::CreatedDate, FieldKind::Date),
];

pub struct AccountRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AccountRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Account>, DbErr> {
        let entity = entity::prelude::Account::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Account::from_entity))
    }

    /// Account with the number of contacts, entities and locations attached to it.
    pub async fn find_details(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<AccountDetails>, DbErr> {
        let Some(account) = self.find(tenant_id, id).await? else {
            return Ok(None);
        };

        let contacts_count = entity::prelude::AccountContact::find()
            .filter(entity::account_contact::Column::AccountId.eq(id))
            .count(self.db)
            .await?;
        let entities_count = entity::prelude::LegalEntity::find()
            .filter(entity::legal_entity::Column::AccountId.eq(id))
            .count(self.db)
            .await?;
        let locations_count = entity::prelude::Location::find()
            .filter(entity::location::Column::AccountId.eq(id))
            .count(self.db)
            .await?;

        Ok(Some(AccountDetails {
            account,
            contacts_count,
            entities_count,
            locations_count,
        }))
    }

    /// Whether `account_id` is taken in the tenant by an account other than `except`.
    pub async fn account_id_exists(
        &self,
        tenant_id: Uuid,
        account_id: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::Account::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::AccountId.eq(account_id));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    pub async fn get_page(
        &self,
        tenant_id: Uuid,
        grid: &GridQuery<Column>,
    ) -> Result<Page<Account>, DbErr> {
        let query = entity::prelude::Account::find().filter(Column::TenantId.eq(tenant_id));
        let query = grid.apply(query).order_by_asc(Column::Name);

        Ok(fetch_page(self.db, query, grid).await?.map(Account::from_entity))
    }

    pub async fn get_all(&self, tenant_id: Uuid) -> Result<Vec<Account>, DbErr> {
        let entities = entity::prelude::Account::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::Name)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Account::from_entity).collect())
    }

    /// Inserts an account. Client and referral parts start active when their state is set.
    pub async fn create(&self, tenant_id: Uuid, params: AccountParams) -> Result<Account, DbErr> {
        let now = Utc::now();
        let client_status = params.client_state.map(|_| Status::Active);
        let referral_status = params.referral_state.map(|_| Status::Active);

        let entity = entity::account::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            tenant_id: ActiveValue::Set(tenant_id),
            name: ActiveValue::Set(params.name),
            account_id: ActiveValue::Set(params.account_id),
            doing_business_as: ActiveValue::Set(params.doing_business_as),
            linkedin_url: ActiveValue::Set(params.linkedin_url),
            website: ActiveValue::Set(params.website),
            country: ActiveValue::Set(params.country),
            address1: ActiveValue::Set(params.address1),
            address2: ActiveValue::Set(params.address2),
            city: ActiveValue::Set(params.city),
            state: ActiveValue::Set(params.state),
            zip: ActiveValue::Set(params.zip),
            county: ActiveValue::Set(params.county),
            address: ActiveValue::Set(params.address),
            phone: ActiveValue::Set(params.phone),
            primary_naics_code: ActiveValue::Set(params.primary_naics_code),
            client_created_date: ActiveValue::Set(params.client_state.map(|_| now)),
            client_state: ActiveValue::Set(params.client_state),
            client_status: ActiveValue::Set(client_status),
            client_deactivation_date: ActiveValue::Set(None),
            client_reactivation_date: ActiveValue::Set(None),
            referral_state: ActiveValue::Set(params.referral_state),
            referral_status: ActiveValue::Set(referral_status),
            referral_deactivation_date: ActiveValue::Set(None),
            referral_reactivation_date: ActiveValue::Set(None),
            created_date: ActiveValue::Set(now),
            last_modified_date: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(Account::from_entity(entity))
    }

    /// Updates profile fields. Client and referral parts are left untouched.
    pub async fn update_profile(&self, id: Uuid, params: AccountParams) -> Result<Account, DbErr> {
        let mut active = self.get_active(id).await?;
        active.name = ActiveValue::Set(params.name);
        active.account_id = ActiveValue::Set(params.account_id);
        active.doing_business_as = ActiveValue::Set(params.doing_business_as);
        active.linkedin_url = ActiveValue::Set(params.linkedin_url);
        active.website = ActiveValue::Set(params.website);
        active.country = ActiveValue::Set(params.country);
        active.address1 = ActiveValue::Set(params.address1);
        active.address2 = ActiveValue::Set(params.address2);
        active.city = ActiveValue::Set(params.city);
        active.state = ActiveValue::Set(params.state);
        active.zip = ActiveValue::Set(params.zip);
        active.county = ActiveValue::Set(params.county);
        active.address = ActiveValue::Set(params.address);
        active.phone = ActiveValue::Set(params.phone);
        active.primary_naics_code = ActiveValue::Set(params.primary_naics_code);
        active.last_modified_date = ActiveValue::Set(Some(Utc::now()));

        Ok(Account::from_entity(active.update(self.db).await?))
    }

    pub async fn set_client_status(&self, id: Uuid, status: Status) -> Result<Account, DbErr> {
        let now = Utc::now();
        let (deactivation_date, reactivation_date) = status_dates(status, now);

        let mut active = self.get_active(id).await?;
        active.client_status = ActiveValue::Set(Some(status));
        active.client_deactivation_date = ActiveValue::Set(deactivation_date);
        active.client_reactivation_date = ActiveValue::Set(reactivation_date);
        active.last_modified_date = ActiveValue::Set(Some(now));

        Ok(Account::from_entity(active.update(self.db).await?))
    }

    pub async fn set_referral_status(&self, id: Uuid, status: Status) -> Result<Account, DbErr> {
        let now = Utc::now();
        let (deactivation_date, reactivation_date) = status_dates(status, now);

        let mut active = self.get_active(id).await?;
        active.referral_status = ActiveValue::Set(Some(status));
        active.referral_deactivation_date = ActiveValue::Set(deactivation_date);
        active.referral_reactivation_date = ActiveValue::Set(reactivation_date);
        active.last_modified_date = ActiveValue::Set(Some(now));

        Ok(Account::from_entity(active.update(self.db).await?))
    }

    async fn get_active(&self, id: Uuid) -> Result<entity::account::ActiveModel, DbErr> {
        entity::prelude::Account::find_by_id(id)
            .one(self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| DbErr::RecordNotFound(format!("Account {} not found", id)))
    }
}
