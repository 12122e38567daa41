use oauth2::{
    basic::BasicTokenType, AuthorizationCode, CsrfToken, EmptyExtraTokenFields, Scope,
    StandardTokenResponse, TokenResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use url::Url;

use entity::sea_orm_active_enums::Status;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::auth::CurrentUser,
    state::OAuth2Client,
};

/// Subset of the OpenID Connect userinfo response.
#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
}

/// OAuth2 / OpenID Connect login against the configured identity provider.
///
/// The provider only proves the email address; users, roles and tenants are managed
/// locally and a login succeeds only for an existing, active user.
pub struct AuthService<'a> {
    pub db: &'a DatabaseConnection,
    pub http_client: &'a reqwest::Client,
    pub oauth_client: &'a OAuth2Client,
    pub userinfo_url: &'a str,
}

impl<'a> AuthService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        userinfo_url: &'a str,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            userinfo_url,
        }
    }

    /// Authorization URL plus the CSRF token the callback must echo back.
    pub fn login_url(&self) -> (Url, CsrfToken) {
        self.oauth_client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url()
    }

    /// Exchanges the authorization code and signs in the user owning the returned email.
    ///
    /// # Returns
    /// - `Ok(CurrentUser)` - Signed-in user with the tenant it belongs to
    /// - `Err(AuthError::TokenExchange)` - Code exchange failed
    /// - `Err(AuthError::MissingEmail)` - Provider returned no email
    /// - `Err(AuthError::UserNotInDatabase)` / `Err(AuthError::UserDeactivated)` - See `login_by_email`
    pub async fn callback(&self, authorization_code: String) -> Result<CurrentUser, AppError> {
        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let email = self.fetch_email(&token).await?;

        self.login_by_email(&email).await
    }

    /// Signs in a user by email and records the login date.
    ///
    /// # Returns
    /// - `Ok(CurrentUser)` - Active user found
    /// - `Err(AuthError::UserNotInDatabase)` - No user with this email (401)
    /// - `Err(AuthError::UserDeactivated)` - User is deactivated (403)
    pub async fn login_by_email(&self, email: &str) -> Result<CurrentUser, AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo.find_by_email(email).await? else {
            return Err(AuthError::UserNotInDatabase(email.to_string()).into());
        };
        if user.status == Status::Deactivated {
            return Err(AuthError::UserDeactivated(user.id).into());
        }

        let user = user_repo.set_last_login(user.id).await?;
        let tenant_id = user_repo.get_tenant_id(user.id).await?;

        tracing::info!("User ({}) logged in", user.id);

        CurrentUser::load(self.db, user, tenant_id).await
    }

    async fn fetch_email(
        &self,
        token: &StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    ) -> Result<String, AppError> {
        let user_info: UserInfo = self
            .http_client
            .get(self.userinfo_url)
            .bearer_auth(token.access_token().secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        user_info
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AuthError::MissingEmail.into())
    }
}
