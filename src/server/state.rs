//! Application state shared across all request handlers.
//!
//! `AppState` is built once during startup and cloned into every handler through
//! Axum's state extraction. All fields are cheap to clone: the database connection
//! and HTTP client are pools, the remaining services hold `Arc`s or small strings.

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use sea_orm::DatabaseConnection;

use crate::server::{service::email::EmailSender, storage::DocumentStorage};

/// OAuth2 client with the authorization and token endpoints set.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,

    /// HTTP client for the identity provider and SendGrid.
    ///
    /// Built without redirect following, which the OAuth2 token exchange requires.
    pub http_client: reqwest::Client,

    pub oauth_client: OAuth2Client,

    /// Identity provider endpoint returning the signed-in user's email.
    pub userinfo_url: String,

    pub email_sender: EmailSender,

    pub storage: DocumentStorage,

    /// Application base URL used for redirects and email links.
    pub app_url: String,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        userinfo_url: String,
        email_sender: EmailSender,
        storage: DocumentStorage,
        app_url: String,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            userinfo_url,
            email_sender,
            storage,
            app_url,
        }
    }
}
