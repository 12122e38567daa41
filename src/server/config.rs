use std::{net::SocketAddr, path::PathBuf};

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_APP_URL: &str = "http://localhost:8080";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_DOCUMENT_STORAGE_DIR: &str = "./storage";

pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub bind_address: SocketAddr,

    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    pub oauth_auth_url: String,
    pub oauth_token_url: String,
    pub oauth_userinfo_url: String,
    pub oauth_redirect_url: String,

    /// Email delivery is skipped when either SendGrid value is missing.
    pub sendgrid_api_key: Option<String>,
    pub email_from: Option<String>,

    pub document_storage_dir: PathBuf,

    /// Created as super admin on startup when no super admin exists yet.
    pub bootstrap_admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let app_url = optional("APP_URL")
            .unwrap_or_else(|| DEFAULT_APP_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let bind_address = optional("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: "BIND_ADDRESS".to_string(),
                reason: e.to_string(),
            })?;

        let oauth_redirect_url = optional("OAUTH_REDIRECT_URL")
            .unwrap_or_else(|| format!("{}/api/auth/callback", app_url));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_address,
            oauth_client_id: required("OAUTH_CLIENT_ID")?,
            oauth_client_secret: required("OAUTH_CLIENT_SECRET")?,
            oauth_auth_url: required("OAUTH_AUTH_URL")?,
            oauth_token_url: required("OAUTH_TOKEN_URL")?,
            oauth_userinfo_url: required("OAUTH_USERINFO_URL")?,
            oauth_redirect_url,
            sendgrid_api_key: optional("SENDGRID_API_KEY"),
            email_from: optional("EMAIL_FROM"),
            document_storage_dir: optional("DOCUMENT_STORAGE_DIR")
                .unwrap_or_else(|| DEFAULT_DOCUMENT_STORAGE_DIR.to_string())
                .into(),
            bootstrap_admin_email: optional("BOOTSTRAP_ADMIN_EMAIL"),
            app_url,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Unset and empty variables are both treated as absent.
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
