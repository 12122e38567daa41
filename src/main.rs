mod model;
mod server;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::{
    config::Config, error::AppError, service::email::EmailSender, service::role::RoleService,
    startup, state::AppState, storage::DocumentStorage,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxbeacon=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db).await?;
    let http_client = startup::setup_reqwest_client()?;
    let oauth_client = startup::setup_oauth_client(&config)?;

    let role_service = RoleService::new(&db);
    role_service.seed_permissions().await?;
    if let Some(email) = config.bootstrap_admin_email.as_deref() {
        role_service.ensure_bootstrap_admin(email).await?;
    }

    let email_sender = EmailSender::new(
        http_client.clone(),
        config.sendgrid_api_key.clone(),
        config.email_from.clone(),
        config.app_url.clone(),
    );
    if !email_sender.is_configured() {
        tracing::warn!("SendGrid is not configured, account emails will not be sent");
    }

    let storage = DocumentStorage::new(config.document_storage_dir.clone());

    let cors = startup::setup_cors(&config)?;

    let state = AppState::new(
        db,
        http_client,
        oauth_client,
        config.oauth_userinfo_url.clone(),
        email_sender,
        storage,
        config.app_url.clone(),
    );

    let app = server::router::router()
        .with_state(state)
        .layer(session)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = TcpListener::bind(config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
