use std::sync::Arc;

use mock_server::{MockPsn, DEFAULT_ACCOUNT, DEFAULT_TOKEN};
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let token = std::env::var("MOCK_PSN_TOKEN").unwrap_or_else(|_| DEFAULT_TOKEN.to_string());
    let account = std::env::var("MOCK_PSN_ACCOUNT").unwrap_or_else(|_| DEFAULT_ACCOUNT.to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %account, "mock PSN listening");
    let db = Arc::new(RwLock::new(MockPsn::seeded(&token, &account)));
    mock_server::run_with_state(listener, db).await
}
