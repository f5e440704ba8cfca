use std::sync::Arc;

use mock_server::{Store, DEFAULT_PASSWORD, DEFAULT_TOKEN, DEFAULT_USERNAME};
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
    let store = Store::with_credentials(
        &var("AWX_USERNAME", DEFAULT_USERNAME),
        &var("AWX_PASSWORD", DEFAULT_PASSWORD),
        &var("AWX_TOKEN", DEFAULT_TOKEN),
    );

    let addr = format!("127.0.0.1:{}", var("PORT", "3000"));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock AWX listening");
    mock_server::run_with_state(listener, Arc::new(RwLock::new(store))).await
}
