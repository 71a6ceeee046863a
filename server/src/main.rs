use tokio::net::TcpListener;
use todo_server::{AppState, ServerConfig, ServerError, SqliteStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let config = ServerConfig::from_env()?;
    let store = SqliteStore::connect(&config.database_url, config.max_connections).await?;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, database_url = %config.database_url, "listening");

    todo_server::serve(listener, AppState::new(store), todo_server::shutdown_signal()).await?;
    tracing::info!("server shutdown complete");
    Ok(())
}

fn init_tracing() -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .map_err(ServerError::Logging)
}
