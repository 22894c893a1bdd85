use std::sync::Arc;

use bite_api::{
    api::{create_router, AppState},
    config::Config,
    store::{FileTableStore, TableStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bite_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn TableStore> = Arc::new(FileTableStore::new(&config.data_dir));
    tracing::info!(
        store = store.name(),
        data_dir = %config.data_dir.display(),
        min_history = config.min_history,
        "Table store ready"
    );

    let state = AppState::from_config(store, &config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
