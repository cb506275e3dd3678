use sales_insights::{AppConfig, AppState, FileStore, SalesRepository, load_documents, router};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?,
        )
        .init();

    let registry = config.load_registry()?;
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let repository = SalesRepository::new(FileStore::new(&config.data_path));
    let documents = load_documents(&repository, &registry).await;
    info!(
        categories = registry.performance.len(),
        staff = registry.staff.len(),
        data_path = %config.data_path.display(),
        "sales store ready"
    );

    let app = router(AppState::new(registry, repository, documents));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
