use gamehub::{
    AppConfig, AppState, FileSessionStore, GameBackend, HttpBackend, MockBackend, actions, router,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env()?;

    let backend: Arc<dyn GameBackend> = match &config.backend_url {
        Some(url) => {
            info!("using backend at {url}");
            Arc::new(HttpBackend::new(url, config.backend_timeout)?)
        }
        None => {
            info!("BACKEND_URL not set, serving built-in sample catalog");
            Arc::new(MockBackend::with_fixtures())
        }
    };

    let session = FileSessionStore::open(config.session_path.clone()).await;
    info!("admin session stored at {}", session.path().display());

    let state = AppState::new(backend, Arc::new(session)).await;
    // a failed first load is reported on the first page and can be retried
    let _ = actions::load_catalog(&state).await;

    let app = router(state);
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
