use std::{process, sync::Arc};

use dotenvy::dotenv;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use urlreg::{
    api::routes::router,
    config::Config,
    db::{MongoStore, UrlStore},
    logging,
    registry::ShortLinks,
    state::AppState,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let _log_guard = logging::init();

    let config = Config::load();

    let store: Arc<dyn UrlStore> = match MongoStore::connect(&config).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "MongoDB connection error");
            process::exit(1);
        }
    };

    let state = AppState::new(store, ShortLinks::from_config(&config));
    let app = router(state.clone());

    let addr = config.listen_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %addr, "Failed to bind listener");
            state.registry.close().await;
            process::exit(1);
        }
    };
    info!("Server running on port {}", config.port);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
    }

    state.registry.close().await;
    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
