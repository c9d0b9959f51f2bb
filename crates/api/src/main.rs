use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use office_db::{BatchStore, ItemStore, MemoryStore, PgStore};
use office_pipeline::{ImageRenderer, LocalImageSink, QrEncoder, QrImageRenderer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use office_api::config::ServerConfig;
use office_api::router::build_app_router;
use office_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "office_api=debug,office_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Record store ---
    let (batches, items, pool) =
        match &config.database_url {
            Some(database_url) => {
                let pool = office_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                office_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");

                office_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                let store = Arc::new(PgStore::new(pool.clone()));
                let batches: Arc<dyn BatchStore> = store.clone();
                let items: Arc<dyn ItemStore> = store;
                (batches, items, Some(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, records are kept in memory only");
                let store = Arc::new(MemoryStore::new());
                let batches: Arc<dyn BatchStore> = store.clone();
                let items: Arc<dyn ItemStore> = store;
                (batches, items, None)
            }
        };

    // --- Image renderer ---
    let renderer: Arc<dyn ImageRenderer> = Arc::new(QrImageRenderer::new(
        QrEncoder::new(config.qr.image_size),
        Arc::new(LocalImageSink::new(config.qr.image_dir.clone())),
    ));
    tracing::info!(
        image_dir = %config.qr.image_dir.display(),
        image_size = config.qr.image_size,
        render_concurrency = config.qr.render_concurrency,
        "QR image renderer configured"
    );

    // --- App state and router ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let state = AppState::new(config, batches, items, renderer, pool.clone());
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let mut server = std::pin::pin!(server.into_future());

    // Once a signal arrives, in-flight requests get `shutdown_timeout` to drain.
    tokio::select! {
        result = &mut server => result.expect("Server error"),
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out, dropping remaining connections"
            );
        }
    }

    // --- Post-shutdown cleanup ---
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
