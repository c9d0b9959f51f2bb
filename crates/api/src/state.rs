use std::sync::Arc;

use office_db::{BatchStore, DbPool, ItemStore};
use office_pipeline::{BatchGenerator, BatchQrCodeService, ImageRenderer, QrCodeService};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database pool, absent when running on the in-memory store.
    pub pool: Option<DbPool>,
    pub config: Arc<ServerConfig>,
    pub batch_qr_codes: Arc<BatchQrCodeService>,
    pub generator: Arc<BatchGenerator>,
    pub qr_codes: Arc<QrCodeService>,
}

impl AppState {
    /// Wire the services over the given record stores and image renderer.
    pub fn new(
        config: ServerConfig,
        batches: Arc<dyn BatchStore>,
        items: Arc<dyn ItemStore>,
        renderer: Arc<dyn ImageRenderer>,
        pool: Option<DbPool>,
    ) -> Self {
        let batch_qr_codes = Arc::new(BatchQrCodeService::new(
            Arc::clone(&batches),
            Arc::clone(&items),
        ));
        let generator = Arc::new(BatchGenerator::new(
            batches,
            Arc::clone(&items),
            Arc::clone(&renderer),
            config.qr.generator_config(),
        ));
        let qr_codes = Arc::new(QrCodeService::new(items, renderer));

        Self {
            pool,
            config: Arc::new(config),
            batch_qr_codes,
            generator,
            qr_codes,
        }
    }
}
