//! Record store boundaries for batch definitions and generated items.
//!
//! Services and the generation pipeline talk to [`BatchStore`] and
//! [`ItemStore`] instead of a concrete pool, so the same orchestration code
//! runs against Postgres ([`PgStore`]) or the in-process
//! [`MemoryStore`](crate::memory::MemoryStore).

use async_trait::async_trait;
use office_core::qr_batch::BatchStatus;
use sqlx::PgPool;

use crate::models::batch_qr_code::{BatchQrCode, CreateBatchQrCode, UpdateBatchQrCode};
use crate::models::qr_code::{CreateQrCode, QrCode, UpdateQrCode};
use crate::repositories::{BatchQrCodeRepo, QrCodeRepo};

/// Failure reported by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for batch definitions.
#[async_trait]
pub trait BatchStore: Send + Sync {
    async fn create_batch(&self, input: &CreateBatchQrCode) -> StoreResult<BatchQrCode>;

    async fn find_batch(&self, id: &str) -> StoreResult<Option<BatchQrCode>>;

    /// Returns `None` when the batch does not exist.
    async fn update_batch(
        &self,
        id: &str,
        input: &UpdateBatchQrCode,
    ) -> StoreResult<Option<BatchQrCode>>;

    /// Atomically move a batch from `from` to `to`.
    ///
    /// Returns the updated row, or `None` if the batch is missing or is not
    /// currently in `from`.
    async fn compare_and_set_status(
        &self,
        id: &str,
        from: BatchStatus,
        to: BatchStatus,
    ) -> StoreResult<Option<BatchQrCode>>;

    async fn delete_batch(&self, id: &str) -> StoreResult<bool>;

    /// One page of an application's batches, newest first, plus the total.
    async fn list_batches(
        &self,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<BatchQrCode>, i64)>;
}

/// Persistence for QR code items.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn create_item(&self, input: &CreateQrCode) -> StoreResult<QrCode>;

    async fn find_item(&self, id: &str) -> StoreResult<Option<QrCode>>;

    async fn update_item(&self, id: &str, input: &UpdateQrCode) -> StoreResult<Option<QrCode>>;

    async fn set_image_path(&self, id: &str, image_path: &str) -> StoreResult<Option<QrCode>>;

    async fn delete_item(&self, id: &str) -> StoreResult<bool>;

    /// One page of an application's QR codes, newest first, plus the total.
    async fn list_items(
        &self,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<QrCode>, i64)>;

    /// Items produced by a batch, in ascending index order.
    async fn list_batch_items(&self, batch_id: &str) -> StoreResult<Vec<QrCode>>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// Postgres-backed store delegating to the repository layer.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchStore for PgStore {
    async fn create_batch(&self, input: &CreateBatchQrCode) -> StoreResult<BatchQrCode> {
        Ok(BatchQrCodeRepo::create(&self.pool, input).await?)
    }

    async fn find_batch(&self, id: &str) -> StoreResult<Option<BatchQrCode>> {
        Ok(BatchQrCodeRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_batch(
        &self,
        id: &str,
        input: &UpdateBatchQrCode,
    ) -> StoreResult<Option<BatchQrCode>> {
        Ok(BatchQrCodeRepo::update(&self.pool, id, input).await?)
    }

    async fn compare_and_set_status(
        &self,
        id: &str,
        from: BatchStatus,
        to: BatchStatus,
    ) -> StoreResult<Option<BatchQrCode>> {
        Ok(
            BatchQrCodeRepo::compare_and_set_status(&self.pool, id, from.as_str(), to.as_str())
                .await?,
        )
    }

    async fn delete_batch(&self, id: &str) -> StoreResult<bool> {
        Ok(BatchQrCodeRepo::delete(&self.pool, id).await?)
    }

    async fn list_batches(
        &self,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<BatchQrCode>, i64)> {
        let total = BatchQrCodeRepo::count_by_app(&self.pool, app_id).await?;
        let rows = BatchQrCodeRepo::list_by_app(&self.pool, app_id, limit, offset).await?;
        Ok((rows, total))
    }
}

#[async_trait]
impl ItemStore for PgStore {
    async fn create_item(&self, input: &CreateQrCode) -> StoreResult<QrCode> {
        Ok(QrCodeRepo::create(&self.pool, input).await?)
    }

    async fn find_item(&self, id: &str) -> StoreResult<Option<QrCode>> {
        Ok(QrCodeRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_item(&self, id: &str, input: &UpdateQrCode) -> StoreResult<Option<QrCode>> {
        Ok(QrCodeRepo::update(&self.pool, id, input).await?)
    }

    async fn set_image_path(&self, id: &str, image_path: &str) -> StoreResult<Option<QrCode>> {
        Ok(QrCodeRepo::set_image_path(&self.pool, id, image_path).await?)
    }

    async fn delete_item(&self, id: &str) -> StoreResult<bool> {
        Ok(QrCodeRepo::delete(&self.pool, id).await?)
    }

    async fn list_items(
        &self,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<QrCode>, i64)> {
        let total = QrCodeRepo::count_by_app(&self.pool, app_id).await?;
        let rows = QrCodeRepo::list_by_app(&self.pool, app_id, limit, offset).await?;
        Ok((rows, total))
    }

    async fn list_batch_items(&self, batch_id: &str) -> StoreResult<Vec<QrCode>> {
        Ok(QrCodeRepo::list_by_batch(&self.pool, batch_id).await?)
    }
}
