//! Repository for the `batch_qr_codes` table.

use sqlx::PgPool;

use crate::models::batch_qr_code::{BatchQrCode, CreateBatchQrCode, UpdateBatchQrCode};

/// Column list for batch_qr_codes queries.
const COLUMNS: &str = "\
    id, app_id, name, description, prefix, count, kind, url_template, \
    config, status, created_by, created_at, updated_at";

/// Provides CRUD operations for batch QR code definitions.
pub struct BatchQrCodeRepo;

impl BatchQrCodeRepo {
    /// Insert a new batch definition, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBatchQrCode,
    ) -> Result<BatchQrCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO batch_qr_codes \
                (id, app_id, name, description, prefix, count, kind, \
                 url_template, config, status, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BatchQrCode>(&query)
            .bind(&input.id)
            .bind(&input.app_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.prefix)
            .bind(input.count)
            .bind(&input.kind)
            .bind(&input.url_template)
            .bind(&input.config)
            .bind(&input.status)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a batch definition by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<BatchQrCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM batch_qr_codes WHERE id = $1");
        sqlx::query_as::<_, BatchQrCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update descriptive fields. `None` leaves a column unchanged.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateBatchQrCode,
    ) -> Result<Option<BatchQrCode>, sqlx::Error> {
        let query = format!(
            "UPDATE batch_qr_codes SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                prefix = COALESCE($4, prefix),
                url_template = COALESCE($5, url_template),
                config = COALESCE($6, config),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BatchQrCode>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.prefix)
            .bind(&input.url_template)
            .bind(&input.config)
            .fetch_optional(pool)
            .await
    }

    /// Move a batch from `from` to `to` only if it is currently in `from`.
    ///
    /// Returns `None` when the row is missing or in a different status, so
    /// two callers racing on the same transition cannot both win.
    pub async fn compare_and_set_status(
        pool: &PgPool,
        id: &str,
        from: &str,
        to: &str,
    ) -> Result<Option<BatchQrCode>, sqlx::Error> {
        let query = format!(
            "UPDATE batch_qr_codes SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BatchQrCode>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Delete a batch definition. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM batch_qr_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List batches for an application, newest first.
    pub async fn list_by_app(
        pool: &PgPool,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BatchQrCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM batch_qr_codes \
             WHERE app_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BatchQrCode>(&query)
            .bind(app_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count batches for an application.
    pub async fn count_by_app(pool: &PgPool, app_id: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM batch_qr_codes WHERE app_id = $1")
            .bind(app_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}
