//! Repository for the `qr_codes` table.

use sqlx::PgPool;

use crate::models::qr_code::{CreateQrCode, QrCode, UpdateQrCode};

/// Column list for qr_codes queries.
const COLUMNS: &str = "\
    id, app_id, name, content, kind, url, image_path, batch_id, \
    batch_index, created_by, created_at, updated_at";

/// Provides CRUD operations for QR code items.
pub struct QrCodeRepo;

impl QrCodeRepo {
    /// Insert a new QR code, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQrCode) -> Result<QrCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO qr_codes \
                (id, app_id, name, content, kind, url, batch_id, batch_index, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(&input.id)
            .bind(&input.app_id)
            .bind(&input.name)
            .bind(&input.content)
            .bind(&input.kind)
            .bind(&input.url)
            .bind(&input.batch_id)
            .bind(input.batch_index)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a QR code by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr_codes WHERE id = $1");
        sqlx::query_as::<_, QrCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update name/content/url. `None` leaves a column unchanged.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateQrCode,
    ) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!(
            "UPDATE qr_codes SET
                name = COALESCE($2, name),
                content = COALESCE($3, content),
                url = COALESCE($4, url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.content)
            .bind(&input.url)
            .fetch_optional(pool)
            .await
    }

    /// Record the rendered image location for a QR code.
    pub async fn set_image_path(
        pool: &PgPool,
        id: &str,
        image_path: &str,
    ) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!(
            "UPDATE qr_codes SET image_path = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(id)
            .bind(image_path)
            .fetch_optional(pool)
            .await
    }

    /// Delete a QR code. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List QR codes for an application, newest first.
    pub async fn list_by_app(
        pool: &PgPool,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QrCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM qr_codes \
             WHERE app_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(app_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count QR codes for an application.
    pub async fn count_by_app(pool: &PgPool, app_id: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM qr_codes WHERE app_id = $1")
            .bind(app_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// List the items generated by a batch in index order.
    pub async fn list_by_batch(pool: &PgPool, batch_id: &str) -> Result<Vec<QrCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM qr_codes \
             WHERE batch_id = $1 \
             ORDER BY batch_index ASC, created_at ASC"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }
}
