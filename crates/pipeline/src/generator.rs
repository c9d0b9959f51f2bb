//! Batch generation orchestrator.
//!
//! `generate` drives one batch through its lifecycle:
//!
//! 1. Claim the batch with a `pending -> generating` compare-and-swap, so
//!    concurrent calls on the same batch cannot both produce items.
//! 2. Persist items `1..=count` strictly in order. The first persistence
//!    failure aborts the run and marks the batch `failed`; items created
//!    before it are kept.
//! 3. Render an image per item with bounded concurrency. Render failures are
//!    logged and reported but never abort the run or change the status.
//! 4. Mark the batch `completed`.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use office_core::error::CoreError;
use office_core::ids::generate_qr_code_id;
use office_core::qr_batch::{self, BatchKind, BatchStatus};
use office_core::templating::{self, DEFAULT_FALLBACK_BASE_URL};
use office_db::models::batch_qr_code::BatchQrCode;
use office_db::models::qr_code::{CreateQrCode, QrCode};
use office_db::{BatchStore, ItemStore, StoreError};

use crate::renderer::{render_and_record, ImageRenderer};
use crate::store_failure;

/// Default number of images rendered concurrently.
pub const DEFAULT_RENDER_CONCURRENCY: usize = 8;

/// Tunables for [`BatchGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Base URL for item content when a batch has no URL template.
    pub fallback_base_url: String,
    /// Maximum number of images rendered at once.
    pub render_concurrency: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fallback_base_url: DEFAULT_FALLBACK_BASE_URL.to_string(),
            render_concurrency: DEFAULT_RENDER_CONCURRENCY,
        }
    }
}

/// An item whose image could not be rendered or recorded.
#[derive(Debug, Clone)]
pub struct RenderFailure {
    pub qr_code_id: String,
    pub batch_index: i32,
    pub error: String,
}

/// A terminal status that could not be persisted.
#[derive(Debug, Clone)]
pub struct StatusWriteFailure {
    pub target: BatchStatus,
    pub error: String,
}

/// Outcome of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Batch snapshot after the final status transition.
    pub batch: BatchQrCode,
    /// All generated items in index order, including those without an image.
    pub items: Vec<QrCode>,
    pub render_failures: Vec<RenderFailure>,
    pub status_write_failures: Vec<StatusWriteFailure>,
}

/// Materialises batch definitions into persisted, rendered QR codes.
pub struct BatchGenerator {
    batches: Arc<dyn BatchStore>,
    items: Arc<dyn ItemStore>,
    renderer: Arc<dyn ImageRenderer>,
    config: GeneratorConfig,
}

impl BatchGenerator {
    pub fn new(
        batches: Arc<dyn BatchStore>,
        items: Arc<dyn ItemStore>,
        renderer: Arc<dyn ImageRenderer>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            batches,
            items,
            renderer,
            config,
        }
    }

    /// Generate every QR code for `batch_id`.
    ///
    /// Errors: `NotFound` for an unknown batch, `Conflict` when the batch is
    /// not `pending`, `GenerationFailed` when an item could not be persisted.
    /// A successful return may still contain items with an empty
    /// `image_path`; see [`GenerationReport::render_failures`].
    pub async fn generate(&self, batch_id: &str) -> Result<GenerationReport, CoreError> {
        let batch = self
            .batches
            .find_batch(batch_id)
            .await
            .map_err(store_failure("load batch QR code"))?
            .ok_or_else(|| CoreError::NotFound {
                entity: "BatchQrCode",
                id: batch_id.to_string(),
            })?;

        let kind = batch.kind()?;
        let count = qr_batch::validate_count(i64::from(batch.count))? as u32;
        batch.status()?.transition(BatchStatus::Generating)?;

        let claimed = self
            .batches
            .compare_and_set_status(batch_id, BatchStatus::Pending, BatchStatus::Generating)
            .await
            .map_err(store_failure("claim batch QR code"))?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Batch {batch_id} is already being generated or has finished"
                ))
            })?;

        tracing::info!(batch_id, count, kind = kind.as_str(), "Batch generation started");

        let mut status_write_failures = Vec::new();

        let items = match self.persist_items(&claimed, kind, count).await {
            Ok(items) => items,
            Err(_) => {
                self.finish(&claimed, BatchStatus::Failed, &mut status_write_failures)
                    .await;
                return Err(CoreError::GenerationFailed {
                    batch_id: batch_id.to_string(),
                });
            }
        };

        let (items, render_failures) = self.render_items(items).await;

        let batch = self
            .finish(&claimed, BatchStatus::Completed, &mut status_write_failures)
            .await;

        tracing::info!(
            batch_id,
            generated = items.len(),
            render_failures = render_failures.len(),
            "Batch generation completed"
        );

        Ok(GenerationReport {
            batch,
            items,
            render_failures,
            status_write_failures,
        })
    }

    /// Create items `1..=count` in ascending order, stopping at the first
    /// failure.
    async fn persist_items(
        &self,
        batch: &BatchQrCode,
        kind: BatchKind,
        count: u32,
    ) -> Result<Vec<QrCode>, StoreError> {
        let mut created = Vec::with_capacity(count as usize);

        for index in 1..=count {
            let derived = templating::render_item(
                &batch.prefix,
                &batch.name,
                &batch.url_template,
                &self.config.fallback_base_url,
                &batch.id,
                index,
            );
            let input = CreateQrCode {
                id: generate_qr_code_id(),
                app_id: batch.app_id.clone(),
                name: derived.name,
                content: derived.content,
                kind: kind.as_str().to_string(),
                url: derived.url,
                batch_id: Some(batch.id.clone()),
                batch_index: Some(index as i32),
                created_by: batch.created_by.clone(),
            };

            match self.items.create_item(&input).await {
                Ok(qr_code) => created.push(qr_code),
                Err(err) => {
                    tracing::error!(
                        batch_id = %batch.id,
                        index,
                        persisted = created.len(),
                        error = %err,
                        "Failed to create QR code, aborting batch generation"
                    );
                    return Err(err);
                }
            }
        }

        Ok(created)
    }

    /// Render every item, at most `render_concurrency` at a time. Output
    /// order matches input order.
    async fn render_items(&self, items: Vec<QrCode>) -> (Vec<QrCode>, Vec<RenderFailure>) {
        let results: Vec<(QrCode, Option<RenderFailure>)> = stream::iter(items)
            .map(|item| self.render_one(item))
            .buffered(self.config.render_concurrency.max(1))
            .collect()
            .await;

        let mut rendered = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (item, failure) in results {
            rendered.push(item);
            failures.extend(failure);
        }
        (rendered, failures)
    }

    async fn render_one(&self, item: QrCode) -> (QrCode, Option<RenderFailure>) {
        match render_and_record(self.renderer.as_ref(), self.items.as_ref(), &item).await {
            Ok(updated) => (updated, None),
            Err(err) => {
                tracing::warn!(
                    qr_code_id = %item.id,
                    batch_index = ?item.batch_index,
                    error = %err,
                    "Failed to render QR code image, continuing"
                );
                let failure = RenderFailure {
                    qr_code_id: item.id.clone(),
                    batch_index: item.batch_index.unwrap_or_default(),
                    error: err.to_string(),
                };
                (item, Some(failure))
            }
        }
    }

    /// Move the claimed batch to a terminal status.
    ///
    /// Write failures are logged and recorded rather than returned: the items
    /// are already committed and the caller still needs the outcome. On
    /// failure the returned snapshot is the last one the store confirmed.
    async fn finish(
        &self,
        claimed: &BatchQrCode,
        target: BatchStatus,
        failures: &mut Vec<StatusWriteFailure>,
    ) -> BatchQrCode {
        match self
            .batches
            .compare_and_set_status(&claimed.id, BatchStatus::Generating, target)
            .await
        {
            Ok(Some(batch)) => batch,
            Ok(None) => {
                tracing::error!(
                    batch_id = %claimed.id,
                    status = %target,
                    "Batch left 'generating' during generation, status not updated"
                );
                failures.push(StatusWriteFailure {
                    target,
                    error: "batch is no longer in 'generating'".to_string(),
                });
                claimed.clone()
            }
            Err(err) => {
                tracing::error!(
                    batch_id = %claimed.id,
                    status = %target,
                    error = %err,
                    "Failed to update batch status"
                );
                failures.push(StatusWriteFailure {
                    target,
                    error: err.to_string(),
                });
                claimed.clone()
            }
        }
    }
}
