//! In-process record store.
//!
//! Used when no `DATABASE_URL` is configured and by tests. Mirrors the
//! Postgres repositories: the same defaults for optional columns, the same
//! list ordering, and an atomic status compare-and-swap.

use std::collections::HashMap;

use async_trait::async_trait;
use office_core::qr_batch::BatchStatus;
use tokio::sync::RwLock;

use crate::models::batch_qr_code::{BatchQrCode, CreateBatchQrCode, UpdateBatchQrCode};
use crate::models::qr_code::{CreateQrCode, QrCode, UpdateQrCode};
use crate::store::{BatchStore, ItemStore, StoreError, StoreResult};

/// Rows tagged with their insertion sequence, used as the tie-breaker for
/// rows created within the same clock tick.
struct Table<T> {
    next_seq: u64,
    rows: HashMap<String, (u64, T)>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            rows: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert(&mut self, id: &str, row: T) -> bool {
        if self.rows.contains_key(id) {
            return false;
        }
        self.next_seq += 1;
        self.rows.insert(id.to_string(), (self.next_seq, row));
        true
    }

    fn get(&self, id: &str) -> Option<T> {
        self.rows.get(id).map(|(_, row)| row.clone())
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.rows.get_mut(id).map(|(_, row)| row)
    }

    fn remove(&mut self, id: &str) -> bool {
        self.rows.remove(id).is_some()
    }
}

/// A [`BatchStore`] + [`ItemStore`] held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    batches: RwLock<Table<BatchQrCode>>,
    items: RwLock<Table<QrCode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, later insertions first on equal timestamps.
fn newest_first<T>(
    table: &Table<T>,
    keep: impl Fn(&T) -> bool,
    created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<(u64, &T)> {
    let mut rows: Vec<(u64, &T)> = table
        .rows
        .values()
        .filter(|(_, row)| keep(row))
        .map(|(seq, row)| (*seq, row))
        .collect();
    rows.sort_by(|a, b| created_at(b.1).cmp(&created_at(a.1)).then(b.0.cmp(&a.0)));
    rows
}

fn page<T: Clone>(rows: Vec<(u64, &T)>, limit: i64, offset: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .map(|(_, row)| row.clone())
        .collect()
}

fn duplicate_key(table: &str, id: &str) -> StoreError {
    StoreError::Unavailable(format!("duplicate key '{id}' in {table}"))
}

#[async_trait]
impl BatchStore for MemoryStore {
    async fn create_batch(&self, input: &CreateBatchQrCode) -> StoreResult<BatchQrCode> {
        let now = chrono::Utc::now();
        let row = BatchQrCode {
            id: input.id.clone(),
            app_id: input.app_id.clone(),
            name: input.name.clone(),
            description: input.description.clone(),
            prefix: input.prefix.clone(),
            count: input.count,
            kind: input.kind.clone(),
            url_template: input.url_template.clone(),
            config: input.config.clone(),
            status: input.status.clone(),
            created_by: input.created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        let mut table = self.batches.write().await;
        if !table.insert(&row.id, row.clone()) {
            return Err(duplicate_key("batch_qr_codes", &row.id));
        }
        Ok(row)
    }

    async fn find_batch(&self, id: &str) -> StoreResult<Option<BatchQrCode>> {
        Ok(self.batches.read().await.get(id))
    }

    async fn update_batch(
        &self,
        id: &str,
        input: &UpdateBatchQrCode,
    ) -> StoreResult<Option<BatchQrCode>> {
        let mut table = self.batches.write().await;
        let Some(row) = table.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            row.name = name.clone();
        }
        if let Some(description) = &input.description {
            row.description = description.clone();
        }
        if let Some(prefix) = &input.prefix {
            row.prefix = prefix.clone();
        }
        if let Some(url_template) = &input.url_template {
            row.url_template = url_template.clone();
        }
        if let Some(config) = &input.config {
            row.config = config.clone();
        }
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }

    async fn compare_and_set_status(
        &self,
        id: &str,
        from: BatchStatus,
        to: BatchStatus,
    ) -> StoreResult<Option<BatchQrCode>> {
        let mut table = self.batches.write().await;
        match table.get_mut(id) {
            Some(row) if row.status == from.as_str() => {
                row.status = to.as_str().to_string();
                row.updated_at = chrono::Utc::now();
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_batch(&self, id: &str) -> StoreResult<bool> {
        Ok(self.batches.write().await.remove(id))
    }

    async fn list_batches(
        &self,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<BatchQrCode>, i64)> {
        let table = self.batches.read().await;
        let rows = newest_first(&table, |b| b.app_id == app_id, |b| b.created_at);
        let total = rows.len() as i64;
        Ok((page(rows, limit, offset), total))
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn create_item(&self, input: &CreateQrCode) -> StoreResult<QrCode> {
        let now = chrono::Utc::now();
        let row = QrCode {
            id: input.id.clone(),
            app_id: input.app_id.clone(),
            name: input.name.clone(),
            content: input.content.clone(),
            kind: input.kind.clone(),
            url: input.url.clone(),
            image_path: String::new(),
            batch_id: input.batch_id.clone(),
            batch_index: input.batch_index,
            created_by: input.created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        let mut table = self.items.write().await;
        if !table.insert(&row.id, row.clone()) {
            return Err(duplicate_key("qr_codes", &row.id));
        }
        Ok(row)
    }

    async fn find_item(&self, id: &str) -> StoreResult<Option<QrCode>> {
        Ok(self.items.read().await.get(id))
    }

    async fn update_item(&self, id: &str, input: &UpdateQrCode) -> StoreResult<Option<QrCode>> {
        let mut table = self.items.write().await;
        let Some(row) = table.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            row.name = name.clone();
        }
        if let Some(content) = &input.content {
            row.content = content.clone();
        }
        if let Some(url) = &input.url {
            row.url = url.clone();
        }
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_image_path(&self, id: &str, image_path: &str) -> StoreResult<Option<QrCode>> {
        let mut table = self.items.write().await;
        let Some(row) = table.get_mut(id) else {
            return Ok(None);
        };
        row.image_path = image_path.to_string();
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_item(&self, id: &str) -> StoreResult<bool> {
        Ok(self.items.write().await.remove(id))
    }

    async fn list_items(
        &self,
        app_id: &str,
        limit: i64,
        offset: i64,
    ) -> StoreResult<(Vec<QrCode>, i64)> {
        let table = self.items.read().await;
        let rows = newest_first(&table, |q| q.app_id == app_id, |q| q.created_at);
        let total = rows.len() as i64;
        Ok((page(rows, limit, offset), total))
    }

    async fn list_batch_items(&self, batch_id: &str) -> StoreResult<Vec<QrCode>> {
        let table = self.items.read().await;
        let mut rows: Vec<&(u64, QrCode)> = table
            .rows
            .values()
            .filter(|(_, q)| q.batch_id.as_deref() == Some(batch_id))
            .collect();
        rows.sort_by_key(|(seq, q)| (q.batch_index, *seq));
        Ok(rows.into_iter().map(|(_, q)| q.clone()).collect())
    }
}
