use std::sync::Arc;

use chrono::Utc;
use common::types::{Notice, DEFAULT_NOTICE_TTL_MS};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::image::encode_data_url;
use super::product::{ImageUpload, Product, ProductForm};
use super::search::search;
use super::store::RecordStore;
use super::validation::validate_form;
use super::view::{catalog_view, edit_form, CatalogView, EditForm};
use crate::errors::ServiceError;
use crate::storage::DurableSlot;

pub const ADDED_MESSAGE: &str = "Product added successfully!";
pub const UPDATED_MESSAGE: &str = "Product updated successfully!";
pub const DELETED_MESSAGE: &str = "Product deleted successfully!";
pub const EDITING_MESSAGE: &str = "Editing product. Make changes and click Update";
pub const SAVE_FAILED_MESSAGE: &str = "Error saving products. Storage may be full.";

/// A result plus the banner to show for it.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    pub notice: Notice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Submitted {
    Added { index: usize },
    Updated { index: usize },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Deleted {
    pub index: usize,
    pub name: String,
}

/// Form-handling entry points over the record store.
///
/// Every operation holds the store lock for its full duration, so handlers
/// never interleave.
pub struct CatalogService<S: DurableSlot> {
    store: Mutex<RecordStore<S>>,
    notice_ttl_ms: u64,
}

impl<S: DurableSlot> CatalogService<S> {
    pub async fn open(slot: Arc<S>) -> Arc<Self> {
        Self::open_with_ttl(slot, DEFAULT_NOTICE_TTL_MS).await
    }

    pub async fn open_with_ttl(slot: Arc<S>, notice_ttl_ms: u64) -> Arc<Self> {
        let store = RecordStore::open(slot).await;
        Arc::new(Self { store: Mutex::new(store), notice_ttl_ms })
    }

    fn notice(&self, notice: Notice) -> Notice {
        notice.with_ttl(self.notice_ttl_ms)
    }

    /// Validate, then add a record or replace the one under edit, then persist.
    ///
    /// A failed write keeps the change in memory and reports a danger notice
    /// instead of an error.
    pub async fn submit(
        &self,
        form: ProductForm,
        image: Option<ImageUpload>,
    ) -> Result<Outcome<Submitted>, ServiceError> {
        if let Err(errors) = validate_form(&form, image.as_ref()) {
            warn!(event = "validation_failed", fields = errors.fields.len(), "product form rejected");
            return Err(errors.into());
        }
        let upload = image.ok_or_else(|| ServiceError::not_found("image"))?;

        let record = Product {
            name: form.name.trim().to_string(),
            price: form.price,
            category: form.category.trim().to_string(),
            description: form.description,
            image: encode_data_url(&upload),
            file_name: upload.file_name,
            id: Utc::now().timestamp_millis(),
        };

        let mut store = self.store.lock().await;
        let submitted = match store.take_edit() {
            Some(index) if index < store.len() => {
                store.update(index, record);
                Submitted::Updated { index }
            }
            _ => {
                store.add(record);
                Submitted::Added { index: store.len() - 1 }
            }
        };
        info!(event = "product_saved", ?submitted, "catalog mutated");

        let notice = match store.save().await {
            Ok(()) => match submitted {
                Submitted::Added { .. } => Notice::success(ADDED_MESSAGE),
                Submitted::Updated { .. } => Notice::success(UPDATED_MESSAGE),
            },
            Err(_) => Notice::danger(SAVE_FAILED_MESSAGE),
        };
        Ok(Outcome { value: submitted, notice: self.notice(notice) })
    }

    /// Point the edit cursor at `index` and return the prefill.
    pub async fn begin_edit(&self, index: usize) -> Result<Outcome<EditForm>, ServiceError> {
        let mut store = self.store.lock().await;
        let form = store
            .begin_edit(index)
            .map(|p| edit_form(index, p))
            .ok_or_else(|| ServiceError::not_found("product"))?;
        Ok(Outcome { value: form, notice: self.notice(Notice::info(EDITING_MESSAGE)) })
    }

    pub async fn cancel_edit(&self) -> CatalogView {
        let mut store = self.store.lock().await;
        store.cancel_edit();
        catalog_view(&search(store.records(), ""), "", None)
    }

    /// Remove the record at `index` and persist. Unknown indices write nothing.
    pub async fn delete(&self, index: usize) -> Result<Outcome<Deleted>, ServiceError> {
        let mut store = self.store.lock().await;
        let removed = store.remove(index).ok_or_else(|| ServiceError::not_found("product"))?;
        info!(event = "product_deleted", index, "catalog mutated");
        let notice = match store.save().await {
            Ok(()) => Notice::success(DELETED_MESSAGE),
            Err(_) => Notice::danger(SAVE_FAILED_MESSAGE),
        };
        Ok(Outcome { value: Deleted { index, name: removed.name }, notice: self.notice(notice) })
    }

    pub async fn search(&self, query: &str) -> CatalogView {
        let store = self.store.lock().await;
        catalog_view(&search(store.records(), query), query, store.editing())
    }

    pub async fn view(&self) -> CatalogView {
        self.search("").await
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn records(&self) -> Vec<Product> {
        self.store.lock().await.records().to_vec()
    }
}
