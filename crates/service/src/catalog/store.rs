use std::sync::Arc;

use tracing::{debug, error, warn};

use super::product::Product;
use crate::errors::ServiceError;
use crate::storage::DurableSlot;

/// The catalog sequence plus the "record under edit" pointer, mirrored to one
/// durable slot.
///
/// Records are addressed by position only. Removing a record shifts every
/// later index down by one.
pub struct RecordStore<S: DurableSlot> {
    slot: Arc<S>,
    records: Vec<Product>,
    editing: Option<usize>,
}

impl<S: DurableSlot> RecordStore<S> {
    /// Rehydrate from the slot. Anything unreadable starts an empty catalog.
    pub async fn open(slot: Arc<S>) -> Self {
        let records = Self::load(slot.as_ref()).await;
        debug!(slot = slot.name(), count = records.len(), "catalog loaded");
        Self { slot, records, editing: None }
    }

    /// Read the slot; missing or malformed content yields an empty sequence.
    pub async fn load(slot: &S) -> Vec<Product> {
        let raw = match slot.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(slot = slot.name(), error = %e, "catalog load failed; starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Product>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(slot = slot.name(), error = %e, "catalog slot malformed; starting empty");
                Vec::new()
            }
        }
    }

    /// Write the whole sequence. On failure the in-memory records are kept
    /// as they are and the write is not retried.
    pub async fn save(&self) -> Result<(), ServiceError> {
        let data = serde_json::to_string(&self.records).map_err(|e| {
            crate::storage::SlotError::Unavailable(format!("serialize catalog: {e}"))
        })?;
        if let Err(e) = self.slot.write(&data).await {
            error!(slot = self.slot.name(), error = %e, "storage error");
            return Err(ServiceError::StorageWrite(e));
        }
        Ok(())
    }

    pub fn records(&self) -> &[Product] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.records.get(index)
    }

    pub fn add(&mut self, record: Product) {
        self.records.push(record);
    }

    /// Replace in place. Out-of-range indices are ignored.
    pub fn update(&mut self, index: usize, record: Product) -> bool {
        match self.records.get_mut(index) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove at `index`; `None` past the end.
    pub fn remove(&mut self, index: usize) -> Option<Product> {
        if index >= self.records.len() {
            return None;
        }
        let removed = self.records.remove(index);
        self.editing = match self.editing {
            Some(e) if e == index => None,
            Some(e) if e > index => Some(e - 1),
            other => other,
        };
        Some(removed)
    }

    /// Mark a record as being edited and return it for the form prefill.
    pub fn begin_edit(&mut self, index: usize) -> Option<&Product> {
        let record = self.records.get(index)?;
        self.editing = Some(index);
        Some(record)
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    /// Clear and return the edit pointer.
    pub fn take_edit(&mut self) -> Option<usize> {
        self.editing.take()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }
}
