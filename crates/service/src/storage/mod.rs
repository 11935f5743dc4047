//! Storage abstractions for service layer
//!
//! A durable slot is one named persistent location holding a single string
//! value. The catalog keeps its whole JSON array in one slot.

pub mod file_slot;
pub mod memory_slot;

use async_trait::async_trait;
use thiserror::Error;

pub use file_slot::FileSlot;
pub use memory_slot::MemorySlot;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("io error on slot {slot}: {message}")]
    Io { slot: String, message: String },
    #[error("quota exceeded: {size} bytes, limit {quota}")]
    QuotaExceeded { size: usize, quota: usize },
    #[error("slot unavailable: {0}")]
    Unavailable(String),
}

/// One named key-value location. `read` yields `None` when nothing was ever written.
#[async_trait]
pub trait DurableSlot: Send + Sync {
    fn name(&self) -> &str;
    async fn read(&self) -> Result<Option<String>, SlotError>;
    async fn write(&self, contents: &str) -> Result<(), SlotError>;
}

pub(crate) fn check_quota(contents: &str, quota: Option<usize>) -> Result<(), SlotError> {
    match quota {
        Some(quota) if contents.len() > quota => {
            Err(SlotError::QuotaExceeded { size: contents.len(), quota })
        }
        _ => Ok(()),
    }
}
