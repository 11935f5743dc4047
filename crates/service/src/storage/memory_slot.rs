use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{check_quota, DurableSlot, SlotError};

/// In-process slot for tests and ephemeral runs.
///
/// `fail_writes(true)` makes every write fail with `Unavailable` until reset.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
    quota_bytes: Option<usize>,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-existing value, as if written by an earlier run.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self { value: Mutex::new(Some(value.into())), ..Self::default() }
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Option<String> {
        self.value.lock().map(|v| v.clone()).unwrap_or(None)
    }
}

#[async_trait]
impl DurableSlot for MemorySlot {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self) -> Result<Option<String>, SlotError> {
        self.value
            .lock()
            .map(|v| v.clone())
            .map_err(|e| SlotError::Unavailable(e.to_string()))
    }

    async fn write(&self, contents: &str) -> Result<(), SlotError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SlotError::Unavailable("simulated storage failure".into()));
        }
        check_quota(contents, self.quota_bytes)?;
        let mut guard = self.value.lock().map_err(|e| SlotError::Unavailable(e.to_string()))?;
        *guard = Some(contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
