use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{check_quota, DurableSlot, SlotError};

/// File-backed durable slot: `<dir>/<name>.json`.
///
/// The file holds the raw string last written. A missing file reads as an
/// unset slot rather than an error.
#[derive(Clone, Debug)]
pub struct FileSlot {
    name: String,
    file_path: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileSlot {
    /// Open the slot under `dir`, creating the directory if needed.
    pub async fn open<P: AsRef<Path>>(dir: P, name: &str) -> Result<Self, SlotError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await.map_err(|e| SlotError::Io {
            slot: name.to_string(),
            message: format!("cannot create {}: {e}", dir.display()),
        })?;
        Ok(Self {
            name: name.to_string(),
            file_path: dir.join(format!("{name}.json")),
            quota_bytes: None,
        })
    }

    /// Reject writes larger than `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn io_err(&self, e: std::io::Error) -> SlotError {
        SlotError::Io { slot: self.name.clone(), message: e.to_string() }
    }
}

#[async_trait]
impl DurableSlot for FileSlot {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Option<String>, SlotError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| SlotError::Io {
                slot: self.name.clone(),
                message: format!("{} is not valid UTF-8: {e}", self.file_path.display()),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }

    async fn write(&self, contents: &str) -> Result<(), SlotError> {
        check_quota(contents, self.quota_bytes)?;
        // Write to a sibling file first so a failed write never truncates the slot.
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, contents.as_bytes()).await.map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.file_path).await.map_err(|e| self.io_err(e))?;
        debug!(slot = %self.name, bytes = contents.len(), "slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("file_slot_{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn unset_slot_reads_none_then_persists() -> Result<(), anyhow::Error> {
        let dir = temp_dir();
        let slot = FileSlot::open(&dir, "products").await?;
        assert!(slot.read().await?.is_none());

        slot.write("[]").await?;
        let reopened = FileSlot::open(&dir, "products").await?;
        assert_eq!(reopened.read().await?.as_deref(), Some("[]"));
        assert!(reopened.path().ends_with("products.json"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn quota_rejects_write_and_keeps_previous_value() -> Result<(), anyhow::Error> {
        let dir = temp_dir();
        let slot = FileSlot::open(&dir, "products").await?.with_quota(8);
        slot.write("[1,2]").await?;

        let err = slot.write("[1,2,3,4,5,6]").await.unwrap_err();
        assert!(matches!(err, SlotError::QuotaExceeded { size: 13, quota: 8 }));
        assert_eq!(slot.read().await?.as_deref(), Some("[1,2]"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_read_error() -> Result<(), anyhow::Error> {
        let dir = temp_dir();
        let slot = FileSlot::open(&dir, "products").await?;
        tokio::fs::write(slot.path(), b"[{\"name\":\"Caf\xFF\"}]").await?;

        assert!(matches!(slot.read().await, Err(SlotError::Io { .. })));

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
