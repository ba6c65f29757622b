// # Memory Schedule Store
//
// In-memory implementation of `ScheduleStore` (not persistent).
//
// Useful for tests and embedding; models the absent/present distinction the
// crontab store has (`None` vs `Some("")`).

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::Error;
use crate::schedule::store::ScheduleStore;

/// In-memory schedule store
///
/// Clones share contents, so a test can keep a handle to a store it handed
/// to a [`ScheduleManager`](crate::schedule::ScheduleManager).
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryScheduleStore {
    /// Create an absent store (no crontab installed)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with contents
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    /// Current contents, for inspection
    pub async fn snapshot(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    async fn read(&self) -> Result<Option<String>, Error> {
        Ok(self.contents.lock().await.clone())
    }

    async fn write(&self, contents: &str) -> Result<(), Error> {
        *self.contents.lock().await = Some(contents.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        *self.contents.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_absent_until_written() {
        let store = MemoryScheduleStore::new();
        assert_eq!(store.read().await.unwrap(), None);

        store.write("0 * * * * /bin/true\n").await.unwrap();
        assert_eq!(
            store.read().await.unwrap().as_deref(),
            Some("0 * * * * /bin/true\n")
        );
    }

    #[tokio::test]
    async fn test_clear_is_absent_not_empty() {
        let store = MemoryScheduleStore::with_contents("");
        assert_eq!(store.read().await.unwrap().as_deref(), Some(""));

        store.clear().await.unwrap();
        assert_eq!(store.read().await.unwrap(), None);
    }
}
