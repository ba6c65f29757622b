// # Schedule Store Trait
//
// Defines the interface for the line-oriented schedule store the
// [`ScheduleManager`](crate::schedule::ScheduleManager) mutates.
//
// ## Implementations
//
// - System crontab: [`CrontabStore`](crate::schedule::CrontabStore)
// - In-memory: [`MemoryScheduleStore`](crate::schedule::MemoryScheduleStore)
//
// The store distinguishes "absent" (`None`) from "present but empty"
// (`Some("")`): a user with no crontab installed is not the same thing as a
// user with an empty one, and `clear` removes the store rather than writing
// zero lines into it.

use async_trait::async_trait;

/// Trait for schedule store implementations
///
/// Every mutation performed through this trait is a whole-store replacement;
/// there are no partial writes. Nothing here takes a lock: two processes
/// racing `read`/`write` on the same store can lose an update.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Read the full store contents
    ///
    /// Returns `None` when the store is absent.
    async fn read(&self) -> Result<Option<String>, crate::Error>;

    /// Replace the store contents
    async fn write(&self, contents: &str) -> Result<(), crate::Error>;

    /// Remove the store entirely
    async fn clear(&self) -> Result<(), crate::Error>;
}
