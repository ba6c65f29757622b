//! Idempotent periodic-job management over a line-oriented schedule store.
//!
//! The store (normally the user crontab) is an ordered sequence of opaque
//! lines. Lines containing [`OWNED_MARKER`] are owned by this tool; every
//! other line is foreign and passes through all mutations byte-for-byte, in
//! order. Owned entries invoke the tool's own executable, so a host needs no
//! external scheduler configuration beyond `schedule add`.
//!
//! Every operation is one read-modify-write over the whole store with no
//! intermediate states. The store is not locked: two processes racing
//! `add`/`remove` can lose an update.

mod crontab;
mod memory;
mod store;

pub use crontab::CrontabStore;
pub use memory::MemoryScheduleStore;
pub use store::ScheduleStore;

use crate::error::{Error, Result};
use tracing::info;

/// Marker substring identifying schedule lines owned by this tool
///
/// The installed command embeds the binary path, which carries this marker
/// for any normal install.
pub const OWNED_MARKER: &str = "auto-ipm";

/// Field count of a cron-style schedule expression
const SCHEDULE_FIELDS: usize = 5;

/// One owned schedule line, split positionally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// 5-field cron-style expression
    pub schedule: String,

    /// Everything after the schedule fields
    pub command: String,
}

/// Manages this tool's periodic-job entries in a schedule store
pub struct ScheduleManager {
    store: Box<dyn ScheduleStore>,
    command: String,
}

impl ScheduleManager {
    /// Create a manager whose installed entries invoke the current executable
    pub fn new(store: Box<dyn ScheduleStore>) -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| {
            Error::schedule_store(format!("cannot resolve own executable path: {e}"))
        })?;
        Ok(Self::with_command(store, exe.display().to_string()))
    }

    /// Create a manager with an explicit command (embedding, tests)
    pub fn with_command(store: Box<dyn ScheduleStore>, command: impl Into<String>) -> Self {
        Self {
            store,
            command: command.into(),
        }
    }

    /// List the owned schedule entries, in store order
    pub async fn list(&self) -> Result<Vec<ScheduleEntry>> {
        let contents = self.store.read().await?.unwrap_or_default();
        Ok(contents
            .lines()
            .filter(|line| is_owned(line))
            .map(parse_entry)
            .collect())
    }

    /// Install a periodic job for the given schedule expression
    ///
    /// Idempotent: an owned entry with an identical schedule already present
    /// makes this a no-op. The expression is validated before the store is
    /// touched.
    pub async fn add(&self, schedule: &str) -> Result<()> {
        validate_expression(schedule)?;

        let contents = self.store.read().await?.unwrap_or_default();
        let already_installed = contents
            .lines()
            .filter(|line| is_owned(line))
            .map(parse_entry)
            .any(|entry| entry.schedule == schedule);
        if already_installed {
            info!("schedule {schedule:?} is already installed");
            return Ok(());
        }

        let mut lines: Vec<&str> = contents.lines().collect();
        let entry = format!("{schedule} {}", self.command);
        lines.push(&entry);
        let mut updated = lines.join("\n");
        updated.push('\n');

        self.store.write(&updated).await?;
        info!("schedule installed: {schedule}");
        Ok(())
    }

    /// Remove every owned entry
    ///
    /// Foreign lines are written back untouched; when none remain the store
    /// is cleared entirely rather than left holding zero lines.
    pub async fn remove(&self) -> Result<()> {
        let Some(contents) = self.store.read().await? else {
            info!("no scheduled jobs found");
            return Ok(());
        };
        if !contents.lines().any(|line| is_owned(line)) {
            info!("no scheduled jobs found");
            return Ok(());
        }

        let remaining: Vec<&str> = contents
            .lines()
            .filter(|line| !is_owned(line))
            .collect();

        if remaining.iter().any(|line| !line.trim().is_empty()) {
            let mut updated = remaining.join("\n");
            updated.push('\n');
            self.store.write(&updated).await?;
        } else {
            self.store.clear().await?;
        }

        info!("scheduled jobs removed");
        Ok(())
    }

    /// Log the owned entries
    pub async fn display(&self) -> Result<()> {
        let entries = self.list().await?;
        if entries.is_empty() {
            info!("no scheduled jobs found");
        } else {
            for entry in entries {
                info!("{} {}", entry.schedule, entry.command);
            }
        }
        Ok(())
    }
}

/// Check that an expression splits into exactly five whitespace-delimited
/// fields
pub fn validate_expression(schedule: &str) -> Result<()> {
    let fields = schedule.split_whitespace().count();
    if fields != SCHEDULE_FIELDS {
        return Err(Error::invalid_expression(format!(
            "expected {SCHEDULE_FIELDS} fields, got {fields}: {schedule:?}"
        )));
    }
    Ok(())
}

fn is_owned(line: &str) -> bool {
    line.contains(OWNED_MARKER)
}

/// Positional split: fields 0–4 are the schedule, the rest is the command
fn parse_entry(line: &str) -> ScheduleEntry {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let schedule = fields[..fields.len().min(SCHEDULE_FIELDS)].join(" ");
    let command = fields
        .get(SCHEDULE_FIELDS..)
        .unwrap_or_default()
        .join(" ");
    ScheduleEntry { schedule, command }
}
