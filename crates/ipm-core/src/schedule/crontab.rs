// # Crontab Store
//
// Schedule store backed by the system `crontab` binary.
//
// ## Behavior
//
// - `read`: `crontab -l`; a non-zero exit means the user has no crontab
//   installed, which maps to `None` rather than an error
// - `write`: `crontab -` with the new contents on stdin
// - `clear`: `crontab -r`, removing the crontab entirely

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::Error;
use crate::schedule::store::ScheduleStore;

/// Schedule store backed by the user crontab
#[derive(Debug, Clone)]
pub struct CrontabStore {
    /// Binary to invoke; overridable for sandboxed environments
    crontab_bin: String,
}

impl CrontabStore {
    /// Create a store invoking the system `crontab`
    pub fn new() -> Self {
        Self {
            crontab_bin: "crontab".to_string(),
        }
    }

    /// Create a store invoking an alternate crontab binary
    pub fn with_binary(crontab_bin: impl Into<String>) -> Self {
        Self {
            crontab_bin: crontab_bin.into(),
        }
    }
}

impl Default for CrontabStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleStore for CrontabStore {
    async fn read(&self) -> Result<Option<String>, Error> {
        let output = Command::new(&self.crontab_bin)
            .arg("-l")
            .output()
            .await
            .map_err(|e| {
                Error::schedule_store(format!("failed to run {} -l: {e}", self.crontab_bin))
            })?;

        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            // crontab -l exits non-zero when no crontab is installed
            tracing::debug!(
                "{} -l exited with {}: treating as absent crontab",
                self.crontab_bin,
                output.status
            );
            Ok(None)
        }
    }

    async fn write(&self, contents: &str) -> Result<(), Error> {
        let mut child = Command::new(&self.crontab_bin)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                Error::schedule_store(format!("failed to run {} -: {e}", self.crontab_bin))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::schedule_store("crontab stdin unavailable"))?;
        stdin
            .write_all(contents.as_bytes())
            .await
            .map_err(|e| Error::schedule_store(format!("failed to write crontab: {e}")))?;
        drop(stdin);

        let output = child.wait_with_output().await.map_err(|e| {
            Error::schedule_store(format!("failed to wait for {}: {e}", self.crontab_bin))
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::schedule_store(format!(
                "{} - exited with {}: {}",
                self.crontab_bin,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    async fn clear(&self) -> Result<(), Error> {
        let output = Command::new(&self.crontab_bin)
            .arg("-r")
            .output()
            .await
            .map_err(|e| {
                Error::schedule_store(format!("failed to run {} -r: {e}", self.crontab_bin))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::schedule_store(format!(
                "{} -r exited with {}: {}",
                self.crontab_bin,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}
