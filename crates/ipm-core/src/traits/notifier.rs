// # Notifier Trait
//
// Defines the interface for delivering plain-text status messages to an
// operator channel.
//
// ## Implementations
//
// - Feishu-style text webhook: `ipm-notify-feishu` crate
// - [`NoopNotifier`]: used when no channel is configured

use async_trait::async_trait;

/// Trait for notification channel implementations
///
/// Delivery failures surface as [`crate::Error::Notification`]; whether that
/// failure matters is the caller's decision. The reconciler treats it as
/// never terminal and logs it instead of letting it mask the run's real
/// outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a plain-text message to the operator channel
    async fn notify(&self, message: &str) -> Result<(), crate::Error>;
}

/// Notifier used when no webhook endpoint is configured
///
/// Messages are dropped with a debug log; delivery never fails.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, message: &str) -> Result<(), crate::Error> {
        tracing::debug!("no notification channel configured, dropping: {message}");
        Ok(())
    }
}
