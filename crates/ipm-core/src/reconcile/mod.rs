//! Single-pass reconciliation of an address template member against the
//! host's current public IP.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐      ┌──────────────────┐      ┌──────────┐
//! │ IpProbe  │──1──▶│    Reconciler    │──4──▶│ Notifier │
//! └──────────┘      └──────────────────┘      └──────────┘
//!                       │ 2        │ 3
//!                       ▼          ▼
//!               describe_members  swap_members
//!                   (AddressSetClient)
//! ```
//!
//! 1. Discover the current public IPv4 address
//! 2. Look up the template member carrying our label (absence is fine)
//! 3. If the `/32` address differs, swap the member (pure addition when
//!    no member existed)
//! 4. Notify the operator channel, exactly one message per run
//!
//! Errors from steps 1–3 bubble to [`Reconciler::run`], which attempts one
//! best-effort failure notification and then returns the original error.
//! Notification failures themselves are never allowed to replace the run's
//! substantive outcome.

use crate::error::{Error, Result};
use crate::traits::{AddressSetClient, IpProbe, Notifier, TemplateMember};
use std::net::Ipv4Addr;
use tracing::{info, warn};

/// Result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The template member already matched the current address
    Unchanged {
        /// The discovered public address
        current: Ipv4Addr,
    },

    /// The template member was swapped (or created) for the new address
    Updated {
        /// The previous member address, if one carried our label
        previous: Option<String>,
        /// The discovered public address now in the template
        current: Ipv4Addr,
    },
}

/// Orchestrates one discover → compare → swap → notify pass
///
/// The reconciler owns no state between runs: the remote template itself is
/// the source of truth, correlated by label. It is expected to run as
/// isolated process invocations, one per scheduled trigger.
pub struct Reconciler {
    /// Public IP probe
    probe: Box<dyn IpProbe>,

    /// Remote address set client
    client: Box<dyn AddressSetClient>,

    /// Operator notification channel
    notifier: Box<dyn Notifier>,

    /// Address template to reconcile
    template_id: String,

    /// Label of the one member this tool owns
    label: String,
}

impl Reconciler {
    /// Create a new reconciler
    pub fn new(
        probe: Box<dyn IpProbe>,
        client: Box<dyn AddressSetClient>,
        notifier: Box<dyn Notifier>,
        template_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            probe,
            client,
            notifier,
            template_id: template_id.into(),
            label: label.into(),
        }
    }

    /// Run one reconciliation pass
    ///
    /// On failure, a best-effort failure notification is attempted before
    /// the error is returned; a failing notifier cannot overwrite the
    /// primary error.
    pub async fn run(&self) -> Result<Outcome> {
        match self.reconcile().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.notify_failure(&err).await;
                Err(err)
            }
        }
    }

    async fn reconcile(&self) -> Result<Outcome> {
        let current = self.probe.discover().await?;
        info!("current public IP: {current}");

        let members = self
            .client
            .describe_members(&self.template_id)
            .await
            .map_err(|e| Error::remote_lookup(format!("template {}: {e}", self.template_id)))?;

        // Correlate by label only; address equality is change detection.
        let existing = members.into_iter().find(|m| m.label == self.label);
        let desired = TemplateMember::host(current, self.label.clone());

        match existing {
            Some(member) if member.address == desired.address => {
                info!(
                    "member {:?} already holds {}, nothing to update",
                    self.label, member.address
                );
                self.notify_outcome(format!(
                    "ℹ️ auto-ipm: public IP unchanged ({current}), no update needed"
                ))
                .await;
                Ok(Outcome::Unchanged { current })
            }
            existing => {
                let previous = existing.as_ref().map(|m| m.address.clone());
                // A missing member becomes a pure addition: empty original
                // list, never an error.
                let original: Vec<TemplateMember> = existing.into_iter().collect();
                let replacement = vec![desired];

                info!(
                    "updating member {:?} in template {}: {:?} -> {}",
                    self.label, self.template_id, previous, replacement[0].address
                );

                self.client
                    .swap_members(&self.template_id, &original, &replacement)
                    .await
                    .map_err(|e| {
                        Error::remote_swap(format!("template {}: {e}", self.template_id))
                    })?;

                self.notify_outcome(format!(
                    "✅ auto-ipm: address template member updated, new IP {current}"
                ))
                .await;
                Ok(Outcome::Updated { previous, current })
            }
        }
    }

    /// Deliver the per-run status message
    ///
    /// Delivery failure is logged and swallowed: a notification problem must
    /// not fail a run whose substantive work succeeded.
    async fn notify_outcome(&self, message: String) {
        if let Err(err) = self.notifier.notify(&message).await {
            warn!("notification delivery failed: {err}");
        }
    }

    /// Best-effort failure notification
    ///
    /// Runs in its own error boundary so a secondary notification failure
    /// can never mask the primary error being propagated.
    async fn notify_failure(&self, err: &Error) {
        let message = format!("❌ auto-ipm: run failed: {err}");
        if let Err(notify_err) = self.notifier.notify(&message).await {
            warn!("failure notification could not be delivered: {notify_err}");
        }
    }
}
