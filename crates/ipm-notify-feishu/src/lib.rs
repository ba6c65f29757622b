// # Feishu Webhook Notifier
//
// Delivers plain-text status messages to a Feishu custom-bot webhook.
//
// ## Wire format
//
// ```http
// POST <webhook-url>
// Content-Type: application/json
//
// {"msg_type": "text", "content": {"text": "<message>"}}
// ```
//
// Any 2xx status counts as delivered; everything else (including transport
// errors) surfaces as a notification error. Whether that failure matters is
// the caller's decision: the reconciler logs it and keeps unwinding.
//
// ## Security
//
// The webhook URL embeds a bot token, so it never appears in logs or
// `Debug` output.

use async_trait::async_trait;
use ipm_core::{Error, Notifier, Result};
use serde::Serialize;
use std::time::Duration;

/// Default HTTP timeout for webhook delivery
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Text-message payload for the webhook
#[derive(Serialize)]
struct TextMessage<'a> {
    msg_type: &'static str,
    content: TextContent<'a>,
}

#[derive(Serialize)]
struct TextContent<'a> {
    text: &'a str,
}

/// Feishu webhook notification channel
pub struct FeishuNotifier {
    /// Webhook endpoint, token included
    /// ⚠️ NEVER log this value
    webhook_url: String,

    /// HTTP client for delivery
    client: reqwest::Client,
}

// Custom Debug implementation that hides the webhook token
impl std::fmt::Debug for FeishuNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeishuNotifier")
            .field("webhook_url", &"<REDACTED>")
            .finish()
    }
}

impl FeishuNotifier {
    /// Create a notifier for the given webhook URL
    ///
    /// An empty URL is rejected here; callers that have no URL at all should
    /// use [`ipm_core::NoopNotifier`] instead.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let webhook_url = webhook_url.into();
        if webhook_url.is_empty() {
            return Err(Error::notification("webhook URL cannot be empty"));
        }

        Ok(Self {
            webhook_url,
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl Notifier for FeishuNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let payload = TextMessage {
            msg_type: "text",
            content: TextContent { text: message },
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::notification(format!("webhook request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::notification(format!(
                "webhook returned {}",
                response.status()
            )));
        }

        tracing::debug!("notification delivered");
        Ok(())
    }
}
