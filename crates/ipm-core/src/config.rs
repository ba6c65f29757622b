//! Configuration types for the auto-ipm system
//!
//! This module defines all configuration structures used throughout the
//! crate. Loading (environment variables) lives in the binary; validation
//! lives here so embedders get the same checks.

use serde::{Deserialize, Serialize};

/// Main auto-ipm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpmConfig {
    /// Cloud API credentials and region
    pub cloud: CloudConfig,

    /// Address template to reconcile
    pub template: TemplateConfig,

    /// Operator notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Public IP discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl IpmConfig {
    /// Validate the configuration
    ///
    /// Every required field must be non-blank before any network call is
    /// attempted. The webhook URL is the one optional field: its absence
    /// degrades notification to a no-op.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.cloud.validate()?;
        self.template.validate()?;
        self.discovery.validate()?;
        Ok(())
    }
}

/// Cloud API credential pair and region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// API secret id
    pub secret_id: String,

    /// API secret key
    pub secret_key: String,

    /// Region the address template lives in (e.g. "ap-guangzhou")
    pub region: String,
}

impl CloudConfig {
    /// Validate the cloud configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.secret_id.is_empty() {
            return Err(crate::Error::config("cloud secret id cannot be empty"));
        }
        if self.secret_key.is_empty() {
            return Err(crate::Error::config("cloud secret key cannot be empty"));
        }
        if self.region.is_empty() {
            return Err(crate::Error::config("cloud region cannot be empty"));
        }
        Ok(())
    }
}

/// Address template identity and the label of the managed member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Address template id (e.g. "ipm-xxxxxxxx")
    pub template_id: String,

    /// Label correlating the one member this tool owns across runs
    pub member_label: String,
}

impl TemplateConfig {
    /// Validate the template configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.template_id.is_empty() {
            return Err(crate::Error::config("address template id cannot be empty"));
        }
        if self.member_label.is_empty() {
            return Err(crate::Error::config("member label cannot be empty"));
        }
        Ok(())
    }
}

/// Operator notification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook URL; `None` disables notification delivery
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Public IP discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Ordered provider endpoints; empty selects the built-in list
    #[serde(default)]
    pub providers: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_discovery_timeout_secs")]
    pub timeout_secs: u64,
}

impl DiscoveryConfig {
    /// Validate the discovery configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("discovery timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            timeout_secs: default_discovery_timeout_secs(),
        }
    }
}

fn default_discovery_timeout_secs() -> u64 {
    5
}
