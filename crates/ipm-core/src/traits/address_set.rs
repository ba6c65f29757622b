// # Address Set Client Trait
//
// Defines the interface for the remote address template: a cloud-side named
// set of IP/CIDR allow-list entries, each tagged with a human-readable
// label.
//
// ## Implementations
//
// - Tencent Cloud VPC address templates: `ipm-provider-tencent` crate
//
// ## Correlation model
//
// The remote set has no stable identifier beyond the label, so the label is
// the correlation key across runs. Address equality is only ever the
// change-detection comparison, never the identity comparison.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// One labeled entry inside an address template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMember {
    /// CIDR address string (e.g. "203.0.113.5/32")
    pub address: String,

    /// Human-readable label; the stable correlation key
    pub label: String,
}

impl TemplateMember {
    /// Create a member from raw parts
    pub fn new(address: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: label.into(),
        }
    }

    /// Create a single-host member (`<ip>/32`) for the given label
    pub fn host(ip: Ipv4Addr, label: impl Into<String>) -> Self {
        Self {
            address: format!("{ip}/32"),
            label: label.into(),
        }
    }
}

/// Trait for remote address set implementations
///
/// Two logical operations: describe the template's members, and swap one
/// member set for another. The core is agnostic to transport and
/// authentication details.
///
/// Implementations are **single-shot**: one API call per method, full error
/// propagation, no retry or backoff of their own.
#[async_trait]
pub trait AddressSetClient: Send + Sync {
    /// List the members of an address template
    ///
    /// A template that does not exist, or exists without member data, yields
    /// an empty list; absence is not an error at this seam.
    async fn describe_members(
        &self,
        template_id: &str,
    ) -> Result<Vec<TemplateMember>, crate::Error>;

    /// Atomically replace `original` members with `replacement` members
    ///
    /// An empty `original` list performs a pure addition; callers use this
    /// when no member carries their label yet.
    async fn swap_members(
        &self,
        template_id: &str,
        original: &[TemplateMember],
        replacement: &[TemplateMember],
    ) -> Result<(), crate::Error>;
}
