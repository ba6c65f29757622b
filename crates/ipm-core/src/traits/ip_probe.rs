// # IP Probe Trait
//
// Defines the interface for resolving the host's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP fallback list: `ipm-ip-http` crate
// - Future: STUN, router status queries
//
// ## Usage
//
// ```rust,ignore
// use ipm_core::IpProbe;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let probe = /* IpProbe implementation */;
//     let ip = probe.discover().await?;
//     println!("public IP: {ip}");
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public IP probe implementations
///
/// A probe resolves the host's public IPv4 address from whatever sources it
/// has available. Probes are **observers**: they must not mutate remote
/// state, decide whether an update is needed, or retry beyond their own
/// source fallback.
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait IpProbe: Send + Sync {
    /// Resolve the current public IPv4 address
    ///
    /// Implementations try their sources in order and return the first
    /// valid address. Once every source has failed they return
    /// [`crate::Error::DiscoveryExhausted`].
    ///
    /// The returned address is ephemeral: it is consumed by one
    /// reconciliation run and never persisted.
    async fn discover(&self) -> Result<Ipv4Addr, crate::Error>;
}
