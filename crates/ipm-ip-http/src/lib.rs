// # HTTP IP Probe
//
// This crate resolves the host's public IPv4 address by querying external
// lookup services over HTTP.
//
// ## Fallback model
//
// Public IP lookup services are unreliable: they rate-limit, go down, and
// change response formats. The probe walks a fixed, ordered provider list
// and returns the first valid address; a per-request timeout bounds total
// latency to `providers × timeout` in the worst case.
//
// Any single provider failure (transport error, timeout, non-success
// status, unparseable body, out-of-range octets) just moves the walk to the
// next provider. Only a fully exhausted list is an error.
//
// ## Body parsing
//
// Services return anything from a bare address to a whole info page, so the
// probe extracts the first dotted-quad substring from the body and then
// validates each octet. A body whose first dotted-quad is invalid fails the
// provider; later substrings are not scanned.

use ipm_core::{Error, IpProbe, Result};
use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default public IP lookup services, tried in order
pub const DEFAULT_IP_SERVICES: &[&str] = &[
    "https://cip.cc",
    "https://ip.cn",
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://icanhazip.com",
];

/// First dotted-quad numeric substring in a response body
static DOTTED_QUAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)\.(\d+)").expect("valid pattern"));

/// HTTP-based public IP probe with ordered provider fallback
pub struct HttpIpProbe {
    /// Provider endpoints, tried in order
    services: Vec<String>,

    /// HTTP client (carries the per-request timeout)
    client: reqwest::Client,
}

impl HttpIpProbe {
    /// Create a probe over the built-in provider list
    pub fn new() -> Self {
        Self::with_services(
            DEFAULT_IP_SERVICES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_TIMEOUT,
        )
    }

    /// Create a probe with a custom provider list and timeout
    pub fn with_services(services: Vec<String>, timeout: Duration) -> Self {
        Self {
            services,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("auto-ipm/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Query one provider; any failure mode yields `None`
    async fn fetch_one(&self, url: &str) -> Option<Ipv4Addr> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("IP service {url} request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!("IP service {url} returned {}", response.status());
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("IP service {url} body read failed: {e}");
                return None;
            }
        };

        match extract_ipv4(&body) {
            Some(ip) => Some(ip),
            None => {
                warn!("IP service {url} returned no usable IPv4 address");
                None
            }
        }
    }
}

impl Default for HttpIpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IpProbe for HttpIpProbe {
    async fn discover(&self) -> Result<Ipv4Addr> {
        for url in &self.services {
            if let Some(ip) = self.fetch_one(url).await {
                info!("resolved public IP {ip} via {url}");
                return Ok(ip);
            }
        }

        Err(Error::DiscoveryExhausted)
    }
}

/// Extract and validate the first dotted-quad substring of `body`
///
/// Validation is per-octet (0–255); a first match with an out-of-range
/// octet rejects the whole body.
fn extract_ipv4(body: &str) -> Option<Ipv4Addr> {
    let caps = DOTTED_QUAD.captures(body)?;
    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = caps.get(i + 1)?.as_str().parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}
