// # Tencent Cloud VPC Address Set Client
//
// This crate implements the address-set seam against the Tencent Cloud VPC
// API: address templates with labeled members.
//
// ## API mechanics
//
// - JSON-over-HTTPS POST to `vpc.tencentcloudapi.com`, one action per call:
//   - `DescribeAddressTemplates` (with `NeedMemberInfo`): member lookup
//   - `ModifyTemplateMember`: atomic original → replacement member swap
// - TC3-HMAC-SHA256 request signing: canonical request → string-to-sign →
//   date/service/`tc3_request` key derivation → `Authorization` header
// - Responses arrive wrapped in `{"Response": ...}`; failures carry a
//   `Response.Error` object with `Code` and `Message`
//
// ## Behavior
//
// - Makes one HTTP request per call; full error propagation to the caller
// - HTTP timeout configured (30 seconds)
// - A template that does not exist, or has no member data, yields an empty
//   member list; absence is the caller's normal "create" path, not an error
//
// ## Security Requirements
//
// - The secret key NEVER appears in logs or Debug output
// - The client MUST fail fast if credentials are empty
//
// ## API Reference
//
// - TC3 signing: https://cloud.tencent.com/document/api/213/30654
// - DescribeAddressTemplates / ModifyTemplateMember: VPC API 2017-03-12

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use ipm_core::{AddressSetClient, Error, Result, TemplateMember};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

/// VPC API endpoint host
const VPC_HOST: &str = "vpc.tencentcloudapi.com";

/// VPC API version
const VPC_VERSION: &str = "2017-03-12";

/// Service name used in the credential scope
const SERVICE: &str = "vpc";

/// Signing algorithm identifier
const ALGORITHM: &str = "TC3-HMAC-SHA256";

/// Headers participating in the signature
const SIGNED_HEADERS: &str = "content-type;host";

/// Content type of every request (also a signed header, keep in sync)
const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

type HmacSha256 = Hmac<Sha256>;

/// Tencent Cloud VPC address template client
///
/// Single-shot: one API call per method, no retry, no caching. The managed
/// template is the source of truth between runs.
pub struct TencentVpcClient {
    /// API secret id (appears in the credential scope, safe to log)
    secret_id: String,

    /// API secret key
    /// ⚠️ NEVER log this value
    secret_key: String,

    /// Region the template lives in
    region: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the secret key
impl std::fmt::Debug for TencentVpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TencentVpcClient")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<REDACTED>")
            .field("region", &self.region)
            .finish()
    }
}

impl TencentVpcClient {
    /// Create a new VPC client
    ///
    /// # Panics
    ///
    /// Panics if either credential is empty; configuration validation
    /// upstream is expected to have rejected that before construction.
    pub fn new(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        let secret_id = secret_id.into();
        let secret_key = secret_key.into();

        if secret_id.is_empty() || secret_key.is_empty() {
            panic!("Tencent Cloud credentials cannot be empty");
        }

        Self {
            secret_id,
            secret_key,
            region: region.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Build the TC3 `Authorization` header for one request body
    fn build_authorization(&self, timestamp: i64, date: &str, payload: &str) -> String {
        let hashed_payload = sha256_hex(payload.as_bytes());
        let canonical_request = format!(
            "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{VPC_HOST}\n\n{SIGNED_HEADERS}\n{hashed_payload}"
        );

        let credential_scope = format!("{date}/{SERVICE}/tc3_request");
        let string_to_sign = format!(
            "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        // Key derivation chain: date -> service -> tc3_request
        let secret_date = hmac_sha256(format!("TC3{}", self.secret_key).as_bytes(), date.as_bytes());
        let secret_service = hmac_sha256(&secret_date, SERVICE.as_bytes());
        let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
        let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

        format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            self.secret_id
        )
    }

    /// Issue one signed API call and unwrap its response envelope
    async fn call(&self, action: &str, payload: &Value) -> Result<Value> {
        let body = serde_json::to_string(payload)?;
        let now = Utc::now();
        let timestamp = now.timestamp();
        let date = now.format("%Y-%m-%d").to_string();
        let authorization = self.build_authorization(timestamp, &date, &body);

        debug!("calling {action} in {}", self.region);

        let response = self
            .client
            .post(format!("https://{VPC_HOST}"))
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", VPC_HOST)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", VPC_VERSION)
            .header("X-TC-Region", &self.region)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::http(format!("{action} request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "{action} returned {}",
                response.status()
            )));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| Error::http(format!("{action} response parse failed: {e}")))?;

        unwrap_response(action, envelope)
    }
}

#[async_trait]
impl AddressSetClient for TencentVpcClient {
    async fn describe_members(&self, template_id: &str) -> Result<Vec<TemplateMember>> {
        let payload = json!({
            "Filters": [{ "Name": "address-template-id", "Values": [template_id] }],
            "NeedMemberInfo": true,
        });

        let response = self.call("DescribeAddressTemplates", &payload).await?;
        let members = parse_members(&response);
        debug!(
            "template {template_id}: {} labeled member(s)",
            members.len()
        );
        Ok(members)
    }

    async fn swap_members(
        &self,
        template_id: &str,
        original: &[TemplateMember],
        replacement: &[TemplateMember],
    ) -> Result<()> {
        let payload = json!({
            "TemplateId": template_id,
            "OriginalTemplateMember": to_wire(original),
            "TemplateMember": to_wire(replacement),
        });

        self.call("ModifyTemplateMember", &payload).await?;
        Ok(())
    }
}

/// Map members to the API's `{Member, Description}` shape
fn to_wire(members: &[TemplateMember]) -> Vec<Value> {
    members
        .iter()
        .map(|m| json!({ "Member": m.address, "Description": m.label }))
        .collect()
}

/// Unwrap the `{"Response": ...}` envelope, surfacing an embedded error
fn unwrap_response(action: &str, envelope: Value) -> Result<Value> {
    let response = envelope
        .get("Response")
        .cloned()
        .ok_or_else(|| Error::http(format!("{action}: missing Response envelope")))?;

    if let Some(err) = response.get("Error") {
        let code = err["Code"].as_str().unwrap_or("UnknownError");
        let message = err["Message"].as_str().unwrap_or("");
        return Err(Error::http(format!("{action}: {code}: {message}")));
    }

    Ok(response)
}

/// Pull labeled members out of a `DescribeAddressTemplates` response
///
/// Missing template set, empty template list, and missing member data all
/// collapse to "no members".
fn parse_members(response: &Value) -> Vec<TemplateMember> {
    let Some(templates) = response["AddressTemplateSet"].as_array() else {
        return Vec::new();
    };
    let Some(template) = templates.first() else {
        return Vec::new();
    };
    let Some(extras) = template["AddressExtraSet"].as_array() else {
        return Vec::new();
    };

    extras
        .iter()
        .filter_map(|info| {
            let address = info["Address"].as_str()?;
            let label = info["Description"].as_str().unwrap_or_default();
            Some(TemplateMember::new(address, label))
        })
        .collect()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
