//! AWS profile resolution
//!
//! Reads the region and access keys for a named profile from the `config`
//! and `credentials` stores under an explicitly supplied AWS directory, and
//! resolves the caller's account id through the gateway.

use crate::error::IotError;
use crate::gateway::Gateway;
use std::path::Path;
use tracing::info;

/// 12-digit AWS account id
///
/// The newtype keeps account ids from mixing with other strings; it is only
/// produced by the identity query (or explicitly, for callers that already
/// hold one).
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Deref)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }
}

/// Build the IoT resource-name prefix for a region and account.
pub fn arn_base(region: &str, account_id: &AccountId) -> String {
    format!("arn:aws:iot:{region}:{account_id}:")
}

/// Resolved credentials and region for a named profile
#[derive(Debug, Clone)]
pub struct AwsProfile {
    pub account_id: AccountId,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

impl AwsProfile {
    /// Resolve a named profile from the stores under `aws_dir`.
    ///
    /// `region` comes from `<aws_dir>/config`, the key pair from
    /// `<aws_dir>/credentials`, both under the `[<profile>]` section; the
    /// account id comes from the identity query. Any missing file or key
    /// fails the whole resolution — no partial or defaulted credentials.
    pub async fn resolve<G: Gateway>(
        gateway: &G,
        aws_dir: &Path,
        profile: &str,
    ) -> Result<Self, IotError> {
        let account = gateway
            .query_text(
                "sts",
                "get-caller-identity",
                &["--output", "text", "--query", "Account"],
            )
            .await?;

        let config_path = aws_dir.join("config");
        let region = read_profile_key(&config_path, profile, "region")?;

        let credentials_path = aws_dir.join("credentials");
        let access_key = read_profile_key(&credentials_path, profile, "aws_access_key_id")?;
        let secret_key = read_profile_key(&credentials_path, profile, "aws_secret_access_key")?;

        info!(account_id = %account, region = %region, profile = %profile, "AWS profile resolved");

        Ok(Self {
            account_id: AccountId(account),
            region,
            access_key,
            secret_key,
        })
    }

    /// IoT ARN prefix for this profile's region and account.
    pub fn arn_base(&self) -> String {
        arn_base(&self.region, &self.account_id)
    }
}

/// Look up `key` under the `[profile]` section of a key=value store.
fn read_profile_key(path: &Path, profile: &str, key: &str) -> Result<String, IotError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| IotError::configuration(path, e.to_string()))?;

    let mut in_profile = false;
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if let Some(section) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            in_profile = section.trim() == profile;
            continue;
        }
        if !in_profile {
            continue;
        }
        if let Some((k, v)) = trimmed.split_once('=') {
            if k.trim() == key {
                return Ok(v.trim().to_string());
            }
        }
    }

    Err(IotError::configuration(
        path,
        format!("missing '{key}' for profile '{profile}'"),
    ))
}
