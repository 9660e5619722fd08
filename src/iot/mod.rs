//! IoT resource lifecycles built on the gateway
//!
//! - [`thing`]: device identity registry records
//! - [`certificate`]: X.509 credential lifecycle and dependency-safe teardown
//! - [`policy`]: access policy documents and principal attachment

pub mod certificate;
pub mod policy;
pub mod thing;

pub use certificate::{
    write_keys_and_certificates, CertificateClient, CertificateDescription, CertificateStatus,
    KeyPair, KeysAndCertificate, PolicySummary,
};
pub use policy::{Effect, Policy, PolicyClient, PolicyDocument, Statement};
pub use thing::{Thing, ThingClient};

use crate::error::IotError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialize a gateway payload, mapping shape mismatches to Protocol errors.
pub(crate) fn parse_payload<T: DeserializeOwned>(verb: &str, value: Value) -> Result<T, IotError> {
    serde_json::from_value(value).map_err(|e| IotError::protocol(verb, e.to_string()))
}

/// Unwrap a payload that the CLI documents as always present.
pub(crate) fn require_payload(verb: &str, value: Option<Value>) -> Result<Value, IotError> {
    value.ok_or_else(|| IotError::protocol(verb, "empty response"))
}
