//! Thing registry lifecycle

use crate::error::IotError;
use crate::gateway::Gateway;
use crate::iot::certificate::KeysAndCertificate;
use crate::iot::{parse_payload, require_payload};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// A registered device identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    pub thing_name: String,
    /// Present on create responses, absent from some describe payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thing_arn: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

/// Client for thing registry operations
pub struct ThingClient<G> {
    gateway: G,
}

impl<G: Gateway> ThingClient<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Register a new thing. The service enforces name uniqueness, so a
    /// duplicate create surfaces the delegate's error.
    pub async fn create(&self, name: &str) -> Result<Thing, IotError> {
        info!(thing_name = %name, "Creating thing");
        let value = self
            .gateway
            .invoke("create-thing", &["--thing-name", name])
            .await?;
        parse_payload("create-thing", require_payload("create-thing", value)?)
    }

    /// Fetch a thing's current properties by name.
    pub async fn describe_by_name(&self, name: &str) -> Result<Thing, IotError> {
        let value = self
            .gateway
            .invoke("describe-thing", &["--thing-name", name])
            .await?;
        parse_payload("describe-thing", require_payload("describe-thing", value)?)
    }

    /// Fetch current properties for a previously returned record.
    pub async fn describe(&self, thing: &Thing) -> Result<Thing, IotError> {
        self.describe_by_name(&thing.thing_name).await
    }

    /// Remove a thing from the registry by name.
    ///
    /// Double deletion is not suppressed; the second call surfaces NotFound.
    pub async fn delete_by_name(&self, name: &str) -> Result<(), IotError> {
        info!(thing_name = %name, "Deleting thing");
        self.gateway
            .invoke("delete-thing", &["--thing-name", name])
            .await?;
        Ok(())
    }

    /// Remove a previously returned record from the registry.
    pub async fn delete(&self, thing: &Thing) -> Result<(), IotError> {
        self.delete_by_name(&thing.thing_name).await
    }

    /// Attach a certificate (by principal ARN) to a thing.
    pub async fn attach_certificate_by_name(
        &self,
        thing_name: &str,
        certificate_arn: &str,
    ) -> Result<(), IotError> {
        info!(thing_name = %thing_name, principal = %certificate_arn, "Attaching certificate to thing");
        self.gateway
            .invoke(
                "attach-thing-principal",
                &["--thing-name", thing_name, "--principal", certificate_arn],
            )
            .await?;
        Ok(())
    }

    /// Attach a freshly created certificate to a thing.
    pub async fn attach_certificate(
        &self,
        thing: &Thing,
        certificate: &KeysAndCertificate,
    ) -> Result<(), IotError> {
        self.attach_certificate_by_name(&thing.thing_name, &certificate.certificate_arn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thing_deserializes_create_payload() {
        let thing: Thing = serde_json::from_str(
            r#"{"thingName": "Thing-abc123", "thingArn": "arn:aws:iot:us-east-1:123456789012:thing/Thing-abc123"}"#,
        )
        .unwrap();
        assert_eq!(thing.thing_name, "Thing-abc123");
        assert!(thing.thing_arn.is_some());
        assert!(thing.attributes.is_empty());
    }

    #[test]
    fn thing_deserializes_describe_payload_without_arn() {
        let thing: Thing = serde_json::from_str(
            r#"{"thingName": "Thing-abc123", "attributes": {"model": "esp32"}, "version": 1}"#,
        )
        .unwrap();
        assert_eq!(thing.thing_name, "Thing-abc123");
        assert!(thing.thing_arn.is_none());
        assert_eq!(thing.attributes["model"], "esp32");
    }
}
