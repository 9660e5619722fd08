//! Access policy lifecycle and principal attachment

use crate::error::IotError;
use crate::gateway::Gateway;
use crate::iot::certificate::KeysAndCertificate;
use crate::iot::{parse_payload, require_payload};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Policy-language version tag required by the service
pub const POLICY_VERSION: &str = "2012-10-17";

/// Policy statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl std::str::FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Allow" => Ok(Effect::Allow),
            "Deny" => Ok(Effect::Deny),
            other => Err(format!("effect must be 'Allow' or 'Deny', got: {other}")),
        }
    }
}

/// One policy statement: an effect on a set of actions over resources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

/// Policy document serialized into the `--policy-document` flag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Single-statement document applying `effect` to `action` on one topic.
    pub fn for_topic(effect: Effect, action: &str, topic: &str, arn_base: &str) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                effect,
                action: vec![action.to_string()],
                resource: vec![format!("{arn_base}topic/{topic}")],
            }],
        }
    }
}

/// An access policy as returned by create-policy / get-policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub policy_name: String,
    pub policy_arn: String,
    /// Stringified JSON document, as the CLI returns it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_version_id: Option<String>,
}

/// Client for policy lifecycle operations
pub struct PolicyClient<G> {
    gateway: G,
}

impl<G: Gateway> PolicyClient<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Create a policy scoped to a single topic under the given ARN prefix.
    pub async fn create_topic_policy(
        &self,
        name: &str,
        effect: Effect,
        action: &str,
        topic: &str,
        arn_base: &str,
    ) -> Result<Policy, IotError> {
        let document = PolicyDocument::for_topic(effect, action, topic, arn_base);
        let document = serde_json::to_string(&document)
            .map_err(|e| IotError::protocol("create-policy", e.to_string()))?;
        self.create_from_document(name, &document).await
    }

    /// Create a policy from a raw JSON document string.
    pub async fn create_from_document(
        &self,
        name: &str,
        document: &str,
    ) -> Result<Policy, IotError> {
        info!(policy_name = %name, "Creating policy");
        let value = self
            .gateway
            .invoke(
                "create-policy",
                &["--policy-name", name, "--policy-document", document],
            )
            .await?;
        parse_payload("create-policy", require_payload("create-policy", value)?)
    }

    /// Fetch a policy and its document by name.
    pub async fn describe_by_name(&self, name: &str) -> Result<Policy, IotError> {
        let value = self
            .gateway
            .invoke("get-policy", &["--policy-name", name])
            .await?;
        parse_payload("get-policy", require_payload("get-policy", value)?)
    }

    /// Fetch current properties for a previously returned record.
    pub async fn describe(&self, policy: &Policy) -> Result<Policy, IotError> {
        self.describe_by_name(&policy.policy_name).await
    }

    /// Delete a policy by name.
    pub async fn delete_by_name(&self, name: &str) -> Result<(), IotError> {
        info!(policy_name = %name, "Deleting policy");
        self.gateway
            .invoke("delete-policy", &["--policy-name", name])
            .await?;
        Ok(())
    }

    /// Delete a previously returned record.
    pub async fn delete(&self, policy: &Policy) -> Result<(), IotError> {
        self.delete_by_name(&policy.policy_name).await
    }

    /// Attach a policy to a certificate by principal ARN.
    pub async fn attach_by_name(
        &self,
        policy_name: &str,
        certificate_arn: &str,
    ) -> Result<(), IotError> {
        info!(policy_name = %policy_name, principal = %certificate_arn, "Attaching policy");
        self.gateway
            .invoke(
                "attach-principal-policy",
                &["--policy-name", policy_name, "--principal", certificate_arn],
            )
            .await?;
        Ok(())
    }

    /// Attach a policy record to a freshly created certificate.
    pub async fn attach(
        &self,
        policy: &Policy,
        certificate: &KeysAndCertificate,
    ) -> Result<(), IotError> {
        self.attach_by_name(&policy.policy_name, &certificate.certificate_arn)
            .await
    }

    /// Detach a policy from a certificate by principal ARN.
    pub async fn detach_by_name(
        &self,
        policy_name: &str,
        certificate_arn: &str,
    ) -> Result<(), IotError> {
        info!(policy_name = %policy_name, principal = %certificate_arn, "Detaching policy");
        self.gateway
            .invoke(
                "detach-principal-policy",
                &["--policy-name", policy_name, "--principal", certificate_arn],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_document_shape() {
        let doc = PolicyDocument::for_topic(
            Effect::Allow,
            "iot:Publish",
            "telemetry",
            "arn:aws:iot:us-east-1:123456789012:",
        );

        assert_eq!(doc.version, "2012-10-17");
        assert_eq!(doc.statement.len(), 1);
        assert_eq!(doc.statement[0].effect, Effect::Allow);
        assert_eq!(doc.statement[0].action, vec!["iot:Publish"]);
        assert_eq!(
            doc.statement[0].resource,
            vec!["arn:aws:iot:us-east-1:123456789012:topic/telemetry"]
        );
    }

    #[test]
    fn document_serializes_pascal_case() {
        let doc = PolicyDocument::for_topic(Effect::Deny, "iot:Connect", "control", "arn:");
        let json: serde_json::Value = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["Version"], "2012-10-17");
        assert_eq!(json["Statement"][0]["Effect"], "Deny");
        assert_eq!(json["Statement"][0]["Action"][0], "iot:Connect");
    }

    #[test]
    fn effect_from_str_rejects_unknown() {
        assert_eq!("Allow".parse::<Effect>().unwrap(), Effect::Allow);
        assert_eq!("Deny".parse::<Effect>().unwrap(), Effect::Deny);
        assert!("allow".parse::<Effect>().is_err());
    }

    #[test]
    fn policy_deserializes_get_policy_payload() {
        let policy: Policy = serde_json::from_str(
            r#"{
                "policyName": "telemetry-publish",
                "policyArn": "arn:aws:iot:us-east-1:123456789012:policy/telemetry-publish",
                "policyDocument": "{\"Version\":\"2012-10-17\"}",
                "defaultVersionId": "1"
            }"#,
        )
        .unwrap();
        assert_eq!(policy.policy_name, "telemetry-publish");
        assert!(policy.policy_document.is_some());
    }
}
