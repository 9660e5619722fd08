//! iot-provision - typed convenience layer over the AWS CLI for IoT
//!
//! Wraps `aws iot` invocations in typed lifecycle clients for things,
//! certificates, and policies, including the dependency-safe certificate
//! teardown sequence (deactivate, detach dependents, delete).
//!
//! ## Modules
//!
//! - [`gateway`]: the single process-spawning primitive everything builds on
//! - [`profile`]: credential/region resolution and the ARN prefix builder
//! - [`iot`]: thing, certificate, and policy lifecycles
//! - [`error`]: the crate-wide error taxonomy

pub mod error;
pub mod gateway;
pub mod iot;
pub mod profile;

pub use error::IotError;
pub use gateway::{AwsCli, Gateway};
pub use iot::{CertificateClient, PolicyClient, ThingClient};
pub use profile::{arn_base, AccountId, AwsProfile};
