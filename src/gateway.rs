//! AWS CLI gateway
//!
//! Every lifecycle module delegates to the external `aws` tool through this
//! single primitive: spawn the process, capture its output, parse non-empty
//! stdout as JSON, and classify failures.

use crate::error::{classify_diagnostic, IotError};
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Gateway to the AWS command-line tool.
///
/// The trait seam lets tests intercept and script invocations; [`AwsCli`] is
/// the process-spawning implementation used everywhere else.
pub trait Gateway: Send + Sync {
    /// Run `aws iot <verb> <args...>` and parse non-empty stdout as JSON.
    ///
    /// Arguments are passed exactly as given, in order, with no injected
    /// defaults. Empty stdout yields `Ok(None)`.
    fn invoke(
        &self,
        verb: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<Option<Value>, IotError>> + Send;

    /// Run `aws <service> <verb> <args...>` and return trimmed raw stdout.
    ///
    /// Used for `--output text` queries such as the caller-identity lookup.
    fn query_text(
        &self,
        service: &str,
        verb: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, IotError>> + Send;
}

impl<G: Gateway> Gateway for &G {
    fn invoke(
        &self,
        verb: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<Option<Value>, IotError>> + Send {
        (**self).invoke(verb, args)
    }

    fn query_text(
        &self,
        service: &str,
        verb: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, IotError>> + Send {
        (**self).query_text(service, verb, args)
    }
}

/// Process-spawning gateway over the `aws` executable
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: PathBuf,
}

impl AwsCli {
    /// Gateway over the `aws` binary found on PATH
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("aws"),
        }
    }

    /// Gateway over a specific executable (tests substitute a stub here)
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run one invocation to completion and return raw stdout.
    ///
    /// No retries, no timeout: a hang in the external tool hangs the caller.
    async fn run(&self, service: &str, verb: &str, args: &[&str]) -> Result<String, IotError> {
        debug!(service = %service, verb = %verb, args = ?args, "Invoking aws");

        let output = Command::new(&self.program)
            .arg(service)
            .arg(verb)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| IotError::Command {
                verb: verb.to_string(),
                diagnostic: format!("failed to spawn '{}': {}", self.program.display(), e),
            })?;

        if !output.status.success() {
            let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_diagnostic(verb, diagnostic));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for AwsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for AwsCli {
    async fn invoke(&self, verb: &str, args: &[&str]) -> Result<Option<Value>, IotError> {
        let stdout = self.run("iot", verb, args).await?;
        if stdout.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&stdout)
            .map(Some)
            .map_err(|e| IotError::protocol(verb, e.to_string()))
    }

    async fn query_text(&self, service: &str, verb: &str, args: &[&str]) -> Result<String, IotError> {
        Ok(self.run(service, verb, args).await?.trim().to_string())
    }
}
