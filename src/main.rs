//! iot-provision: provision AWS IoT things, certificates, and policies
//! through the AWS command-line tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iot_provision::iot::{write_keys_and_certificates, Effect};
use iot_provision::{AwsCli, AwsProfile, CertificateClient, PolicyClient, ThingClient};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "iot-provision")]
#[command(about = "Provision AWS IoT things, certificates, and policies")]
#[command(version)]
struct Args {
    /// AWS profile to resolve region and credentials from
    #[arg(long, global = true, default_value = "default")]
    profile: String,

    /// Directory holding the AWS config and credentials stores (default: ~/.aws)
    #[arg(long, global = true)]
    aws_dir: Option<PathBuf>,

    /// aws executable to invoke
    #[arg(long, global = true, default_value = "aws")]
    aws_bin: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage things (device identities)
    Thing {
        #[command(subcommand)]
        action: ThingAction,
    },
    /// Manage certificates and key material
    Cert {
        #[command(subcommand)]
        action: CertAction,
    },
    /// Manage access policies
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
    /// Associate resources
    Attach {
        #[command(subcommand)]
        action: AttachAction,
    },
}

#[derive(Subcommand, Debug)]
enum ThingAction {
    /// Register a new thing
    Create { name: String },
    /// Show a thing's properties
    Describe { name: String },
    /// Remove a thing from the registry
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum CertAction {
    /// Create an active certificate with a fresh key pair
    Create {
        /// Also write the PEM and key pair to this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show a certificate's current description
    Describe { certificate_id: String },
    /// Deactivate, detach dependents, and delete a certificate
    Delete { certificate_id: String },
}

#[derive(Subcommand, Debug)]
enum PolicyAction {
    /// Create a single-statement policy scoped to one topic
    Create {
        name: String,

        /// Allow or Deny
        #[arg(long)]
        effect: Effect,

        /// Action the statement covers, e.g. iot:Publish, iot:Subscribe
        #[arg(long)]
        action: String,

        /// Topic the statement covers
        #[arg(long)]
        topic: String,
    },
    /// Show a policy and its document
    Describe { name: String },
    /// Delete a policy
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum AttachAction {
    /// Attach a policy to a certificate
    Policy {
        policy_name: String,
        certificate_arn: String,
    },
    /// Attach a certificate to a thing
    Thing {
        thing_name: String,
        certificate_arn: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let gateway = AwsCli::with_program(&args.aws_bin);

    match args.command {
        Command::Thing { action } => {
            let things = ThingClient::new(gateway);
            match action {
                ThingAction::Create { name } => print_record(&things.create(&name).await?)?,
                ThingAction::Describe { name } => {
                    print_record(&things.describe_by_name(&name).await?)?
                }
                ThingAction::Delete { name } => things.delete_by_name(&name).await?,
            }
        }

        Command::Cert { action } => {
            let certificates = CertificateClient::new(gateway);
            match action {
                CertAction::Create { out_dir } => {
                    let cert = certificates.create_keys_and_certificate().await?;
                    if let Some(dir) = out_dir {
                        write_keys_and_certificates(&cert, &dir)?;
                        info!(dir = %dir.display(), "Key material written");
                    }
                    print_record(&cert)?;
                }
                CertAction::Describe { certificate_id } => {
                    print_record(&certificates.describe_by_id(&certificate_id).await?)?
                }
                CertAction::Delete { certificate_id } => {
                    certificates.delete_by_id(&certificate_id).await?
                }
            }
        }

        Command::Policy { action } => {
            let policies = PolicyClient::new(gateway.clone());
            match action {
                PolicyAction::Create {
                    name,
                    effect,
                    action,
                    topic,
                } => {
                    let aws_dir = resolve_aws_dir(args.aws_dir)?;
                    let profile = AwsProfile::resolve(&gateway, &aws_dir, &args.profile).await?;
                    let policy = policies
                        .create_topic_policy(&name, effect, &action, &topic, &profile.arn_base())
                        .await?;
                    print_record(&policy)?;
                }
                PolicyAction::Describe { name } => {
                    print_record(&policies.describe_by_name(&name).await?)?
                }
                PolicyAction::Delete { name } => policies.delete_by_name(&name).await?,
            }
        }

        Command::Attach { action } => match action {
            AttachAction::Policy {
                policy_name,
                certificate_arn,
            } => {
                PolicyClient::new(gateway)
                    .attach_by_name(&policy_name, &certificate_arn)
                    .await?;
            }
            AttachAction::Thing {
                thing_name,
                certificate_arn,
            } => {
                ThingClient::new(gateway)
                    .attach_certificate_by_name(&thing_name, &certificate_arn)
                    .await?;
            }
        },
    }

    Ok(())
}

/// Explicit --aws-dir wins; otherwise ~/.aws
fn resolve_aws_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".aws"))
        .context("Could not determine the home directory; pass --aws-dir")
}

fn print_record<T: serde::Serialize>(record: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
