//! CLI command definitions and argument parsing

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use vsms_core::{
    variants, Agent, ServiceAccountKey, VerificationOutcome, VerifiedSms, VerifiedSmsConfig,
    VerifyError,
};
use vsms_crypto::message_hash_with;

use crate::ExitCode;

/// Verified SMS sender tools
#[derive(Parser, Debug)]
#[command(name = "verified-sms")]
#[command(version, about = "Verified SMS sender tools")]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(long, global = true, env = "VSMS_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Service account JSON key
    #[arg(long, global = true, env = "VSMS_SERVICE_ACCOUNT")]
    pub credentials: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List public keys registered for a phone number
    Keys {
        /// E.164 phone number
        phone_number: String,
    },

    /// Submit hashes for a message and report whether it was verified
    Mark(MarkArgs),

    /// Print message hashes for one device key, without network access
    Hash(HashArgs),
}

#[derive(Args, Debug)]
pub struct MarkArgs {
    /// E.164 phone number
    pub phone_number: String,

    #[arg(long)]
    pub agent_id: String,

    /// Agent private key (PKCS#8 or SEC1 PEM)
    #[arg(long)]
    pub agent_key: PathBuf,

    #[arg(long)]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Base64 SubjectPublicKeyInfo of the device
    #[arg(long)]
    pub public_key: String,

    /// Agent private key (PKCS#8 or SEC1 PEM)
    #[arg(long)]
    pub agent_key: PathBuf,

    #[arg(long)]
    pub message: String,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> anyhow::Result<ExitCode> {
        let config = self.load_config()?;

        match &self.command {
            Commands::Keys { phone_number } => {
                let sms = self.connect(&config)?;
                for key in sms.get_public_keys_for_phone_number(phone_number).await? {
                    println!("{key}");
                }
                Ok(ExitCode::Success)
            }
            Commands::Mark(args) => {
                let sms = self.connect(&config)?;
                let agent = load_agent(&args.agent_id, &args.agent_key)?;
                match sms.verify(&args.phone_number, &agent, &args.message).await {
                    VerificationOutcome::Verified => println!("verified"),
                    VerificationOutcome::NotSupported => println!("not-supported"),
                    VerificationOutcome::Error(err) => return Err(err.into()),
                }
                Ok(ExitCode::Success)
            }
            Commands::Hash(args) => {
                let agent = load_agent("offline", &args.agent_key)?;
                for hash in hash_variants(&config, &args.public_key, &agent, &args.message)? {
                    println!("{hash}");
                }
                Ok(ExitCode::Success)
            }
        }
    }

    /// Config from `--config` if given, otherwise defaults plus `VSMS_*` overrides.
    pub fn load_config(&self) -> anyhow::Result<VerifiedSmsConfig> {
        match &self.config {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                VerifiedSmsConfig::load_from_file(path)
                    .with_context(|| format!("failed to load config {}", path.display()))
            }
            None => Ok(VerifiedSmsConfig::from_env()?),
        }
    }

    fn connect(&self, config: &VerifiedSmsConfig) -> anyhow::Result<VerifiedSms> {
        let path = self
            .credentials
            .as_deref()
            .context("no credentials: pass --credentials or set VSMS_SERVICE_ACCOUNT")?;
        let key = ServiceAccountKey::load_from_file(path)
            .with_context(|| format!("failed to load credentials {}", path.display()))?;
        Ok(VerifiedSms::with_service_account(config, key)?)
    }
}

fn load_agent(id: &str, path: &Path) -> anyhow::Result<Agent> {
    let pem = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read agent key {}", path.display()))?;
    Ok(Agent::from_pem(id, &pem)?)
}

/// Base64 hash of every variant of `message`, in submission order.
pub fn hash_variants(
    config: &VerifiedSmsConfig,
    public_key: &str,
    agent: &Agent,
    message: &str,
) -> Result<Vec<String>, VerifyError> {
    let deriver = config.hash_deriver();
    variants::expand(message)
        .iter()
        .map(|variant| {
            message_hash_with(&deriver, public_key, agent.private_key(), variant.as_bytes())
                .map(|hash| hash.to_base64())
                .map_err(VerifyError::from)
        })
        .collect()
}
