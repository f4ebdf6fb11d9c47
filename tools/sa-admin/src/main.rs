//! SA-Admin: Signature Attestation operator CLI
//!
//! Builds and checks signature proofs, obtains timestamps and renders
//! attestation certificates. JSON goes to stdout, logs to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::debug;

use sa_01_signature_proof::{SignatureProofApi, SignatureProofService};
use sa_02_timestamping::{TimestampClient, TsaRegistry};
use sa_admin::commands::{self, SignArgs};
use sa_telemetry::{init_logging, TelemetryConfig};
use shared_types::{SignatureKind, SignatureProof, TimestampToken};

/// SA-Admin: Signature Attestation operator CLI
#[derive(Parser, Debug)]
#[command(name = "sa-admin")]
#[command(about = "Signature proofs, certified timestamps and attestation certificates")]
struct Args {
    /// Log filter directive, overrides SA_LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// SHA-256 of a file or a string
    Hash {
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
    },

    /// Build a signature proof
    Sign {
        /// Rendered document bytes
        #[arg(long)]
        document: PathBuf,
        #[arg(long)]
        document_type: String,
        #[arg(long)]
        document_id: String,
        /// Captured signature image
        #[arg(long)]
        image: PathBuf,
        #[arg(long, value_enum, default_value_t = KindArg::Drawn)]
        kind: KindArg,
        /// Signer JSON (`name`, `email`, ...)
        #[arg(long)]
        signer: PathBuf,
        /// Environment JSON (`user_agent`, `screen_descriptor`, ...)
        #[arg(long)]
        environment: Option<PathBuf>,
        /// Also timestamp the document hash
        #[arg(long)]
        timestamp: bool,
    },

    /// Check a stored proof
    VerifyProof {
        #[arg(long)]
        proof: PathBuf,
        /// Document bytes to check against the proof
        #[arg(long)]
        document: Option<PathBuf>,
    },

    /// Obtain a timestamp for a document hash
    Timestamp {
        #[arg(long, conflicts_with = "file")]
        hash: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Registered provider to use instead of the active one
        #[arg(long)]
        provider: Option<String>,
        /// Try every registered provider before falling back
        #[arg(long)]
        failover: bool,
    },

    /// Structural checks on a stored timestamp token
    VerifyToken {
        #[arg(long)]
        token: PathBuf,
    },

    /// Render the attestation certificate
    Render {
        #[arg(long)]
        proof: PathBuf,
        #[arg(long)]
        token: Option<PathBuf>,
    },

    /// List registered timestamp authorities
    Providers,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Drawn,
    Typed,
}

impl From<KindArg> for SignatureKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Drawn => SignatureKind::Drawn,
            KindArg::Typed => SignatureKind::Typed,
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &args.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    init_logging(&telemetry)?;

    let registry = TsaRegistry::from_env()?;
    debug!(active = %registry.active_name(), "TSA registry loaded");

    let proofs = SignatureProofService::system();

    match args.command {
        Command::Hash { file, text } => {
            print_json(&commands::hash(file.as_deref(), text.as_deref())?)?;
        }
        Command::Sign {
            document,
            document_type,
            document_id,
            image,
            kind,
            signer,
            environment,
            timestamp,
        } => {
            let proof = commands::sign(
                &proofs,
                &SignArgs {
                    document: &document,
                    document_type: &document_type,
                    document_id: &document_id,
                    image: &image,
                    kind: kind.into(),
                    signer: &signer,
                    environment: environment.as_deref(),
                },
            )?;
            let mut output = serde_json::json!({ "proof": proof });
            if timestamp {
                let client = TimestampClient::http()?;
                output["timestamp"] =
                    commands::timestamp(&client, &registry, &proof.document.hash, None, false)
                        .await?;
            }
            print_json(&output)?;
        }
        Command::VerifyProof { proof, document } => {
            let proof: SignatureProof = commands::read_json(&proof)?;
            let bytes = document.as_deref().map(commands::read_bytes).transpose()?;
            print_json(&commands::verify_proof(&proofs, &proof, bytes.as_deref()))?;
        }
        Command::Timestamp {
            hash,
            file,
            provider,
            failover,
        } => {
            let document_hash = commands::document_hash(hash.as_deref(), file.as_deref())?;
            let client = TimestampClient::http()?;
            let result = commands::timestamp(
                &client,
                &registry,
                &document_hash,
                provider.as_deref(),
                failover,
            )
            .await?;
            print_json(&result)?;
        }
        Command::VerifyToken { token } => {
            let token: TimestampToken = commands::read_json(&token)?;
            let client = TimestampClient::http()?;
            print_json(&commands::verify_token(&client, &token))?;
        }
        Command::Render { proof, token } => {
            let proof: SignatureProof = commands::read_json(&proof)?;
            let token: Option<TimestampToken> =
                token.as_deref().map(commands::read_json).transpose()?;
            print!("{}", proofs.render_certificate(&proof, token.as_ref()));
        }
        Command::Providers => {
            print_json(&commands::providers(&registry))?;
        }
    }

    Ok(())
}
