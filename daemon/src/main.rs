//! Device registry daemon: command-line entry point over an LMDB ledger.
//!
//! Offline helpers (`keygen`, `key-digest`, `sign`, `sign-evidence`) play the
//! device's part; the remaining subcommands run one registry operation
//! against the ledger in `data_dir` and print the result as JSON.

mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;

use devreg_crypto::{generate_keypair, key_digest, sign_evidence, sign_message, DeviceKeyPair};
use devreg_store_lmdb::{check_integrity, LmdbLedger};
use devreg_types::{
    CallerId, ContentHash, DecisionRuleKind, IdentityError, IdentitySource, KeyDigest,
    PublicKeyPem, VoteId, VoteIdDerivation,
};
use devreg_utils::LogFormat;
use devreg_verification::{DeviceRegistration, EvidenceRecord};

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "devreg", about = "Crowd-verified device key registry")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DEVREG_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "DEVREG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Maximum ledger size in MiB.
    #[arg(long, env = "DEVREG_MAP_SIZE_MB")]
    map_size_mb: Option<usize>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DEVREG_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DEVREG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Decision rule: "simple_majority" or "symmetric_majority".
    #[arg(long, env = "DEVREG_DECISION_RULE")]
    decision_rule: Option<DecisionRuleKind>,

    /// Ballots required before a vote can be decided.
    #[arg(long, env = "DEVREG_MIN_BALLOTS")]
    min_ballots: Option<u32>,

    /// Vote id derivation: "first_evidence" or "evidence_set".
    #[arg(long, env = "DEVREG_VOTE_ID")]
    vote_id: Option<VoteIdDerivation>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate a device key pair.
    Keygen {
        /// Write the private key (PKCS#8 PEM) here.
        #[arg(long)]
        private_out: PathBuf,
        /// Write the public key (SPKI PEM) here.
        #[arg(long)]
        public_out: PathBuf,
        #[arg(long, default_value_t = devreg_crypto::DEFAULT_KEY_BITS)]
        bits: usize,
    },
    /// Print the digest the registry stores a public key under.
    KeyDigest {
        #[arg(long)]
        public_key: PathBuf,
    },
    /// Sign a file with a device private key (hex RSA-PSS signature).
    Sign {
        #[arg(long)]
        private_key: PathBuf,
        #[arg(long)]
        input: PathBuf,
    },
    /// Produce a signed evidence record for a photo's content hash.
    SignEvidence {
        #[arg(long)]
        private_key: PathBuf,
        #[arg(long)]
        hash: String,
        #[arg(long)]
        uploader: String,
        /// Defaults to the current unix time in seconds.
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Submit evidence for a device key and open a photo vote.
    StartVote {
        /// JSON file with an array of evidence records.
        #[arg(long)]
        evidence: PathBuf,
        #[arg(long)]
        public_key: PathBuf,
    },
    /// Cast a ballot on an open vote.
    CastBallot {
        vote_id: String,
        /// Whether the photographs look genuine.
        #[arg(long, action = clap::ArgAction::Set)]
        valid: bool,
        /// Identity the ballot is cast under.
        #[arg(long, env = "DEVREG_CALLER")]
        caller: Option<String>,
    },
    GetVote {
        vote_id: String,
    },
    GetEvidence {
        hash: String,
    },
    GetDeviceKey {
        digest: KeyDigest,
    },
    /// Store a helper-data blob signed by a registered device key.
    StoreHelper {
        #[arg(long)]
        label: String,
        #[arg(long)]
        key_digest: KeyDigest,
        #[arg(long)]
        input: PathBuf,
        /// Hex signature over the file contents.
        #[arg(long)]
        signature: String,
    },
    /// Fetch a helper-data blob.
    GetHelper {
        #[arg(long)]
        label: String,
        /// Write the raw blob here instead of printing it as hex.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Caller identity fixed for the life of the process.
struct StaticIdentity(Option<CallerId>);

impl IdentitySource for StaticIdentity {
    fn current_caller_id(&self) -> Result<CallerId, IdentityError> {
        self.0
            .clone()
            .ok_or_else(|| IdentityError("no caller given (use --caller or DEVREG_CALLER)".into()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyInfo {
    public_key_hash: KeyDigest,
    public_key: PublicKeyPem,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BallotOutcome {
    vote_id: VoteId,
    status: devreg_types::VoteStatus,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    devreg_utils::init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Keygen {
            private_out,
            public_out,
            bits,
        } => {
            let pair = generate_keypair(bits).context("generating key pair")?;
            write_file(&private_out, pair.private_pem()?.as_bytes())?;
            write_file(&public_out, pair.public.as_bytes())?;
            tracing::info!(bits, private = %private_out.display(), "generated device key");
            print_json(&KeyInfo {
                public_key_hash: key_digest(&pair.public),
                public_key: pair.public,
            })
        }
        Command::KeyDigest { public_key } => {
            let pem = read_public_key(&public_key)?;
            print_json(&KeyInfo {
                public_key_hash: key_digest(&pem),
                public_key: pem,
            })
        }
        Command::Sign { private_key, input } => {
            let pair = read_private_key(&private_key)?;
            let data = read_file(&input)?;
            let signature = sign_message(&data, &pair.private)?;
            print_json(&serde_json::json!({ "signature": signature }))
        }
        Command::SignEvidence {
            private_key,
            hash,
            uploader,
            timestamp,
            description,
        } => {
            let pair = read_private_key(&private_key)?;
            let timestamp = match timestamp {
                Some(ts) => ts,
                None => unix_now()?.to_string(),
            };
            let signature = sign_evidence(&hash, &uploader, &timestamp, &pair.private)?;
            print_json(&EvidenceRecord {
                content_hash: ContentHash::new(hash),
                signature,
                uploader,
                timestamp,
                description,
            })
        }
        Command::StartVote {
            evidence,
            public_key,
        } => {
            let items: Vec<EvidenceRecord> = serde_json::from_slice(&read_file(&evidence)?)
                .with_context(|| format!("parsing evidence from {}", evidence.display()))?;
            let pem = read_public_key(&public_key)?;
            let registry = open_registry(&config, None)?;
            print_json(&registry.start_vote(&items, &pem)?)
        }
        Command::CastBallot {
            vote_id,
            valid,
            caller,
        } => {
            let registry = open_registry(&config, caller)?;
            let vote_id = VoteId::new(vote_id);
            let status = registry.cast_ballot(&vote_id, valid)?;
            print_json(&BallotOutcome { vote_id, status })
        }
        Command::GetVote { vote_id } => {
            let registry = open_registry(&config, None)?;
            print_json(&registry.get_vote(&VoteId::new(vote_id))?)
        }
        Command::GetEvidence { hash } => {
            let registry = open_registry(&config, None)?;
            print_json(&registry.get_evidence(&ContentHash::new(hash))?)
        }
        Command::GetDeviceKey { digest } => {
            let registry = open_registry(&config, None)?;
            print_json(&registry.get_device_key(&digest)?)
        }
        Command::StoreHelper {
            label,
            key_digest,
            input,
            signature,
        } => {
            let payload = read_file(&input)?;
            let registry = open_registry(&config, None)?;
            registry.store_auxiliary_data(&payload, &key_digest, &signature, &label)?;
            print_json(&serde_json::json!({ "label": label, "bytes": payload.len() }))
        }
        Command::GetHelper { label, output } => {
            let registry = open_registry(&config, None)?;
            let payload = registry.retrieve_auxiliary_data(&label)?;
            match output {
                Some(path) => {
                    write_file(&path, &payload)?;
                    print_json(&serde_json::json!({ "label": label, "bytes": payload.len() }))
                }
                None => print_json(&serde_json::json!({ "label": label, "data": hex::encode(payload) })),
            }
        }
    }
}

/// File settings first, then flags and environment on top.
fn load_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(mb) = cli.map_size_mb {
        config.map_size_mb = mb;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(rule) = cli.decision_rule {
        config.params.decision_rule = rule;
    }
    if let Some(min) = cli.min_ballots {
        config.params.min_ballots = min;
    }
    if let Some(vote_id) = cli.vote_id {
        config.params.vote_id = vote_id;
    }
    Ok(config)
}

fn open_registry(config: &DaemonConfig, caller: Option<String>) -> anyhow::Result<DeviceRegistration> {
    let ledger = LmdbLedger::open_with_map_size(&config.data_dir, config.map_size_bytes())
        .with_context(|| format!("opening ledger at {}", config.data_dir.display()))?;

    let report = check_integrity(&ledger).context("checking ledger integrity")?;
    if !report.is_healthy() {
        for error in &report.errors {
            tracing::error!(%error, "ledger integrity");
        }
        bail!(
            "ledger at {} failed integrity check ({} errors)",
            config.data_dir.display(),
            report.errors.len()
        );
    }
    tracing::debug!(
        entries = report.total_entries,
        by_namespace = ?report.entries_by_namespace,
        "ledger integrity ok"
    );

    let identity = StaticIdentity(caller.map(CallerId::new));
    Ok(DeviceRegistration::new(
        Arc::new(ledger),
        Arc::new(identity),
        &config.params,
    ))
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn write_file(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

fn read_public_key(path: &Path) -> anyhow::Result<PublicKeyPem> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading public key {}", path.display()))?;
    Ok(PublicKeyPem::new(text))
}

fn read_private_key(path: &Path) -> anyhow::Result<DeviceKeyPair> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading private key {}", path.display()))?;
    Ok(DeviceKeyPair::from_private_pem(&text)?)
}

fn unix_now() -> anyhow::Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?
        .as_secs())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
