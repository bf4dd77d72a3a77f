//! offers — command-line entry point for the referral ledger.

mod config;

use anyhow::Context;
use clap::Parser;
use serde_json::{json, Value};
use std::path::PathBuf;

use config::DaemonConfig;
use offers_ledger::{ReferralLedger, DEFAULT_MIN_CREDITS};
use offers_store::{KeyValueStore, NamespacedStore};
use offers_store_lmdb::LmdbEnvironment;
use offers_types::{OffersError, PersonId, ReferralCode};
use offers_utils::LogFormat;

#[derive(Parser)]
#[command(name = "offers", about = "Referral code ledger")]
struct Cli {
    /// Data directory for ledger storage.
    #[arg(long, env = "OFFERS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Prefix every store key with "<namespace>:".
    #[arg(long, env = "OFFERS_NAMESPACE")]
    namespace: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "OFFERS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "OFFERS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "OFFERS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Issue a code for a person, or print the one they already have.
    CreateCode { person: String },
    /// Print a person's code.
    Code { person: String },
    /// Print the owner of a code.
    Owner { code: String },
    /// Credit a user to someone else's code.
    Refer { user: String, code: String },
    /// Make the owners of two codes referrals of each other.
    Associate { code_a: String, code_b: String },
    /// Make two people referrals of each other, by their codes.
    AssociatePeople { person_a: String, person_b: String },
    /// List the people credited to a code.
    Referrals { code: String },
    /// Print whose code a person was last credited to.
    Referrer { person: String },
    /// Print a code's bonus credits.
    Bonus { code: String },
    /// Add a (possibly negative) delta to a code's bonus credits.
    AdjustBonus {
        code: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Add a delta to the bonus credits of a person's code.
    AdjustBonusPerson {
        person: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Print a code's total credits.
    Credits { code: String },
    /// Print the total credits of a person's code.
    CreditsPerson { person: String },
    /// List codes with at least `min_credits` credits, highest first.
    Leaderboard {
        #[arg(long, default_value_t = DEFAULT_MIN_CREDITS, allow_negative_numbers = true)]
        min_credits: i64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => DaemonConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if cli.namespace.is_some() {
        config.namespace = cli.namespace;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    offers_utils::init_logging(config.log_format, &config.log_level);
    if let Some(ref path) = cli.config {
        tracing::debug!("loaded config from {}", path.display());
    }

    let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size_bytes())
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;

    let store: Box<dyn KeyValueStore> = match config.namespace.clone() {
        Some(namespace) => Box::new(NamespacedStore::new(namespace, env.kv_store())),
        None => Box::new(env.kv_store()),
    };
    let ledger = ReferralLedger::with_config(store, config.ledger.clone());

    let output = run(&ledger, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Execute one command and return its JSON result.
///
/// Ledger errors are classified through [`OffersError`]; a person without a
/// code is reported as [`OffersError::NoCode`].
fn run<S: KeyValueStore>(
    ledger: &ReferralLedger<S>,
    command: Command,
) -> Result<Value, OffersError> {
    tracing::debug!(?command, "running command");

    let output = match command {
        Command::CreateCode { person } => {
            let code = ledger.create_or_get_code(&PersonId::new(person.as_str()))?;
            json!({ "person": person, "code": code })
        }
        Command::Code { person } => {
            let code = ledger.get_code(&PersonId::new(person.as_str()))?;
            json!({ "person": person, "code": code })
        }
        Command::Owner { code } => {
            let owner = ledger.get_owner(&ReferralCode::new(code.as_str()))?;
            json!({ "code": code, "owner": owner })
        }
        Command::Refer { user, code } => {
            let recorded = ledger.record_referral(&PersonId::new(user), &ReferralCode::new(code))?;
            json!({ "recorded": recorded })
        }
        Command::Associate { code_a, code_b } => {
            let associated = ledger
                .associate_by_codes(&ReferralCode::new(code_a), &ReferralCode::new(code_b))?;
            json!({ "associated": associated })
        }
        Command::AssociatePeople { person_a, person_b } => {
            let associated =
                ledger.associate_by_people(&PersonId::new(person_a), &PersonId::new(person_b))?;
            json!({ "associated": associated })
        }
        Command::Referrals { code } => {
            let referrals = ledger.get_referral_list(&ReferralCode::new(code.as_str()))?;
            json!({ "code": code, "referrals": referrals })
        }
        Command::Referrer { person } => {
            let referrer = ledger.get_referrer(&PersonId::new(person.as_str()))?;
            json!({ "person": person, "referrer": referrer })
        }
        Command::Bonus { code } => {
            let bonus = ledger.get_bonus_credits(&ReferralCode::new(code.as_str()))?;
            json!({ "code": code, "bonus_credits": bonus })
        }
        Command::AdjustBonus { code, delta } => {
            let bonus = ledger.adjust_bonus_credits(&ReferralCode::new(code.as_str()), delta)?;
            json!({ "code": code, "bonus_credits": bonus })
        }
        Command::AdjustBonusPerson { person, delta } => {
            let bonus = ledger
                .adjust_bonus_credits_by_person(&PersonId::new(person.as_str()), delta)?
                .ok_or_else(|| OffersError::NoCode(person.clone()))?;
            json!({ "person": person, "bonus_credits": bonus })
        }
        Command::Credits { code } => {
            let total = ledger.get_total_credits(&ReferralCode::new(code.as_str()))?;
            json!({ "code": code, "total_credits": total })
        }
        Command::CreditsPerson { person } => {
            let total = ledger
                .get_total_credits_by_person(&PersonId::new(person.as_str()))?
                .ok_or_else(|| OffersError::NoCode(person.clone()))?;
            json!({ "person": person, "total_credits": total })
        }
        Command::Leaderboard { min_credits } => {
            serde_json::to_value(ledger.list_high_credit_codes(min_credits)?)
                .map_err(|e| OffersError::Other(e.to_string()))?
        }
    };
    Ok(output)
}
