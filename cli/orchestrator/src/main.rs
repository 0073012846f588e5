//! `sclkit` command-line entry point.
//!
//! Loads configuration, applies flag overrides and dispatches to one of the
//! consistency checks. Reports land in the report directory; the process
//! exits 1 when a required input cannot be loaded and 2 when `--strict` is
//! given and issues were found.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::Config;
use sclkit_cli::settings::PathOverrides;
use sclkit_cli::{
    run_all, run_arity, run_fetch_scl, run_matrix, run_overlap, run_validate, run_verify,
    PolicyChoice, Settings, EXIT_INPUT_ERROR,
};

#[derive(Parser)]
#[command(
    name = "sclkit",
    version,
    about = "Consistency checks for Smart Contract Lists and interaction lists"
)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,

    /// Exit with status 2 when any issue is found
    #[arg(long, global = true)]
    strict: bool,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Primary SCL file
    #[arg(long, global = true)]
    scl: Option<PathBuf>,

    /// SCL file used when the primary is missing
    #[arg(long, global = true)]
    scl_fallback: Option<PathBuf>,

    /// Directory of interaction list files
    #[arg(long, global = true)]
    il_dir: Option<PathBuf>,

    /// Protocol-interaction matrix file
    #[arg(long, global = true)]
    matrix: Option<PathBuf>,

    /// Fail when any interaction list is malformed instead of skipping it
    #[arg(long, global = true)]
    atomic_lists: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check interaction references against the SCL
    Validate,
    /// Check the protocol-interaction matrix against interaction lists
    Matrix,
    /// Audit argument counts of every interaction
    Arity {
        /// Arity resolution policy
        #[arg(long, value_enum)]
        policy: Option<PolicyChoice>,
        /// Param matrix with per-type defaults and per-platform overrides
        #[arg(long)]
        param_matrix: Option<PathBuf>,
    },
    /// Report platform/token overlap and shared routes
    Overlap,
    /// Verify referenced modules and functions against a live node
    Verify {
        /// Network key from the configuration
        #[arg(long)]
        network: Option<String>,
        /// Wallet whose recent transactions are inspected (repeatable)
        #[arg(long = "wallet")]
        wallets: Vec<String>,
        /// Transactions fetched per wallet
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Build an SCL from a seed list of deployer addresses
    FetchScl {
        /// Network key from the configuration
        #[arg(long)]
        network: Option<String>,
        /// Seed list file
        #[arg(long)]
        seed: Option<PathBuf>,
        /// Where to write the generated SCL
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run every offline check
    All,
}

impl Cli {
    fn overrides(&self) -> PathOverrides {
        let (param_matrix, seed) = match &self.command {
            Command::Arity { param_matrix, .. } => (param_matrix.clone(), None),
            Command::FetchScl { seed, .. } => (None, seed.clone()),
            _ => (None, None),
        };
        PathOverrides {
            scl: self.scl.clone(),
            scl_fallback: self.scl_fallback.clone(),
            il_dir: self.il_dir.clone(),
            matrix: self.matrix.clone(),
            param_matrix,
            report_dir: self.report_dir.clone(),
            seed,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_INPUT_ERROR);
        }
    };

    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    if let Err(e) = logging::init(&level, config.logging.file.as_deref()) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let settings =
        Settings::new(config, cli.overrides(), cli.strict).with_atomic_lists(cli.atomic_lists);
    let strict = match cli.command {
        Command::Verify { .. } => settings.verifier_strict(),
        _ => settings.strict,
    };

    let result = match cli.command {
        Command::Validate => run_validate(&settings),
        Command::Matrix => run_matrix(&settings),
        Command::Arity { policy, .. } => run_arity(&settings, policy),
        Command::Overlap => run_overlap(&settings),
        Command::Verify { network, wallets, limit } => {
            run_verify(&settings, network, wallets, limit).await
        }
        Command::FetchScl { network, output, .. } => {
            run_fetch_scl(&settings, network, output).await
        }
        Command::All => run_all(&settings),
    };

    match result {
        Ok(outcome) => ExitCode::from(outcome.exit_code(strict)),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(EXIT_INPUT_ERROR)
        }
    }
}
