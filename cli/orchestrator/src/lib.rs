#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Command implementations behind the `sclkit` binary.

use std::path::PathBuf;

use thiserror::Error;

pub mod commands;
pub mod settings;

pub use commands::{
    run_all, run_arity, run_fetch_scl, run_matrix, run_overlap, run_validate, run_verify,
};
pub use settings::{PolicyChoice, Settings};

/// Exit status for a run whose required inputs could not be loaded.
pub const EXIT_INPUT_ERROR: u8 = 1;

/// Exit status for a strict run that found issues.
pub const EXIT_ISSUES: u8 = 2;

/// Errors that abort a command. Each maps to exit status 1.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// A required registry input is missing or malformed.
    #[error(transparent)]
    Registry(#[from] registry::RegistryError),
    /// An analysis phase failed or a report could not be written.
    #[error(transparent)]
    Analysis(#[from] analysis::AnalysisError),
    /// The HTTP backend could not be set up.
    #[error(transparent)]
    Transport(#[from] transport::TransportError),
    /// A document other than the SCL or interaction lists failed.
    #[error("{path}: {message}")]
    Document {
        /// Offending file
        path: PathBuf,
        /// Error message
        message: String,
    },
}

/// Result type alias for command execution.
pub type Result<T> = std::result::Result<T, CliError>;

/// What a completed command found.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Itemized issues across the reports written
    pub issues: usize,
    /// Reports written
    pub reports: Vec<PathBuf>,
}

impl Outcome {
    /// Process exit status: issues only fail a strict run.
    pub fn exit_code(&self, strict: bool) -> u8 {
        if strict && self.issues > 0 {
            EXIT_ISSUES
        } else {
            0
        }
    }
}
