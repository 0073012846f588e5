//! Effective settings: the configuration file with command-line overrides applied.

use std::path::{Path, PathBuf};

use config::Config;
use registry::LoadMode;

/// Arity resolution policy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyChoice {
    /// Explicit count, then param-matrix override and default, then SCL
    Matrix,
    /// Explicit count, then SCL
    SelfDeclared,
}

/// Path flags that take precedence over `[paths]`.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    /// `--scl`
    pub scl: Option<PathBuf>,
    /// `--scl-fallback`
    pub scl_fallback: Option<PathBuf>,
    /// `--il-dir`
    pub il_dir: Option<PathBuf>,
    /// `--matrix`
    pub matrix: Option<PathBuf>,
    /// `--param-matrix`
    pub param_matrix: Option<PathBuf>,
    /// `--report-dir`
    pub report_dir: Option<PathBuf>,
    /// `--seed`
    pub seed: Option<PathBuf>,
}

/// Configuration in effect for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Loaded configuration with overrides applied
    pub config: Config,
    /// `--strict` was given
    pub strict: bool,
    /// How interaction lists are loaded; `--atomic-lists` selects atomic
    pub load_mode: LoadMode,
}

impl Settings {
    /// Apply `overrides` on top of `config`.
    pub fn new(mut config: Config, overrides: PathOverrides, strict: bool) -> Self {
        let paths = &mut config.paths;
        if let Some(p) = overrides.scl {
            paths.scl = p;
        }
        if let Some(p) = overrides.scl_fallback {
            paths.scl_fallback = Some(p);
        }
        if let Some(p) = overrides.il_dir {
            paths.interaction_lists = p;
        }
        if let Some(p) = overrides.matrix {
            paths.protocol_matrix = p;
        }
        if let Some(p) = overrides.param_matrix {
            paths.param_matrix = Some(p);
        }
        if let Some(p) = overrides.report_dir {
            paths.report_dir = p;
        }
        if let Some(p) = overrides.seed {
            paths.seed = p;
        }
        Self { config, strict, load_mode: LoadMode::Tolerant }
    }

    /// Fail on the first malformed interaction list instead of skipping it.
    pub fn with_atomic_lists(mut self, atomic: bool) -> Self {
        if atomic {
            self.load_mode = LoadMode::Atomic;
        }
        self
    }

    /// Directory reports are written to.
    pub fn report_dir(&self) -> &Path { &self.config.paths.report_dir }

    /// Strict gating for the verifier also honors `[verifier] strict`.
    pub fn verifier_strict(&self) -> bool { self.strict || self.config.verifier.strict }
}
