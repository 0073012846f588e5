#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! sclkit Configuration
//!
//! Loading, saving and defaults for the TOML file that tells the tools:
//! - where the registry documents live and where reports go
//! - how to log
//! - which network, wallets and limits the on-chain verifier uses
//! - the REST endpoint for each known network
//!
//! Every value can be overridden from the command line; the file only
//! supplies defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::Network;

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// The requested network key has no `[networks.<key>]` entry
    #[error("Unknown network '{0}'")]
    UnknownNetwork(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub paths: PathsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// On-chain verifier settings
    pub verifier: VerifierConfig,
    /// Network endpoints keyed by network key (`movement_mainnet`, ...)
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// Document locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Primary Smart Contract List
    pub scl: PathBuf,
    /// Used when the primary SCL does not exist
    pub scl_fallback: Option<PathBuf>,
    /// Directory of per-token interaction lists
    pub interaction_lists: PathBuf,
    /// Protocol-interaction matrix
    pub protocol_matrix: PathBuf,
    /// Arity defaults and overrides for the matrix policy
    pub param_matrix: Option<PathBuf>,
    /// Where reports are written
    pub report_dir: PathBuf,
    /// Seed list for the SCL fetcher
    pub seed: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (debug, info, warn, error)
    pub level: String,
    /// Log file path (optional)
    pub file: Option<PathBuf>,
}

/// On-chain verifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Key into `networks`
    pub network: String,
    /// Reference wallets whose recent transactions are sampled
    pub wallets: Vec<String>,
    /// Transactions fetched per wallet
    pub tx_limit: usize,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Non-zero exit when any issue is reported
    pub strict: bool,
}

/// One chain network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Display name
    pub name: String,
    /// REST base URL, including the `/v1` prefix
    pub rpc_url: String,
    /// Chain id written into generated documents
    pub chain_id: u64,
}

impl From<Network> for NetworkConfig {
    fn from(network: Network) -> Self {
        Self {
            name: network.display_name().to_string(),
            rpc_url: network.default_rpc_url().to_string(),
            chain_id: network.chain_id(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.fill_builtin_networks();
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else the default path if
    /// it exists, else the built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/sclkit/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("sclkit");
        Ok(config_dir.join("config.toml"))
    }

    /// Endpoint settings for `key`
    pub fn network(&self, key: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks.get(key).ok_or_else(|| ConfigError::UnknownNetwork(key.to_string()))
    }

    /// Built-in networks missing from the file keep their defaults;
    /// entries present in the file win.
    fn fill_builtin_networks(&mut self) {
        for network in Network::ALL {
            self.networks.entry(network.as_str().to_string()).or_insert_with(|| network.into());
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            paths: PathsConfig::default(),
            logging: LoggingConfig::default(),
            verifier: VerifierConfig::default(),
            networks: BTreeMap::new(),
        };
        config.fill_builtin_networks();
        config
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            scl: PathBuf::from("scl/smart_contract_list.json"),
            scl_fallback: Some(PathBuf::from("scl/smart_contract_list.generated.json")),
            interaction_lists: PathBuf::from("interaction_lists"),
            protocol_matrix: PathBuf::from("protocol_interaction_matrix.json"),
            param_matrix: None,
            report_dir: PathBuf::from("reports"),
            seed: PathBuf::from("seed.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), file: None } }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            network: Network::MovementMainnet.as_str().to_string(),
            wallets: Vec::new(),
            tx_limit: 25,
            timeout_secs: 15,
            strict: false,
        }
    }
}
