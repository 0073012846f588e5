#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup and helpers shared by the sclkit crates.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Errors raised while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The level string is not a valid filter directive
    #[error("invalid log filter '{0}': {1}")]
    Filter(String, String),
    /// The log file could not be opened for appending
    #[error("cannot open log file {path}: {source}")]
    File {
        /// Log file path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A global subscriber is already installed
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter for `level`. `RUST_LOG` takes precedence when set.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError::Filter(level.to_string(), e.to_string()))
}

/// Install the global subscriber.
///
/// Output goes to stderr, or is appended to `file` without ANSI colors when
/// one is given. Reports and command output own stdout.
pub fn init(level: &str, file: Option<&Path>) -> Result<(), LoggingError> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match file {
        Some(path) => {
            let handle = OpenOptions::new().create(true).append(true).open(path).map_err(
                |source| LoggingError::File { path: path.display().to_string(), source },
            )?;
            builder.with_ansi(false).with_writer(Mutex::new(handle)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Emits a trace-level event tagged with a module prefix.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!("[{}] {}", module, msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = build_filter("sclkit=notalevel").expect_err("invalid directive");
        assert!(matches!(err, LoggingError::Filter(..)));
    }

    #[test]
    fn accepts_plain_level() {
        assert!(build_filter("debug").is_ok());
    }

    #[test]
    fn unopenable_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = init("info", Some(&dir.path().join("missing").join("log.txt")))
            .expect_err("parent dir does not exist");
        assert!(matches!(err, LoggingError::File { .. }));
    }
}
