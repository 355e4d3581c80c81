//! Application-level error types.
//!
//! Engine failures come through [`crate::bundler::Error`]; this module wraps
//! them together with CLI and configuration problems.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the command line front end
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file errors
    #[error("Config error in {}: {source}", path.display())]
    Config {
        /// Config file path
        path: PathBuf,
        /// Parse failure
        #[source]
        source: toml::de::Error,
    },

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl BundlerError {
    /// Source files that could not be read, when this is a build failure.
    pub fn failed_sources(&self) -> Vec<PathBuf> {
        match self {
            Self::Bundler(crate::bundler::Error::Build(be)) => {
                be.paths().map(PathBuf::from).collect()
            }
            _ => Vec::new(),
        }
    }
}
