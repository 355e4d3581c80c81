//! Content-addressed asset bundler
//!
//! This library concatenates ordered source files into immutable artifacts
//! named after their content:
//! - Script and stylesheet bundles (`jsbuild-<sha1>.js`, `cssbuild-<sha1>.css`)
//! - Optional per-kind transforms (minifiers and the like)
//! - Atomic publication and reuse of artifacts that already exist
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod source;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
