//! Bundle building and session orchestration.
//!
//! This module provides the main [`Bundler`] session along with the one-shot
//! [`Pipeline`] it drives.
//!
//! # Overview
//!
//! A build:
//! 1. Short-circuits on a prior artifact that still exists
//! 2. Streams each distinct source (first occurrence wins) through the
//!    transform into a staging file, hashing it on the way
//! 3. Collects unreadable sources and fails if there were any
//! 4. Names the artifact after the SHA-1 of the ordered manifest
//! 5. Renames the staging file into place atomically
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_assets::bundler::{Bundler, ContentKind, SettingsBuilder};
//!
//! # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .dist_root("public/dist")
//!     .build()?;
//! let bundler = Bundler::new(settings);
//!
//! let name = bundler.build_bundle(&ContentKind::Stylesheet, &["css/*.css"])?;
//! println!("Created: {}", bundler.artifact_url(&name));
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`checksum`] - Streaming SHA-1 of source content
//! - [`orchestrator`] - Main [`Bundler`] session and reuse cache handling
//! - [`pipeline`] - The build itself
//! - [`publish`] - Staging files and the atomic rename

mod checksum;
mod orchestrator;
mod pipeline;
mod publish;

pub use checksum::HashingWriter;
pub use orchestrator::Bundler;
pub use pipeline::{Pipeline, build_file};
