//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap. Values given on the
//! command line override the config file.

use crate::bundler::ContentKind;
use clap::Parser;
use std::path::PathBuf;

/// Content-addressed asset bundler
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_assets",
    version,
    about = "Content-addressed asset bundler",
    long_about = "Concatenates source files into one content-named artifact.

Sources are deduplicated (first occurrence wins), optionally piped through a
transform command, hashed, and published atomically into the dist directory.
An artifact that already exists is never rewritten.

Usage:
  kodegen_bundler_assets --kind js --dist public/dist 'js/vendor/*.js' js/app.js
  kodegen_bundler_assets --kind css --dist public/dist --link --url-base /static css/site.css
  kodegen_bundler_assets --config assets.toml --file-list bundles/app.txt

Prints the artifact name (or tag with --link). Exit code 0 = artifact exists."
)]
pub struct Args {
    /// Source patterns, relative to the resource root
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Content kind: js, css, html, json, or a MIME type
    #[arg(short, long, value_name = "KIND", default_value = "js")]
    pub kind: ContentKind,

    /// Directory artifacts are published into
    #[arg(short, long, value_name = "DIR")]
    pub dist: Option<PathBuf>,

    /// Directory patterns are resolved against (default: current directory)
    #[arg(short = 'r', long, value_name = "DIR")]
    pub resource_root: Option<PathBuf>,

    /// URL prefix used with --link
    #[arg(short, long, value_name = "URL")]
    pub url_base: Option<String>,

    /// File listing one pattern per line (repeatable; read before PATTERNs)
    #[arg(short = 'f', long = "file-list", value_name = "FILE")]
    pub file_lists: Vec<PathBuf>,

    /// Print a <script>/<link> tag instead of the artifact name
    #[arg(short, long)]
    pub link: bool,

    /// Command each source is piped through (stdin to stdout)
    #[arg(short, long, value_name = "COMMAND")]
    pub transform: Option<String>,

    /// Ignore any existing artifact and rebuild
    #[arg(long)]
    pub reload_always: bool,

    /// TOML config file
    #[arg(short, long, value_name = "FILE", env = "KODEGEN_ASSETS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.patterns.is_empty() && self.file_lists.is_empty() {
            return Err("No sources given: pass PATTERNs or --file-list".to_string());
        }

        if self
            .transform
            .as_deref()
            .is_some_and(|t| t.trim().is_empty())
        {
            return Err("Transform command cannot be empty".to_string());
        }

        Ok(())
    }
}
