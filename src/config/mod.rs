//! Config file loading.
//!
//! An optional TOML file supplies defaults for the command line:
//!
//! ```toml
//! [bundle]
//! dist_root = "public/dist"
//! resource_root = "assets"
//! url_base = "/static"
//! reload_always = false
//! cache_capacity = 512
//!
//! [bundle.transforms]
//! js = "terser --compress"
//! css = "csso"
//! ```
//!
//! Relative directories are resolved against the directory holding the file.

use crate::error::{BundlerError, Result};
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Parsed config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetsConfig {
    /// `[bundle]` table
    #[serde(default)]
    pub bundle: BundleConfig,
}

/// `[bundle]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    /// Where artifacts are published.
    pub dist_root: Option<PathBuf>,

    /// Where source patterns are resolved.
    pub resource_root: Option<PathBuf>,

    /// URL prefix for generated markup.
    pub url_base: Option<String>,

    /// Rebuild on every request.
    pub reload_always: Option<bool>,

    /// Bound on reuse cache entries; unbounded when absent.
    pub cache_capacity: Option<usize>,

    /// Content kind (short name or MIME type) → transform command line.
    #[serde(default)]
    pub transforms: BTreeMap<String, String>,
}

/// Loads and parses a config file, resolving its directories.
pub fn load_config(path: &Path) -> Result<AssetsConfig> {
    let content = std::fs::read_to_string(path)?;
    let mut config: AssetsConfig =
        toml::from_str(&content).map_err(|source| BundlerError::Config {
            path: path.to_path_buf(),
            source,
        })?;

    let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config_dir = config_dir.absolutize()?.into_owned();
    let bundle = &mut config.bundle;
    for dir in [&mut bundle.dist_root, &mut bundle.resource_root]
        .into_iter()
        .flatten()
    {
        *dir = dir.absolutize_from(&config_dir)?.into_owned();
    }
    Ok(config)
}
