//! Core Settings struct and implementations.

use crate::bundler::cache::CachePolicy;
use std::path::{Path, PathBuf};

/// Main settings for bundle builds.
///
/// Constructed via [`SettingsBuilder`]. All directories are absolute once built.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_assets::bundler::SettingsBuilder;
///
/// # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .dist_root("public/dist")
///     .resource_root("assets")
///     .url_base("/static")
///     .build()?;
/// assert!(settings.dist_root().is_absolute());
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`SettingsBuilder`] - Builder for constructing Settings
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory artifacts are published into.
    dist_root: PathBuf,

    /// Directory source patterns are resolved against.
    resource_root: PathBuf,

    /// Prefix joined in front of artifact names in generated markup.
    url_base: Option<String>,

    /// Ignore prior artifacts and rebuild on every request.
    reload_always: bool,

    /// Reuse cache growth policy.
    cache_policy: CachePolicy,
}

impl Settings {
    /// Returns the destination directory for published artifacts.
    pub fn dist_root(&self) -> &Path {
        &self.dist_root
    }

    /// Returns the directory source patterns are resolved against.
    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    /// Returns the URL prefix for generated markup, if any.
    pub fn url_base(&self) -> Option<&str> {
        self.url_base.as_deref()
    }

    /// Whether prior artifacts are ignored.
    pub fn reload_always(&self) -> bool {
        self.reload_always
    }

    /// Returns the reuse cache policy.
    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        dist_root: PathBuf,
        resource_root: PathBuf,
        url_base: Option<String>,
        reload_always: bool,
        cache_policy: CachePolicy,
    ) -> Self {
        Self {
            dist_root,
            resource_root,
            url_base,
            reload_always,
            cache_policy,
        }
    }
}
