//! Builder for constructing Settings.

use super::Settings;
use crate::bundler::{
    cache::CachePolicy,
    error::{Context, ErrorExt},
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Relative directories are resolved against [`base_dir`](Self::base_dir),
/// which defaults to the current working directory.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_assets::bundler::{CachePolicy, SettingsBuilder};
/// use std::num::NonZeroUsize;
///
/// # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .base_dir("/srv/site")
///     .dist_root("public/dist")
///     .resource_root("assets")
///     .url_base("static")
///     .cache_policy(CachePolicy::Lru(NonZeroUsize::new(256).unwrap()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    base_dir: Option<PathBuf>,
    dist_root: Option<PathBuf>,
    resource_root: Option<PathBuf>,
    url_base: Option<String>,
    reload_always: bool,
    cache_policy: CachePolicy,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the directory relative roots are resolved against.
    ///
    /// Default: current working directory
    pub fn base_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory artifacts are published into.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn dist_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory source patterns are resolved against.
    ///
    /// Default: the base directory
    pub fn resource_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.resource_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the URL prefix used by the link helpers.
    ///
    /// Default: None (bare artifact names)
    pub fn url_base(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        self.url_base = (!root.is_empty()).then_some(root);
        self
    }

    /// Rebuild on every request instead of trusting prior artifacts.
    ///
    /// Default: false
    pub fn reload_always(mut self, reload: bool) -> Self {
        self.reload_always = reload;
        self
    }

    /// Sets the reuse cache growth policy.
    ///
    /// Default: [`CachePolicy::Unbounded`]
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `dist_root` is missing or the working directory
    /// cannot be determined.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        let base = match self.base_dir {
            Some(base) => base,
            None => std::env::current_dir().fs_context("reading working directory", ".")?,
        };
        let base = absolutize(&base, &base)?;

        let dist_root = self.dist_root.context("dist_root is required")?;
        let dist_root = absolutize(&dist_root, &base)?;
        let resource_root = match self.resource_root {
            Some(root) => absolutize(&root, &base)?,
            None => base,
        };

        Ok(Settings::new(
            dist_root,
            resource_root,
            self.url_base,
            self.reload_always,
            self.cache_policy,
        ))
    }
}

fn absolutize(path: &Path, base: &Path) -> crate::bundler::Result<PathBuf> {
    Ok(path
        .absolutize_from(base)
        .fs_context("resolving directory", path)?
        .into_owned())
}
