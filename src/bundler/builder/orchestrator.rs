//! Main bundler session.
//!
//! This module provides the [`Bundler`] that owns the configuration, the
//! transform registry and the reuse cache, and answers "give me the current
//! artifact for these files" for every render.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    bundler::{
        CSS_MIME_TYPE, ContentKind, Error, JS_MIME_TYPE, Result, Settings,
        cache::ReuseCache,
        markup,
        transform::{Transform, TransformRegistry},
    },
    source,
};

use super::pipeline::Pipeline;

/// Bundle session shared by every request of a process.
///
/// The only state shared between concurrent requests is the [`ReuseCache`];
/// builds themselves run on the calling thread. Two concurrent requests for
/// the same sources may both build; they publish the same name and the
/// second rename is harmless.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_assets::bundler::{Bundler, SettingsBuilder};
///
/// # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .dist_root("public/dist")
///     .resource_root("assets")
///     .url_base("static")
///     .build()?;
/// let bundler = Bundler::new(settings);
///
/// let name = bundler.build_script(&["js/vendor/*.js", "js/app.js"])?;
/// let tag = bundler.link_script("css/reset.css, css/site.css")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
    transforms: TransformRegistry,
    cache: ReuseCache,
}

impl Bundler {
    /// Creates a bundler with no transforms.
    pub fn new(settings: Settings) -> Self {
        Self::with_transforms(settings, TransformRegistry::new())
    }

    pub fn with_transforms(settings: Settings, transforms: TransformRegistry) -> Self {
        let cache = ReuseCache::new(settings.cache_policy());
        Self {
            settings,
            transforms,
            cache,
        }
    }

    /// Registers a transform for one content kind.
    pub fn register_transform(
        &mut self,
        kind: &ContentKind,
        transform: Arc<dyn Transform>,
    ) -> Result<()> {
        self.transforms.register(kind, transform)
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &ReuseCache {
        &self.cache
    }

    /// Expands `patterns` against the resource root and builds them.
    pub fn build_bundle<S: AsRef<str>>(&self, kind: &ContentKind, patterns: &[S]) -> Result<String> {
        let sources = source::expand_patterns(self.settings.resource_root(), patterns)?;
        self.build_files(kind, &sources)
    }

    /// Builds already-resolved sources, consulting the reuse cache first.
    ///
    /// The cache hit (if any) is only a hint: the pipeline reuses it only
    /// while the artifact still exists.
    pub fn build_files<P: AsRef<Path>>(&self, kind: &ContentKind, sources: &[P]) -> Result<String> {
        let key = request_key(kind, sources);
        let prior = self.cache.lookup(&key);

        let name = Pipeline::new(self.settings.dist_root(), kind)
            .transform(self.transforms.get(kind))
            .reload_always(self.settings.reload_always())
            .build(prior.as_deref(), sources)?;

        if prior.as_deref() != Some(name.as_str()) {
            self.cache.record(key, name.as_str());
        }
        Ok(name)
    }

    /// Builds a `text/javascript` bundle.
    pub fn build_script<S: AsRef<str>>(&self, patterns: &[S]) -> Result<String> {
        self.build_bundle(&ContentKind::from_mime(JS_MIME_TYPE), patterns)
    }

    /// Builds a `text/css` bundle.
    pub fn build_stylesheet<S: AsRef<str>>(&self, patterns: &[S]) -> Result<String> {
        self.build_bundle(&ContentKind::from_mime(CSS_MIME_TYPE), patterns)
    }

    /// Builds a bundle from a comma-separated list and returns its markup.
    pub fn link(&self, kind: &ContentKind, list: &str) -> Result<String> {
        let patterns = markup::split_file_list(list);
        let name = self.build_bundle(kind, &patterns)?;
        Ok(markup::tag_for(kind, &self.artifact_url(&name)))
    }

    /// `<script>` tag for a comma-separated list of script patterns.
    pub fn link_script(&self, list: &str) -> Result<String> {
        self.link(&ContentKind::Script, list)
    }

    /// `<link>` tag for a comma-separated list of stylesheet patterns.
    pub fn link_stylesheet(&self, list: &str) -> Result<String> {
        self.link(&ContentKind::Stylesheet, list)
    }

    /// URL for an artifact name, prefixed with the configured URL base.
    pub fn artifact_url(&self, name: &str) -> String {
        markup::artifact_url(self.settings.url_base(), name)
    }

    /// [`build_files`](Self::build_files) on tokio's blocking pool.
    pub async fn build_files_async(
        self: Arc<Self>,
        kind: ContentKind,
        sources: Vec<PathBuf>,
    ) -> Result<String> {
        tokio::task::spawn_blocking(move || self.build_files(&kind, &sources))
            .await
            .map_err(|e| Error::GenericError(format!("Bundle build task panicked: {}", e)))?
    }

    /// [`build_bundle`](Self::build_bundle) on tokio's blocking pool.
    pub async fn build_bundle_async(
        self: Arc<Self>,
        kind: ContentKind,
        patterns: Vec<String>,
    ) -> Result<String> {
        tokio::task::spawn_blocking(move || self.build_bundle(&kind, &patterns))
            .await
            .map_err(|e| Error::GenericError(format!("Bundle build task panicked: {}", e)))?
    }
}

/// Reuse cache key: the request's path-list fingerprint, namespaced by kind
/// so the same files bundled as different kinds do not share an entry.
fn request_key<P: AsRef<Path>>(kind: &ContentKind, sources: &[P]) -> String {
    let paths: Vec<_> = sources
        .iter()
        .map(|s| s.as_ref().to_string_lossy())
        .collect();
    format!("{}:{}", kind.mime(), ReuseCache::request_key(&paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::SettingsBuilder;

    fn bundler(dir: &Path) -> Bundler {
        let settings = SettingsBuilder::new()
            .base_dir(dir)
            .dist_root("dist")
            .resource_root("assets")
            .url_base("static")
            .build()
            .unwrap();
        Bundler::new(settings)
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join("assets").join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn request_key_is_namespaced_by_kind() {
        let sources = [PathBuf::from("a.txt")];
        assert_ne!(
            request_key(&ContentKind::Script, &sources),
            request_key(&ContentKind::Stylesheet, &sources)
        );
    }

    #[test]
    fn records_new_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js/1.js", "alert(1);");
        let b = bundler(dir.path());

        let first = b.build_script(&["js/*.js"]).unwrap();
        assert_eq!(b.cache().len(), 1);
        assert!(dir.path().join("dist").join(&first).is_file());

        let second = b.build_script(&["js/*.js"]).unwrap();
        assert_eq!(first, second);
        assert_eq!(b.cache().stats().hits, 1);
    }

    #[test]
    fn cached_name_is_reused_while_artifact_exists() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js/1.js", "alert(1);");
        let b = bundler(dir.path());

        let first = b.build_script(&["js/1.js"]).unwrap();
        // Without reload, an edit is not picked up while the artifact exists.
        write(dir.path(), "js/1.js", "alert(2);");
        assert_eq!(b.build_script(&["js/1.js"]).unwrap(), first);

        // Removing the artifact forces a rebuild with the new content.
        std::fs::remove_file(dir.path().join("dist").join(&first)).unwrap();
        let rebuilt = b.build_script(&["js/1.js"]).unwrap();
        assert_ne!(rebuilt, first);
        assert_eq!(b.cache().len(), 1);
    }

    #[test]
    fn reload_always_picks_up_edits() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "css/a.css", "a{}");
        let settings = SettingsBuilder::new()
            .base_dir(dir.path())
            .dist_root("dist")
            .resource_root("assets")
            .reload_always(true)
            .build()
            .unwrap();
        let b = Bundler::new(settings);

        let first = b.build_stylesheet(&["css/a.css"]).unwrap();
        write(dir.path(), "css/a.css", "b{}");
        let second = b.build_stylesheet(&["css/a.css"]).unwrap();
        assert_ne!(first, second);
        assert!(second.starts_with("cssbuild-"));
    }

    #[test]
    fn link_helpers_prefix_url_base() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js/1.js", "alert(1);");
        write(dir.path(), "css/a.css", "a{}");
        let b = bundler(dir.path());

        let script = b.link_script(" js/1.js , ").unwrap();
        assert!(script.starts_with(r#"<script type="text/javascript" src="static/jsbuild-"#));
        assert!(script.ends_with(r#".js"></script>"#));

        let css = b.link_stylesheet("css/a.css").unwrap();
        assert!(css.starts_with(r#"<link rel="stylesheet" type="text/css" href="static/cssbuild-"#));
    }

    #[test]
    fn transforms_apply_per_kind() {
        use std::io::{Read, Write};

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js/1.js", "alert( 1 );");
        let mut b = bundler(dir.path());
        let strip = |_: &ContentKind,
                     out: &mut dyn Write,
                     input: &mut dyn Read|
         -> anyhow::Result<()> {
            let mut s = String::new();
            input.read_to_string(&mut s)?;
            out.write_all(s.replace(' ', "").as_bytes())?;
            Ok(())
        };
        b.register_transform(&ContentKind::Script, Arc::new(strip))
            .unwrap();

        let name = b.build_script(&["js/1.js"]).unwrap();
        let built = std::fs::read_to_string(dir.path().join("dist").join(name)).unwrap();
        assert_eq!(built, "alert(1);");
    }

    #[tokio::test]
    async fn async_build() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js/1.js", "alert(1);");
        let b = Arc::new(bundler(dir.path()));

        let name = Arc::clone(&b)
            .build_bundle_async(ContentKind::Script, vec!["js/1.js".into()])
            .await
            .unwrap();
        assert_eq!(name, b.build_script(&["js/1.js"]).unwrap());
    }
}
