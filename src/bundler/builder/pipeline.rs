//! The bundle build pipeline.
//!
//! Concatenates an ordered, deduplicated list of sources (each optionally
//! transformed) into one artifact named after the SHA-1 of its manifest:
//!
//! ```text
//! <kind prefix>-<sha1(json manifest)><kind extension>
//! ```
//!
//! The manifest lists every distinct source with the SHA-1 of the bytes it
//! contributed, in first-seen order, so the name changes whenever the set of
//! files, their order, or their content changes.

use std::{
    collections::HashSet,
    ffi::OsStr,
    fs::File,
    io::{self, BufWriter, ErrorKind, Read, Write},
    path::Path,
};

use crate::bundler::{
    BuildError, ContentKind, Error, Result, error::ErrorExt, fingerprint::FingerprintMap,
    transform::Transform,
};

use super::{checksum::HashingWriter, publish};

const COPY_BUFFER_SIZE: usize = 8192;

/// One-shot bundle build configuration.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_assets::bundler::{ContentKind, Pipeline};
/// use std::path::Path;
///
/// # fn example() -> kodegen_bundler_assets::bundler::Result<()> {
/// let name = Pipeline::new(Path::new("public/dist"), &ContentKind::Script)
///     .build(None, &["assets/js/1.js", "assets/js/2.js"])?;
/// println!("built {name}");
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<'a> {
    dest_dir: &'a Path,
    kind: &'a ContentKind,
    transform: Option<&'a dyn Transform>,
    reload_always: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(dest_dir: &'a Path, kind: &'a ContentKind) -> Self {
        Self {
            dest_dir,
            kind,
            transform: None,
            reload_always: false,
        }
    }

    /// Transform applied to every source. `None` copies sources verbatim.
    pub fn transform(mut self, transform: Option<&'a dyn Transform>) -> Self {
        self.transform = transform;
        self
    }

    /// When set, a prior artifact is never trusted.
    pub fn reload_always(mut self, reload: bool) -> Self {
        self.reload_always = reload;
        self
    }

    /// Builds the bundle and returns the artifact's file name.
    ///
    /// If `prior` names an artifact that still exists in the destination
    /// directory, it is returned as-is without touching any source. The
    /// check is existence only; the artifact's content is not re-verified.
    /// A `prior` that is not a bare file name is ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::Build`] listing every source that could not be opened or
    ///   read; all sources are attempted first.
    /// - [`Error::Transform`] as soon as the transform fails on a source.
    /// - [`Error::Fs`] for staging or publishing failures.
    ///
    /// Nothing is published when an error is returned.
    pub fn build<S: AsRef<Path>>(&self, prior: Option<&str>, sources: &[S]) -> Result<String> {
        if let Some(prior) = self.reusable(prior) {
            return Ok(prior.to_string());
        }

        let mut staged = publish::stage(self.dest_dir, &self.kind.prefix())?;
        let staging_path = staged.path().to_path_buf();

        let mut manifest = FingerprintMap::new();
        let mut seen = HashSet::new();
        let mut failures = BuildError::new();
        {
            let mut out = BufWriter::new(staged.as_file_mut());
            for source in sources {
                let path = source.as_ref();
                if !seen.insert(path) {
                    continue;
                }

                let mut file = match File::open(path) {
                    Ok(file) => file,
                    Err(e) => {
                        log::debug!("Cannot open {}: {}", path.display(), e);
                        failures.push(path, e);
                        continue;
                    }
                };

                let mut hashing = HashingWriter::new(&mut out);
                match self.transform {
                    Some(transform) => transform
                        .transform(self.kind, &mut hashing, &mut file)
                        .map_err(|source| Error::Transform {
                            path: path.to_path_buf(),
                            kind: self.kind.mime().to_string(),
                            source,
                        })?,
                    None => match copy_source(&mut file, &mut hashing) {
                        Ok(()) => {}
                        Err(CopyError::Read(e)) => {
                            failures.push(path, e);
                            continue;
                        }
                        Err(CopyError::Write(e)) => {
                            return Err(e).fs_context("writing staging file", &staging_path);
                        }
                    },
                }
                manifest.push(path.to_string_lossy(), hashing.finish());
            }
            out.flush().fs_context("writing staging file", &staging_path)?;
        }
        failures.into_result()?;

        let name = self.kind.artifact_name(&manifest.manifest_digest()?);
        publish::publish(staged, self.dest_dir, &name)?;
        log::info!("Built {} from {} source(s)", name, manifest.len());
        Ok(name)
    }

    fn reusable<'p>(&self, prior: Option<&'p str>) -> Option<&'p str> {
        if self.reload_always {
            return None;
        }
        let prior = prior.filter(|p| !p.is_empty())?;
        // Only a bare file name can refer to an artifact in the destination.
        if Path::new(prior).file_name() != Some(OsStr::new(prior)) {
            log::debug!("Ignoring prior artifact name {prior:?}: not a file name");
            return None;
        }
        let existing = self.dest_dir.join(prior);
        match existing.try_exists() {
            Ok(true) => {
                log::debug!("Reusing {}", existing.display());
                Some(prior)
            }
            Ok(false) => None,
            Err(e) => {
                log::warn!(
                    "Cannot check prior artifact {}: {} (rebuilding)",
                    existing.display(),
                    e
                );
                None
            }
        }
    }
}

/// Builds a bundle with default options. See [`Pipeline::build`].
pub fn build_file<S: AsRef<Path>>(
    dest_dir: &Path,
    transform: Option<&dyn Transform>,
    kind: &ContentKind,
    prior: Option<&str>,
    sources: &[S],
) -> Result<String> {
    Pipeline::new(dest_dir, kind)
        .transform(transform)
        .build(prior, sources)
}

enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

/// `io::copy` that tells read failures (the source's fault) from write failures.
fn copy_source(input: &mut impl Read, output: &mut impl Write) -> std::result::Result<(), CopyError> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let n = match input.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        output.write_all(&buffer[..n]).map_err(CopyError::Write)?;
    }
}
