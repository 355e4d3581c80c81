//! Error types for bundle builds.
//!
//! Source read failures are collected into a [`BuildError`] so that one bad
//! input does not hide the others. Everything else (transform failures,
//! staging and publish failures) aborts the build immediately.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

/// Result alias used throughout the bundler.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building or publishing a bundle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error tied to a specific path.
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being attempted.
        context: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// One or more sources could not be read.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The transform capability rejected a source file.
    #[error("transform for {kind} failed on {}: {source}", path.display())]
    Transform {
        /// Source file that was being transformed.
        path: PathBuf,
        /// MIME type of the bundle.
        kind: String,
        /// Error reported by the transform.
        #[source]
        source: anyhow::Error,
    },

    /// The manifest could not be serialized.
    #[error("failed to serialize bundle manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A transform was registered twice for the same content type.
    #[error("transform for \u{201c}{0}\u{201d} already provided")]
    DuplicateTransform(String),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

/// A single source that could not be read.
#[derive(Debug, thiserror::Error)]
#[error("{}: \u{201c}{source}\u{201d}", path.display())]
pub struct FileError {
    /// The source reference as requested.
    pub path: PathBuf,
    /// Why it could not be read.
    #[source]
    pub source: io::Error,
}

/// Aggregate of every source that failed during one build.
///
/// A build that produces a non-empty `BuildError` publishes nothing.
#[derive(Debug, Default)]
pub struct BuildError {
    failures: Vec<FileError>,
}

impl BuildError {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failed source and keeps going.
    pub fn push(&mut self, path: impl Into<PathBuf>, source: io::Error) {
        self.failures.push(FileError {
            path: path.into(),
            source,
        });
    }

    /// Returns true when no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of failed sources.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// The failures, in the order the sources were attempted.
    pub fn failures(&self) -> &[FileError] {
        &self.failures
    }

    /// Paths of every failed source.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.failures.iter().map(|f| f.path.as_path())
    }

    /// Converts into `Err` if anything was recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Build(self))
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to read {} source file(s): {{ ",
            self.failures.len()
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{failure}")?;
        }
        f.write_str(" }")
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|f| f as &(dyn std::error::Error + 'static))
    }
}

/// Attaches a path and a description to raw I/O errors.
pub trait ErrorExt<T> {
    /// Wraps the error as [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Turns a missing value into a [`Error::GenericError`].
pub trait Context<T> {
    /// Fails with `msg` when the value is absent.
    fn context(self, msg: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)).into())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "file not found")
    }

    #[test]
    fn empty_aggregate_is_ok() {
        assert!(BuildError::new().into_result().is_ok());
    }

    #[test]
    fn aggregate_lists_every_failure() {
        let mut be = BuildError::new();
        be.push("assets/js/3.js", not_found());
        be.push("assets/js/9.js", not_found());
        assert_eq!(be.len(), 2);

        let msg = be.to_string();
        assert!(msg.starts_with("failed to read 2 source file(s)"));
        assert!(msg.contains("assets/js/3.js"));
        assert!(msg.contains("assets/js/9.js"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn aggregate_into_result_fails() {
        let mut be = BuildError::new();
        be.push("missing.css", not_found());
        match be.into_result() {
            Err(Error::Build(be)) => {
                let paths: Vec<_> = be.paths().collect();
                assert_eq!(paths, vec![Path::new("missing.css")]);
            }
            other => panic!("expected build error, got {other:?}"),
        }
    }

    #[test]
    fn fs_context_keeps_path() {
        let res: std::result::Result<(), io::Error> = Err(not_found());
        let err = res.fs_context("opening", "/tmp/x.js").unwrap_err();
        assert_eq!(err.to_string(), "opening /tmp/x.js: file not found");
    }

    #[test]
    fn option_context() {
        let none: Option<u8> = None;
        let err = none.context("dist root is required").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "dist root is required"));
    }
}
