//! Content-addressed bundle building.
//!
//! Concatenates ordered source files (optionally transformed) into immutable
//! artifacts named after their content, and reuses artifacts that already
//! exist.

pub mod builder;
pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod markup;
pub mod settings;
pub mod transform;

pub use builder::{Bundler, HashingWriter, Pipeline, build_file};
pub use cache::{CachePolicy, CacheStats, ReuseCache};
pub use error::{BuildError, Error, FileError, Result};
pub use fingerprint::{FingerprintEntry, FingerprintMap};
pub use settings::{CSS_MIME_TYPE, ContentKind, JS_MIME_TYPE, Settings, SettingsBuilder};
pub use transform::{CommandTransform, Transform, TransformRegistry};
