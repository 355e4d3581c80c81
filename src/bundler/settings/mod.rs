//! Configuration structures for bundle builds.
//!
//! This module provides the content kinds bundles are built for and the
//! [`Settings`] consumed by the [`Bundler`](crate::bundler::Bundler), along with
//! a builder that resolves relative directories.

mod builder;
mod core;
mod kind;

// Re-export all public types
pub use builder::SettingsBuilder;
pub use core::Settings;
pub use kind::{CSS_MIME_TYPE, ContentKind, JS_MIME_TYPE};
