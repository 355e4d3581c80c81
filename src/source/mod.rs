//! Source list resolution.
//!
//! Turns the patterns a caller asks for into the ordered list of files handed
//! to the bundle pipeline. A pattern that matches nothing is a warning, not an
//! error: empty source lists are valid bundles.

use std::path::{Path, PathBuf};

use crate::bundler::{Result, error::ErrorExt};

/// Expands every pattern relative to `base`, preserving pattern order.
///
/// Matches of a single pattern come back sorted. Absolute patterns ignore
/// `base`. A pattern that is not valid glob syntax is taken as a literal path.
pub fn expand_patterns<S: AsRef<str>>(base: &Path, patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        files.extend(expand_pattern(base, pattern.as_ref())?);
    }
    Ok(files)
}

/// Expands one pattern relative to `base`.
pub fn expand_pattern(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let Some(base) = base.to_str() else {
            crate::bail!("base directory is not valid UTF-8: {}", base.display());
        };
        // Metacharacters in the base directory itself must match literally.
        let escaped = glob::Pattern::escape(base);
        Path::new(&escaped).join(pattern).to_string_lossy().into_owned()
    };

    let paths = match glob::glob(&full) {
        Ok(paths) => paths,
        Err(e) => {
            log::debug!("{full} is not a valid pattern ({e}); using it as a path");
            return Ok(vec![base.join(pattern)]);
        }
    };

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => log::warn!("Skipping unreadable match for {full}: {e}"),
        }
    }
    if matches.is_empty() {
        log::warn!("Pattern {full} did not match any files");
    }
    Ok(matches)
}

/// Reads a list file: one pattern per line.
///
/// Blank lines and lines starting with `#` are skipped. Lines starting with
/// `.` are relative to the list file's directory, absolute lines are used
/// as-is, and everything else is relative to `resource_root`.
pub fn parse_file_list(list: &Path, resource_root: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(list).fs_context("reading file list", list)?;
    let list_dir = list.parent().unwrap_or_else(|| Path::new(""));

    let mut files = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let base = if line.starts_with('.') {
            list_dir
        } else {
            resource_root
        };
        files.extend(expand_pattern(base, line)?);
    }
    Ok(files)
}
