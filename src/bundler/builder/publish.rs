//! Atomic publication of built artifacts.
//!
//! Bundles are written into a hidden staging file inside the destination
//! directory, synced, and renamed over the final name in one step. Readers
//! see either no artifact or the complete one. Staging files that are not
//! published are deleted when dropped, whatever the exit path.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::bundler::{Result, error::ErrorExt};

/// Creates `dest_dir` (and ancestors) and a staging file inside it.
///
/// The staging file lives next to its final location so the publishing
/// rename never crosses filesystems.
pub fn stage(dest_dir: &Path, prefix: &str) -> Result<NamedTempFile> {
    std::fs::create_dir_all(dest_dir).fs_context("creating destination directory", dest_dir)?;
    tempfile::Builder::new()
        .prefix(&format!(".{prefix}-"))
        .suffix(".tmp")
        .tempfile_in(dest_dir)
        .fs_context("creating staging file in", dest_dir)
}

/// Syncs `staged` and atomically renames it to `<dest_dir>/<name>`.
///
/// An existing artifact of the same name is replaced; names are content
/// hashes, so the bytes are the same.
pub fn publish(staged: NamedTempFile, dest_dir: &Path, name: &str) -> Result<PathBuf> {
    let target = dest_dir.join(name);

    staged
        .as_file()
        .sync_all()
        .fs_context("syncing staging file", staged.path())?;
    make_world_readable(&staged)?;

    // On failure the PersistError owns the staging file and deletes it on drop.
    staged
        .persist(&target)
        .map_err(|e| e.error)
        .fs_context("publishing artifact", &target)?;

    sync_dir(dest_dir);
    log::debug!("Published {}", target.display());
    Ok(target)
}

/// Staging files are created `0600`; artifacts are served to others.
#[cfg(unix)]
fn make_world_readable(staged: &NamedTempFile) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    staged
        .as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))
        .fs_context("setting permissions on", staged.path())
}

#[cfg(not(unix))]
fn make_world_readable(_staged: &NamedTempFile) -> Result<()> {
    Ok(())
}

/// Best effort: persist the rename itself.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = std::fs::File::open(dir).and_then(|d| d.sync_all()) {
        log::debug!("Could not sync directory {}: {}", dir.display(), e);
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn stage_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("deeply").join("nested").join("dist");
        let staged = stage(&dest, "jsbuild").unwrap();
        assert!(dest.is_dir());
        assert_eq!(staged.path().parent(), Some(dest.as_path()));
    }

    #[test]
    fn publish_moves_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = stage(dir.path(), "jsbuild").unwrap();
        staged.write_all(b"alert(1);").unwrap();

        let target = publish(staged, dir.path(), "jsbuild-abc.js").unwrap();
        assert_eq!(target, dir.path().join("jsbuild-abc.js"));
        assert_eq!(std::fs::read(&target).unwrap(), b"alert(1);");
        assert_eq!(entries(dir.path()), vec!["jsbuild-abc.js"]);
    }

    #[test]
    fn publish_replaces_same_name() {
        let dir = tempfile::tempdir().unwrap();
        for _ in 0..2 {
            let mut staged = stage(dir.path(), "cssbuild").unwrap();
            staged.write_all(b"body{}").unwrap();
            publish(staged, dir.path(), "cssbuild-1.css").unwrap();
        }
        assert_eq!(entries(dir.path()), vec!["cssbuild-1.css"]);
    }

    #[test]
    fn dropped_staging_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut staged = stage(dir.path(), "jsbuild").unwrap();
            staged.write_all(b"partial").unwrap();
        }
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn failed_publish_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way makes the rename fail.
        std::fs::create_dir(dir.path().join("jsbuild-x.js")).unwrap();
        std::fs::write(dir.path().join("jsbuild-x.js").join("keep"), b"").unwrap();

        let staged = stage(dir.path(), "jsbuild").unwrap();
        assert!(publish(staged, dir.path(), "jsbuild-x.js").is_err());
        assert_eq!(entries(dir.path()), vec!["jsbuild-x.js"]);
    }

    #[cfg(unix)]
    #[test]
    fn published_artifacts_are_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let staged = stage(dir.path(), "jsbuild").unwrap();
        let target = publish(staged, dir.path(), "jsbuild-p.js").unwrap();
        let mode = std::fs::metadata(target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
