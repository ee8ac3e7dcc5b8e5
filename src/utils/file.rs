use crate::models::error::SError;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub struct FileUtils;

impl FileUtils {
    /// Copies the tree below `src` into `dst`, creating folders as needed.
    /// Existing files at the destination are overwritten.
    pub fn copy_recursive(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        fs::create_dir_all(dst)?;

        for entry in WalkDir::new(src) {
            let entry = entry?;
            let src_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                SError::ParseError(format!("Invalid UTF-8 path: {:?}", entry.path()))
            })?;
            let dst_path = dst.join(src_path.strip_prefix(src)?);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dst_path)?;
            } else {
                if let Some(parent) = dst_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(src_path, &dst_path)?;
            }
        }

        Ok(())
    }

    /// Copies a file or a whole directory to `dst`, which must not exist yet.
    pub fn copy_path(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        if dst.exists() {
            return Err(SError::NameCollision(dst.to_string()));
        }
        if src.is_dir() {
            Self::copy_recursive(src, dst)
        } else {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(src, dst)?;
            Ok(())
        }
    }

    /// Removes a file or a directory tree.
    pub fn remove_path(path: &Utf8Path) -> Result<(), SError> {
        let meta = fs::symlink_metadata(path)?;
        if meta.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// File size, or the sum of every file below a directory.
    pub fn size_of(path: &Utf8Path) -> Option<u64> {
        let meta = fs::metadata(path).ok()?;
        if meta.is_file() {
            return Some(meta.len());
        }

        Some(
            WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| e.metadata().ok())
                .map(|m| m.len())
                .sum(),
        )
    }

    /// Moves `src` to `dst`. Rename first; across devices fall back to
    /// copy-then-delete so the source only disappears once the copy is complete.
    pub fn move_path(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        if dst.exists() {
            return Err(SError::NameCollision(dst.to_string()));
        }
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }

        match fs::rename(src, dst) {
            Ok(()) => Ok(()),
            Err(e) if is_cross_device(&e) => {
                debug!("rename {src} -> {dst} crosses devices, copying instead");
                Self::copy_then_delete(src, dst)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn copy_then_delete(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        Self::copy_then_remove_with(src, dst, Self::remove_path)
    }

    /// Once `dst` holds a complete copy it is never discarded. A failed
    /// removal of `src` leaves both copies on disk.
    fn copy_then_remove_with<F>(src: &Utf8Path, dst: &Utf8Path, remove: F) -> Result<(), SError>
    where
        F: FnOnce(&Utf8Path) -> Result<(), SError>,
    {
        if let Err(e) = Self::copy_path(src, dst) {
            if !matches!(e, SError::NameCollision(_)) {
                Self::discard(dst);
            }
            return Err(e);
        }

        remove(src).map_err(|e| {
            warn!("could not remove {src} after copying it to {dst}, keeping both: {e}");
            SError::RemovalIncomplete {
                path: src.to_string(),
                kept: dst.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// True when `copy` has the same entries and byte total as `original`.
    /// A missing `original` never counts as intact.
    pub fn is_intact_copy(original: &Utf8Path, copy: &Utf8Path) -> bool {
        match (tree_summary(original), tree_summary(copy)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Best-effort removal used on failure paths.
    pub fn discard(path: &Utf8Path) {
        if path.exists() {
            if let Err(e) = Self::remove_path(path) {
                warn!("failed to clean up {path}: {e}");
            }
        }
    }

    /// Lists the immediate children of a directory as UTF-8 paths, skipping
    /// entries whose names are not valid UTF-8.
    pub fn read_dir_utf8(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, SError> {
        let mut children: Vec<Utf8PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
            .collect();
        children.sort();
        Ok(children)
    }
}

/// Relative entry paths and total file bytes below `path`.
fn tree_summary(path: &Utf8Path) -> Option<(Vec<std::path::PathBuf>, u64)> {
    fs::symlink_metadata(path).ok()?;
    let mut entries = Vec::new();
    let mut bytes = 0;
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.ok()?;
        entries.push(entry.path().strip_prefix(path).ok()?.to_path_buf());
        if entry.file_type().is_file() {
            bytes += entry.metadata().ok()?.len();
        }
    }
    Some((entries, bytes))
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    // EXDEV
    e.raw_os_error() == Some(18)
}

#[cfg(windows)]
fn is_cross_device(e: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    e.raw_os_error() == Some(17)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn move_path_refuses_existing_destination() {
        let tmp = tempdir().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        let src = root.join("a.jar");
        let dst = root.join("b.jar");
        fs::write(&src, "a").unwrap();
        fs::write(&dst, "b").unwrap();

        let result = FileUtils::move_path(&src, &dst);

        assert!(matches!(result, Err(SError::NameCollision(_))));
        assert_eq!(fs::read_to_string(&src).unwrap(), "a");
        assert_eq!(fs::read_to_string(&dst).unwrap(), "b");
    }

    #[test]
    fn failed_source_removal_keeps_the_finished_copy() {
        let tmp = tempdir().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        let src = root.join("active/Pack");
        let dst = root.join("disabled/Pack");
        fs::create_dir_all(src.join("Common")).unwrap();
        fs::write(src.join("manifest.json"), "{}").unwrap();
        fs::write(src.join("Common/locked.bin"), "data").unwrap();

        // Removal gets one file in and then stops.
        let result = FileUtils::copy_then_remove_with(&src, &dst, |path| {
            fs::remove_file(path.join("manifest.json"))?;
            Err(SError::IOError("Operation not permitted".into()))
        });

        assert!(matches!(
            result,
            Err(SError::RemovalIncomplete { ref kept, .. }) if kept == dst.as_str()
        ));
        assert_eq!(fs::read_to_string(dst.join("manifest.json")).unwrap(), "{}");
        assert_eq!(fs::read_to_string(dst.join("Common/locked.bin")).unwrap(), "data");
        assert!(src.join("Common/locked.bin").is_file());
    }

    #[test]
    fn intact_copy_needs_matching_entries() {
        let tmp = tempdir().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        let a = root.join("a");
        fs::create_dir_all(a.join("sub")).unwrap();
        fs::write(a.join("sub/x.bin"), "12").unwrap();
        let b = root.join("b");
        FileUtils::copy_path(&a, &b).unwrap();

        assert!(FileUtils::is_intact_copy(&a, &b));
        fs::remove_file(a.join("sub/x.bin")).unwrap();
        assert!(!FileUtils::is_intact_copy(&a, &b));
        assert!(!FileUtils::is_intact_copy(&root.join("gone"), &b));
    }

    #[test]
    fn size_of_sums_nested_files() {
        let tmp = tempdir().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap();
        let dir = root.join("pack");
        fs::create_dir_all(dir.join("Common/Models")).unwrap();
        fs::write(dir.join("manifest.json"), "1234").unwrap();
        fs::write(dir.join("Common/Models/a.bin"), "123456").unwrap();

        assert_eq!(FileUtils::size_of(&dir), Some(10));
        assert_eq!(FileUtils::size_of(&dir.join("manifest.json")), Some(4));
        assert_eq!(FileUtils::size_of(&root.join("missing")), None);
    }
}
