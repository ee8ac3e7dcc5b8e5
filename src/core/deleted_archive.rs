use crate::core::locations::Locations;
use crate::models::error::SError;
use crate::models::mod_backup::{DeleteOutcome, DeletedModBackup, RestoreOutcome};
use crate::utils::file::FileUtils;
use crate::utils::path::{ensure_within, ensure_within_any};
use crate::utils::time::{from_file_stamp, now_millis, to_file_stamp};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

fn backup_name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(.+)_(\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}-\d{3}Z)$").ok())
        .as_ref()
}

pub fn backup_name(original_name: &str, deleted_at: DateTime<Utc>) -> String {
    format!("{original_name}_{}", to_file_stamp(deleted_at))
}

/// Splits a backup id into the original name and deletion time. The name part
/// is greedy, so underscores inside it survive (`Foo_Bar_<stamp>`).
pub fn parse_backup_name(backup_id: &str) -> Option<(String, DateTime<Utc>)> {
    let caps = backup_name_pattern()?.captures(backup_id)?;
    let deleted_at = from_file_stamp(caps.get(2)?.as_str())?;
    Some((caps.get(1)?.as_str().to_string(), deleted_at))
}

/// Copies `path` into the backup root, then removes the original. If the
/// removal fails after touching the original, the backup is kept and the
/// error names it.
pub fn delete_mod(locations: &Locations, path: &Utf8Path) -> Result<DeleteOutcome, SError> {
    delete_mod_with(locations, path, FileUtils::remove_path)
}

fn delete_mod_with<F>(locations: &Locations, path: &Utf8Path, remove: F) -> Result<DeleteOutcome, SError>
where
    F: FnOnce(&Utf8Path) -> Result<(), SError>,
{
    let path = ensure_within_any(locations.deletable_roots(), path)?;
    if !path.exists() {
        return Err(SError::NotFound(path.to_string()));
    }
    let original_name = path
        .file_name()
        .ok_or_else(|| SError::ParseError(format!("no file name in {path}")))?;

    std::fs::create_dir_all(&locations.deleted_root)?;
    let backup_path = locations
        .deleted_root
        .join(backup_name(original_name, now_millis()));

    if let Err(e) = FileUtils::copy_path(&path, &backup_path) {
        // A collision means someone else's backup; leave it alone.
        if !matches!(e, SError::NameCollision(_)) {
            FileUtils::discard(&backup_path);
        }
        return Err(e);
    }

    if let Err(e) = remove(&path) {
        if FileUtils::is_intact_copy(&path, &backup_path) {
            warn!("could not remove {path}, dropping backup: {e}");
            FileUtils::discard(&backup_path);
            return Err(e);
        }
        warn!("{path} partly removed, keeping backup {backup_path}: {e}");
        return Err(SError::RemovalIncomplete {
            path: path.to_string(),
            kept: backup_path.to_string(),
            reason: e.to_string(),
        });
    }

    info!("deleted {path}, backup at {backup_path}");
    Ok(DeleteOutcome {
        success: true,
        backup_path,
    })
}

/// Every recognizable backup, newest first. Foreign names are skipped.
pub fn list_deleted_mods(locations: &Locations) -> Result<Vec<DeletedModBackup>, SError> {
    if !locations.deleted_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut backups: Vec<DeletedModBackup> = FileUtils::read_dir_utf8(&locations.deleted_root)?
        .into_iter()
        .filter_map(|path| {
            let backup_id = path.file_name()?.to_string();
            let Some((original_name, deleted_at)) = parse_backup_name(&backup_id) else {
                debug!("skipping {path}: not a backup name");
                return None;
            };
            Some(DeletedModBackup {
                original_name,
                deleted_at,
                is_directory: path.is_dir(),
                size: FileUtils::size_of(&path),
                backup_id,
                path,
            })
        })
        .collect();

    backups.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
    Ok(backups)
}

/// Copies a backup back into the active mods folder under its original name,
/// then drops the backup. An occupied destination leaves everything untouched.
pub fn restore_deleted_mod(locations: &Locations, backup_id: &str) -> Result<RestoreOutcome, SError> {
    let (original_name, _) = parse_backup_name(backup_id)
        .ok_or_else(|| SError::NotFound(format!("backup {backup_id}")))?;
    let backup_path = existing_backup(locations, backup_id)?;

    let mods = locations.mods_path.as_deref().ok_or(SError::NoInstallation)?;
    let restored_path = ensure_within(mods, &mods.join(&original_name))?;
    if restored_path.exists() {
        return Err(SError::NameCollision(restored_path.to_string()));
    }

    if let Err(e) = FileUtils::copy_path(&backup_path, &restored_path) {
        FileUtils::discard(&restored_path);
        return Err(e);
    }
    FileUtils::remove_path(&backup_path)?;

    info!("restored {backup_id} to {restored_path}");
    Ok(RestoreOutcome {
        success: true,
        restored_path,
    })
}

pub fn permanently_delete(locations: &Locations, backup_id: &str) -> Result<(), SError> {
    let backup_path = existing_backup(locations, backup_id)?;
    FileUtils::remove_path(&backup_path)?;
    info!("permanently deleted backup {backup_id}");
    Ok(())
}

/// Removes every listed backup. Returns how many were removed.
pub fn clear_all(locations: &Locations) -> Result<usize, SError> {
    let backups = list_deleted_mods(locations)?;
    for backup in &backups {
        let path = ensure_within(&locations.deleted_root, &backup.path)?;
        FileUtils::remove_path(&path)?;
    }
    info!("cleared {} backup(s)", backups.len());
    Ok(backups.len())
}

fn existing_backup(locations: &Locations, backup_id: &str) -> Result<Utf8PathBuf, SError> {
    let path = ensure_within(&locations.deleted_root, &locations.deleted_root.join(backup_id))?;
    if !path.exists() {
        return Err(SError::NotFound(format!("backup {backup_id}")));
    }
    Ok(path)
}
