use crate::core::locations::Locations;
use crate::core::profile_store::ProfileStore;
use crate::core::scanner::scan_library;
use crate::core::world::{self, WorldInfo};
use crate::models::error::SError;
use crate::models::mod_dto::{EnablementOverrides, ModEntry};
use crate::models::report::{ApplyFailure, ApplyReport, ApplySkip, MoveDirection, MoveRecord};
use crate::utils::file::FileUtils;
use crate::utils::path::ensure_within;
use crate::utils::time::now_millis;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

enum MoveOutcome {
    Moved(MoveRecord),
    Blocked(ApplySkip),
}

/// Makes the disk match a profile: every enabled id ends up in its active
/// folder, everything else in the disabled mirror, and the chosen world's
/// overrides list exactly the profile's set. Per-mod problems go into the
/// report; only a missing profile or a database failure aborts.
pub fn apply(
    locations: &Locations,
    store: &ProfileStore,
    world: Option<&WorldInfo>,
    profile_id: &str,
) -> Result<ApplyReport, SError> {
    let profile = store.require(profile_id)?;
    info!("applying profile {} ({profile_id})", profile.name);

    let scan = scan_library(locations, &EnablementOverrides::default());
    let existing: BTreeSet<&str> = scan.entries.iter().map(|e| e.id.as_str()).collect();

    let desired: BTreeSet<String> = profile
        .enabled_mods
        .iter()
        .filter(|id| {
            let known = existing.contains(id.as_str());
            if !known {
                debug!("profile references missing mod {id}, ignoring");
            }
            known
        })
        .cloned()
        .collect();

    let mut report = ApplyReport {
        profile_id: profile_id.to_string(),
        applied_at: now_millis(),
        world_id: world.map(|w| w.id.clone()),
        moved: Vec::new(),
        skipped: Vec::new(),
        failures: Vec::new(),
        world_error: None,
    };

    for entry in &scan.entries {
        let direction = match (desired.contains(&entry.id), entry.disabled) {
            (true, true) => MoveDirection::Enable,
            (false, false) => MoveDirection::Disable,
            _ => continue,
        };

        match move_entry(locations, entry, direction) {
            Ok(MoveOutcome::Moved(record)) => report.moved.push(record),
            Ok(MoveOutcome::Blocked(skip)) => {
                warn!("{} not moved, {} is in the way", skip.mod_id, skip.blocked_by);
                report.skipped.push(skip);
            }
            Err(e) => {
                warn!("moving {} failed: {e}", entry.id);
                report.failures.push(ApplyFailure {
                    mod_id: entry.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if let Some(world) = world {
        if let Err(e) = world::write_overrides(&world.config_path, &desired, &scan.entries) {
            warn!("world overrides for {} not written: {e}", world.id);
            report.world_error = Some(e.to_string());
        }
    }

    store.set_active(profile_id)?;

    info!(
        "profile {profile_id} applied: {} moved, {} skipped, {} failed",
        report.moved.len(),
        report.skipped.len(),
        report.failures.len()
    );
    Ok(report)
}

fn move_entry(
    locations: &Locations,
    entry: &ModEntry,
    direction: MoveDirection,
) -> Result<MoveOutcome, SError> {
    let (source_root, target_root): (Utf8PathBuf, Utf8PathBuf) = match direction {
        MoveDirection::Enable => (
            locations.disabled_dir_for(entry.location),
            active_root(locations, entry)?,
        ),
        MoveDirection::Disable => (
            active_root(locations, entry)?,
            locations.disabled_dir_for(entry.location),
        ),
    };
    std::fs::create_dir_all(&target_root)?;

    let file_name = entry
        .file_name()
        .ok_or_else(|| SError::ParseError(format!("no file name in {}", entry.path)))?;
    let from = ensure_within(&source_root, &entry.path)?;
    let to = ensure_within(&target_root, &target_root.join(file_name))?;

    let blocked = |to: Utf8PathBuf| {
        MoveOutcome::Blocked(ApplySkip {
            mod_id: entry.id.clone(),
            direction,
            blocked_by: to,
        })
    };

    if to.exists() {
        return Ok(blocked(to));
    }

    match FileUtils::move_path(&from, &to) {
        Ok(()) => {
            debug!("{:?} {}: {from} -> {to}", direction, entry.id);
            Ok(MoveOutcome::Moved(MoveRecord {
                mod_id: entry.id.clone(),
                direction,
                from,
                to,
            }))
        }
        Err(SError::NameCollision(_)) => Ok(blocked(to)),
        Err(e) => Err(e),
    }
}

fn active_root(locations: &Locations, entry: &ModEntry) -> Result<Utf8PathBuf, SError> {
    locations
        .root_for(entry.location)
        .map(Utf8Path::to_path_buf)
        .ok_or_else(|| SError::NotFound(format!("active {} folder", entry.location)))
}
