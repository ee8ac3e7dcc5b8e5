use crate::core::locations::Locations;
use crate::core::scanner::scan_library;
use crate::core::session::Session;
use crate::core::validator::validate;
use crate::core::world::{self, WorldInfo};
use crate::models::error::SError;
use crate::models::mod_dto::EnablementOverrides;
use crate::models::report::{ScanIssue, ScanResult};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// Full scan with enablement resolved against one world, followed by default
/// profile upkeep and dependency validation.
#[instrument(skip(session))]
pub fn scan(session: &Session, world_id: Option<&str>) -> Result<ScanResult, SError> {
    let locations = session.locations();
    for issue in &locations.issues {
        warn!("{issue}");
    }

    let world = session.resolve_world(&locations, world_id)?;
    let mut issues = Vec::new();
    let overrides = match &world {
        Some(world) => world::read_overrides(&world.config_path).unwrap_or_else(|e| {
            warn!("world {} overrides ignored: {e}", world.id);
            issues.push(ScanIssue::ConfigCorrupt {
                path: world.config_path.clone(),
                reason: e.to_string(),
            });
            BTreeMap::new()
        }),
        None => BTreeMap::new(),
    };

    let output = scan_library(&locations, &EnablementOverrides::from_world(overrides));
    issues.extend(output.issues);

    {
        let store = session.profiles();
        if let Some(seeded) = store.ensure_default(&output.entries)? {
            info!("seeded default profile with {} mod(s)", seeded.enabled_mods.len());
        }
        let existing: BTreeSet<String> = output.entries.iter().map(|e| e.id.clone()).collect();
        if store.reconcile_default(&existing)? {
            debug!("default profile reconciled");
        }
    }

    let validation = validate(&output.entries);
    info!(
        "scan found {} mod(s), {} issue(s), {} dependency issue(s)",
        output.entries.len(),
        issues.len(),
        validation.issues.len()
    );

    Ok(ScanResult {
        install_path: locations.install_path,
        world_id: world.map(|w| w.id),
        entries: output.entries,
        validation: Some(validation),
        issues,
    })
}

/// Flips one `Mods[id].Enabled` flag in a world's config without touching files.
#[instrument(skip(session))]
pub fn set_mod_enabled(
    session: &Session,
    world_id: &str,
    mod_id: &str,
    enabled: bool,
) -> Result<(), SError> {
    let locations = session.locations();
    let saves = locations.saves_path.as_deref().ok_or(SError::NoInstallation)?;
    let config_path = world::world_config_path(saves, world_id)?;
    world::set_mod_enabled(&config_path, mod_id, enabled)?;
    info!("{mod_id} {} in {world_id}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

#[instrument(skip(session))]
pub fn list_worlds(session: &Session) -> Result<Vec<WorldInfo>, SError> {
    let locations = session.locations();
    Ok(locations
        .saves_path
        .as_deref()
        .map(world::list_worlds)
        .unwrap_or_default())
}

#[instrument(skip(session))]
pub fn resolve_locations(session: &Session) -> Result<Locations, SError> {
    Ok(session.locations())
}
