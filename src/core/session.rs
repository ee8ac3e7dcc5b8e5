use crate::config::AppSettings;
use crate::core::locations::Locations;
use crate::core::profile_store::ProfileStore;
use crate::core::world::{self, WorldInfo};
use crate::models::error::SError;
use crate::models::paths::DataPathRules;
use crate::utils::process::ProcessChecker;
use parking_lot::{Mutex, MutexGuard};
use sysinfo::System;
use tracing::{info, warn};

/// Everything an operation needs, passed explicitly instead of living in globals.
pub struct Session {
    pub settings: AppSettings,
    pub data_paths: DataPathRules,
    profiles: Mutex<ProfileStore>,
    system: Mutex<System>,
}

impl Session {
    pub fn new(settings: AppSettings) -> Result<Self, SError> {
        let data_paths = settings.data_paths()?;
        let profiles = ProfileStore::open(&data_paths.profiles_db)?;
        info!("session opened with data dir {}", settings.data_dir()?);

        Ok(Self {
            settings,
            data_paths,
            profiles: Mutex::new(profiles),
            system: Mutex::new(System::new()),
        })
    }

    pub fn load() -> Result<Self, SError> {
        Self::new(AppSettings::load()?)
    }

    /// Resolved fresh on every call so folders created since the last
    /// operation are picked up.
    pub fn locations(&self) -> Locations {
        Locations::resolve(&self.settings, &self.data_paths)
    }

    pub fn profiles(&self) -> MutexGuard<'_, ProfileStore> {
        self.profiles.lock()
    }

    /// Fails with `GameRunning` while any process runs from the install folder.
    pub fn ensure_game_stopped(&self, locations: &Locations) -> Result<(), SError> {
        let Some(install) = &locations.install_path else {
            return Ok(());
        };
        let mut sys = self.system.lock();
        if ProcessChecker::is_running_under(&mut sys, install) {
            return Err(SError::GameRunning);
        }
        Ok(())
    }

    /// Picks the world whose overrides an operation reads and writes: the
    /// explicit id, else the configured selection, else the most recently
    /// played save. `None` when there are no saves at all.
    pub fn resolve_world(
        &self,
        locations: &Locations,
        world_id: Option<&str>,
    ) -> Result<Option<WorldInfo>, SError> {
        let Some(saves) = &locations.saves_path else {
            return match world_id {
                Some(id) => Err(SError::NotFound(format!("world {id}"))),
                None => Ok(None),
            };
        };

        if let Some(id) = world_id {
            return world_info(saves, id).map(Some);
        }

        if let Some(selected) = self.settings.selected_world_id.as_deref() {
            match world_info(saves, selected) {
                Ok(info) => return Ok(Some(info)),
                Err(e) => warn!("selected world {selected} unusable ({e}), falling back"),
            }
        }

        Ok(world::find_active_world(saves))
    }
}

fn world_info(saves: &camino::Utf8Path, id: &str) -> Result<WorldInfo, SError> {
    let config_path = world::world_config_path(saves, id)?;
    let path = config_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| SError::NotFound(format!("world {id}")))?;
    let modified_at = std::fs::metadata(&config_path)
        .and_then(|m| m.modified())
        .ok()
        .map(chrono::DateTime::<chrono::Utc>::from);

    Ok(WorldInfo {
        id: id.to_string(),
        path,
        config_path,
        modified_at,
    })
}
