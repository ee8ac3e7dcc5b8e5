use crate::models::error::SError;
use crate::models::paths::DataPathRules;
use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "mod_warden";

/// User settings owned by the surrounding application. The engine only reads
/// the install override and the selected world.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AppSettings {
    pub version: u8,
    pub install_path_override: Option<Utf8PathBuf>,
    pub selected_world_id: Option<String>,
    /// Relocates the app-owned folders (disabled mirror, deleted backups, profiles db).
    pub data_dir_override: Option<Utf8PathBuf>,
}

impl AppSettings {
    pub fn load() -> Result<AppSettings, SError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    pub fn save(&self) -> Result<(), SError> {
        Ok(confy::store(APP_NAME, None, self)?)
    }

    pub fn data_dir(&self) -> Result<Utf8PathBuf, SError> {
        if let Some(dir) = &self.data_dir_override {
            return Ok(dir.clone());
        }

        let base_dir = ProjectDirs::from("com", "martes", APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe_path| exe_path.parent().map(|p| p.to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."));

        Utf8PathBuf::from_path_buf(base_dir)
            .map_err(|p| SError::ParseError(format!("Invalid UTF-8 path: {}", p.display())))
    }

    pub fn data_paths(&self) -> Result<DataPathRules, SError> {
        Ok(DataPathRules::new(&self.data_dir()?))
    }
}
