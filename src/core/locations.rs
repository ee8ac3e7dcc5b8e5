use crate::config::AppSettings;
use crate::models::mod_dto::ModLocation;
use crate::models::paths::{DataPathRules, InstallPathRules};
use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

const GAME_DIR_NAME: &str = "Hytale";

/// Every folder the engine reads or writes, resolved once per operation.
///
/// Install-side paths are `None` unless they exist on disk. App-owned roots
/// (`disabled_root`, `deleted_root`, `projects_root`) are fixed and created
/// lazily by whoever writes into them.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Locations {
    pub install_path: Option<Utf8PathBuf>,
    pub user_data_path: Option<Utf8PathBuf>,
    pub mods_path: Option<Utf8PathBuf>,
    pub early_plugins_path: Option<Utf8PathBuf>,
    pub packs_path: Option<Utf8PathBuf>,
    pub saves_path: Option<Utf8PathBuf>,
    pub disabled_root: Utf8PathBuf,
    pub deleted_root: Utf8PathBuf,
    pub projects_root: Utf8PathBuf,
    pub issues: Vec<String>,
}

impl Locations {
    pub fn resolve(settings: &AppSettings, data_paths: &DataPathRules) -> Self {
        let install = settings
            .install_path_override
            .clone()
            .filter(|p| !p.as_str().trim().is_empty())
            .or_else(default_install_path);
        Self::from_install(install.as_deref(), data_paths)
    }

    pub fn from_install(install: Option<&Utf8Path>, data_paths: &DataPathRules) -> Self {
        let mut issues = Vec::new();

        let existing_dir = |p: Utf8PathBuf, what: &str, issues: &mut Vec<String>| {
            if p.is_dir() {
                Some(p)
            } else {
                issues.push(format!("{what} not found at {p}"));
                None
            }
        };

        let install_path = match install {
            Some(root) => existing_dir(root.to_path_buf(), "Game installation", &mut issues),
            None => {
                issues.push("No game installation configured or detected".to_string());
                None
            }
        };

        let mut locations = Self {
            install_path: None,
            user_data_path: None,
            mods_path: None,
            early_plugins_path: None,
            packs_path: None,
            saves_path: None,
            disabled_root: data_paths.disabled.clone(),
            deleted_root: data_paths.deleted.clone(),
            projects_root: data_paths.projects.clone(),
            issues: Vec::new(),
        };

        if let Some(root) = install_path {
            let rules = InstallPathRules::new(&root);
            locations.user_data_path = existing_dir(rules.user_data, "UserData folder", &mut issues);
            locations.mods_path = existing_dir(rules.mods, "Mods folder", &mut issues);
            locations.early_plugins_path = rules.early_plugins.is_dir().then_some(rules.early_plugins);
            locations.packs_path = rules.packs.is_dir().then_some(rules.packs);
            locations.saves_path = rules.saves.is_dir().then_some(rules.saves);
            locations.install_path = Some(root);
        }

        locations.issues = issues;
        locations
    }

    /// Active root for a logical category. Packs without their own folder live
    /// in the mods folder.
    pub fn root_for(&self, location: ModLocation) -> Option<&Utf8Path> {
        match location {
            ModLocation::Mods => self.mods_path.as_deref(),
            ModLocation::EarlyPlugins => self.early_plugins_path.as_deref(),
            ModLocation::Packs => self.packs_path.as_deref().or(self.mods_path.as_deref()),
        }
    }

    pub fn disabled_dir_for(&self, location: ModLocation) -> Utf8PathBuf {
        self.disabled_root.join(location.dir_name())
    }

    /// Roots a managed mod may be deleted from.
    pub fn deletable_roots(&self) -> Vec<&Utf8Path> {
        [
            self.mods_path.as_deref(),
            self.early_plugins_path.as_deref(),
            self.packs_path.as_deref(),
            Some(self.disabled_root.as_path()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn default_install_path() -> Option<Utf8PathBuf> {
    let base = BaseDirs::new()?;
    let candidate = base.data_dir().join(GAME_DIR_NAME);
    let candidate = Utf8PathBuf::from_path_buf(candidate).ok()?;
    candidate.is_dir().then_some(candidate)
}
