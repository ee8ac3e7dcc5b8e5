use crate::models::error::SError;
use crate::models::mod_dto::ModEntry;
use crate::models::paths::WorldPaths;
use crate::utils::file::FileUtils;
use crate::utils::json::Json;
use crate::utils::path::ensure_within;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::time::SystemTime;
use tracing::{debug, warn};

const MODS_KEY: &str = "Mods";
const ENABLED_KEY: &str = "Enabled";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorldInfo {
    pub id: String,
    pub path: Utf8PathBuf,
    pub config_path: Utf8PathBuf,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Resolves `<saves>/<world_id>/config.json`, rejecting ids that leave the saves folder.
pub fn world_config_path(saves: &Utf8Path, world_id: &str) -> Result<Utf8PathBuf, SError> {
    let world_dir = ensure_within(saves, &saves.join(world_id))?;
    if !world_dir.is_dir() {
        return Err(SError::NotFound(format!("world {world_id}")));
    }
    Ok(WorldPaths::new(&world_dir).config)
}

/// Save folders that contain a `config.json`, newest first.
pub fn list_worlds(saves: &Utf8Path) -> Vec<WorldInfo> {
    let children = match FileUtils::read_dir_utf8(saves) {
        Ok(children) => children,
        Err(e) => {
            warn!("cannot list worlds in {saves}: {e}");
            return Vec::new();
        }
    };

    let mut worlds: Vec<(Option<SystemTime>, WorldInfo)> = children
        .into_iter()
        .filter(|p| p.is_dir())
        .filter_map(|path| {
            let config_path = WorldPaths::new(&path).config;
            if !config_path.is_file() {
                return None;
            }
            let modified = std::fs::metadata(&config_path).and_then(|m| m.modified()).ok();
            let info = WorldInfo {
                id: path.file_name()?.to_string(),
                modified_at: modified.map(DateTime::<Utc>::from),
                path,
                config_path,
            };
            Some((modified, info))
        })
        .collect();

    worlds.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
    worlds.into_iter().map(|(_, info)| info).collect()
}

/// The save whose `config.json` was modified most recently.
pub fn find_active_world(saves: &Utf8Path) -> Option<WorldInfo> {
    list_worlds(saves).into_iter().next()
}

/// Reads `Mods[*].Enabled`. Missing files give an empty map; entries whose
/// `Enabled` is not a boolean are ignored.
pub fn read_overrides(config_path: &Utf8Path) -> Result<BTreeMap<String, bool>, SError> {
    let Some(doc) = read_document(config_path)? else {
        return Ok(BTreeMap::new());
    };

    let Some(mods) = doc.get(MODS_KEY).and_then(Value::as_object) else {
        return Ok(BTreeMap::new());
    };

    Ok(mods
        .iter()
        .filter_map(|(id, value)| {
            let enabled = value.get(ENABLED_KEY)?.as_bool()?;
            Some((id.clone(), enabled))
        })
        .collect())
}

/// [`read_overrides`] with every failure downgraded to an empty map.
pub fn load_overrides(config_path: &Utf8Path) -> BTreeMap<String, bool> {
    read_overrides(config_path).unwrap_or_else(|e| {
        warn!("ignoring world overrides: {e}");
        BTreeMap::new()
    })
}

/// Sets `Mods[id].Enabled = enabled.contains(id)` for every known entry and
/// writes the whole document back. Other keys, on the mod objects and at the
/// top level, are kept as they were.
pub fn write_overrides(
    config_path: &Utf8Path,
    enabled: &BTreeSet<String>,
    known: &[ModEntry],
) -> Result<(), SError> {
    update_document(config_path, |mods| {
        for entry in known {
            set_enabled(mods, &entry.id, enabled.contains(&entry.id));
        }
    })?;
    debug!("wrote {} override(s) to {config_path}", known.len());
    Ok(())
}

pub fn set_mod_enabled(config_path: &Utf8Path, mod_id: &str, enabled: bool) -> Result<(), SError> {
    update_document(config_path, |mods| set_enabled(mods, mod_id, enabled))
}

fn set_enabled(mods: &mut Map<String, Value>, mod_id: &str, enabled: bool) {
    match mods.get_mut(mod_id) {
        Some(Value::Object(fields)) => {
            fields.insert(ENABLED_KEY.to_string(), Value::Bool(enabled));
        }
        _ => {
            let mut fields = Map::new();
            fields.insert(ENABLED_KEY.to_string(), Value::Bool(enabled));
            mods.insert(mod_id.to_string(), Value::Object(fields));
        }
    }
}

fn update_document<F>(config_path: &Utf8Path, apply: F) -> Result<(), SError>
where
    F: FnOnce(&mut Map<String, Value>),
{
    // A corrupt file is reported, never replaced.
    let mut doc = read_document(config_path)?.unwrap_or_default();

    let mods = doc
        .entry(MODS_KEY.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(mods) = mods else {
        return Err(SError::ConfigCorrupt(format!(
            "{config_path}: \"{MODS_KEY}\" is not an object"
        )));
    };

    apply(mods);
    Json::write_atomic(config_path, &Value::Object(doc))
}

fn read_document(config_path: &Utf8Path) -> Result<Option<Map<String, Value>>, SError> {
    let text = match std::fs::read_to_string(config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let corrupt = |reason: String| SError::ConfigCorrupt(format!("{config_path}: {reason}"));
    match serde_json::from_str::<Value>(text.trim_start_matches('\u{feff}')) {
        Ok(Value::Object(doc)) => Ok(Some(doc)),
        Ok(_) => Err(corrupt("top level is not an object".into())),
        Err(e) => Err(corrupt(e.to_string())),
    }
}
