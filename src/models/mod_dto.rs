use camino::Utf8PathBuf;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dependency list as it appears in a manifest: either a plain array of ids
/// or an object whose keys are the ids (values are version hints we ignore).
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Dependencies {
    List(Vec<String>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

impl Dependencies {
    pub fn into_ids(self) -> Vec<String> {
        match self {
            Dependencies::List(ids) => ids,
            Dependencies::Keyed(map) => map.into_iter().map(|(id, _)| id).collect(),
        }
    }
}

fn normalize_dependencies<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Dependencies>::deserialize(deserializer)?;
    Ok(raw.map(Dependencies::into_ids).unwrap_or_default())
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ModManifest {
    #[serde(default, alias = "group")]
    pub group: Option<String>,
    #[serde(default, alias = "name")]
    pub name: Option<String>,
    #[serde(default, alias = "version")]
    pub version: Option<String>,
    #[serde(default, alias = "description")]
    pub description: Option<String>,
    #[serde(default, alias = "main")]
    pub main: Option<String>,
    #[serde(default, alias = "includesAssetPack")]
    pub includes_asset_pack: bool,
    #[serde(
        default,
        alias = "dependencies",
        deserialize_with = "normalize_dependencies"
    )]
    pub dependencies: Vec<String>,
    #[serde(
        default,
        alias = "optionalDependencies",
        deserialize_with = "normalize_dependencies"
    )]
    pub optional_dependencies: Vec<String>,
}

impl ModManifest {
    pub fn entry_point(&self) -> Option<&str> {
        self.main.as_deref().filter(|m| !m.trim().is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
pub enum ModFormat {
    #[display("directory")]
    Directory,
    #[display("zip")]
    Zip,
    #[display("jar")]
    Jar,
}

impl ModFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "zip" => Some(ModFormat::Zip),
            "jar" => Some(ModFormat::Jar),
            _ => None,
        }
    }
}

/// Logical category of a mod. The serialized form doubles as the subfolder
/// name inside the disabled mirror.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
pub enum ModLocation {
    #[display("mods")]
    Mods,
    #[display("earlyplugins")]
    EarlyPlugins,
    #[display("packs")]
    Packs,
}

impl ModLocation {
    pub const ALL: [ModLocation; 3] = [
        ModLocation::Mods,
        ModLocation::EarlyPlugins,
        ModLocation::Packs,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            ModLocation::Mods => "mods",
            ModLocation::EarlyPlugins => "earlyplugins",
            ModLocation::Packs => "packs",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ModType {
    Plugin,
    EarlyPlugin,
    Pack,
    Unknown,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModEntry {
    pub id: String,
    pub name: String,
    pub group: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub format: ModFormat,
    pub location: ModLocation,
    pub path: Utf8PathBuf,
    #[serde(rename = "type")]
    pub mod_type: ModType,
    pub entry_point: Option<String>,
    pub includes_asset_pack: bool,
    pub enabled: bool,
    /// True when `path` currently sits under the disabled mirror.
    pub disabled: bool,
    pub dependencies: Vec<String>,
    pub optional_dependencies: Vec<String>,
    pub size: Option<u64>,
}

impl ModEntry {
    /// `group:name` when a group is declared, otherwise the bare name.
    pub fn compose_id(group: Option<&str>, name: &str) -> String {
        match group.filter(|g| !g.trim().is_empty()) {
            Some(group) => format!("{group}:{name}"),
            None => name.to_string(),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}

/// Enablement inputs for a scan, in priority order.
#[derive(Clone, Debug, Default)]
pub struct EnablementOverrides {
    /// Caller-forced value applied to every entry of a scan call.
    pub forced: Option<bool>,
    /// Per-world `Mods[id].Enabled` map.
    pub world: BTreeMap<String, bool>,
}

impl EnablementOverrides {
    pub fn from_world(world: BTreeMap<String, bool>) -> Self {
        Self {
            forced: None,
            world,
        }
    }

    /// Forced value, else the world's flag, else disabled.
    pub fn resolve(&self, id: &str) -> bool {
        self.forced
            .or_else(|| self.world.get(id).copied())
            .unwrap_or(false)
    }
}
