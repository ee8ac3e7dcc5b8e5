use crate::core::locations::Locations;
use crate::core::manifest::{self, ManifestProbe};
use crate::models::mod_dto::{EnablementOverrides, ModEntry, ModFormat, ModLocation, ModType};
use crate::models::report::ScanIssue;
use crate::utils::file::FileUtils;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Where a scanned folder sits physically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Physical {
    Active,
    Disabled,
}

#[derive(Clone, Debug, Default)]
pub struct ScanOutput {
    pub entries: Vec<ModEntry>,
    pub issues: Vec<ScanIssue>,
}

impl ScanOutput {
    fn extend(&mut self, other: ScanOutput) {
        self.entries.extend(other.entries);
        self.issues.extend(other.issues);
    }
}

/// Scans one folder. Unreadable manifests never drop a candidate: the entry is
/// kept with file-name metadata and the problem is reported as an issue.
pub fn scan_location(
    dir: &Utf8Path,
    location: ModLocation,
    physical: Physical,
    overrides: &EnablementOverrides,
) -> ScanOutput {
    let mut output = ScanOutput::default();
    if !dir.is_dir() {
        return output;
    }

    let children = match FileUtils::read_dir_utf8(dir) {
        Ok(children) => children,
        Err(e) => {
            warn!("cannot read {dir}: {e}");
            output.issues.push(ScanIssue::LocationUnreadable {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
            return output;
        }
    };

    for path in children {
        let Some(format) = candidate_format(&path, location) else {
            continue;
        };
        let entry = build_entry(path, format, location, physical, overrides, &mut output.issues);
        debug!("scanned {} ({}) enabled={}", entry.id, entry.path, entry.enabled);
        output.entries.push(entry);
    }

    output
}

/// Full library scan: active and disabled copies of every category, with
/// duplicates of an id reduced to the first copy found, sorted by name.
pub fn scan_library(locations: &Locations, overrides: &EnablementOverrides) -> ScanOutput {
    let mut sources: Vec<(Utf8PathBuf, ModLocation, Physical)> = Vec::new();

    for location in ModLocation::ALL {
        let active = match location {
            ModLocation::Packs => locations.packs_path.clone(),
            _ => locations.root_for(location).map(Utf8Path::to_path_buf),
        };
        if let Some(active) = active {
            sources.push((active, location, Physical::Active));
        }
        sources.push((locations.disabled_dir_for(location), location, Physical::Disabled));
    }

    let mut combined = ScanOutput::default();
    for (dir, location, physical) in &sources {
        combined.extend(scan_location(dir, *location, *physical, overrides));
    }

    let mut seen: HashMap<String, Utf8PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(combined.entries.len());
    for entry in combined.entries {
        if let Some(kept) = seen.get(&entry.id) {
            warn!("duplicate mod id {} at {} (keeping {})", entry.id, entry.path, kept);
            combined.issues.push(ScanIssue::DuplicateId {
                id: entry.id.clone(),
                kept: kept.clone(),
                ignored: entry.path.clone(),
            });
            continue;
        }
        seen.insert(entry.id.clone(), entry.path.clone());
        unique.push(entry);
    }

    unique.sort_by(|a, b| a.name.cmp(&b.name));
    ScanOutput {
        entries: unique,
        issues: combined.issues,
    }
}

fn candidate_format(path: &Utf8Path, location: ModLocation) -> Option<ModFormat> {
    if path.is_dir() {
        return (location != ModLocation::EarlyPlugins).then_some(ModFormat::Directory);
    }
    if !path.is_file() {
        return None;
    }

    let format = ModFormat::from_extension(path.extension()?)?;
    match (location, format) {
        (ModLocation::EarlyPlugins, ModFormat::Jar) => Some(format),
        (ModLocation::EarlyPlugins, _) => None,
        _ => Some(format),
    }
}

fn build_entry(
    path: Utf8PathBuf,
    format: ModFormat,
    location: ModLocation,
    physical: Physical,
    overrides: &EnablementOverrides,
    issues: &mut Vec<ScanIssue>,
) -> ModEntry {
    let probe = manifest::read_manifest(&path).unwrap_or_else(|e| {
        warn!("{e}");
        issues.push(ScanIssue::ManifestUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        });
        ManifestProbe::default()
    });

    let mod_type = classify(location, &probe);
    let ManifestProbe { manifest, .. } = probe;
    let has_manifest = manifest.is_some();
    let manifest = manifest.unwrap_or_default();

    let name = non_blank(manifest.name.clone()).unwrap_or_else(|| manifest::fallback_name(&path));
    let group = non_blank(manifest.group.clone());
    let id = ModEntry::compose_id(group.as_deref(), &name);

    let entry_point = (mod_type == ModType::Plugin)
        .then(|| manifest.entry_point().map(str::to_string))
        .flatten();

    if !has_manifest {
        debug!("no manifest for {path}, using file name");
    }

    ModEntry {
        enabled: overrides.resolve(&id),
        disabled: physical == Physical::Disabled,
        size: FileUtils::size_of(&path),
        id,
        name,
        group,
        version: non_blank(manifest.version),
        description: non_blank(manifest.description),
        format,
        location,
        path,
        mod_type,
        entry_point,
        includes_asset_pack: manifest.includes_asset_pack,
        dependencies: manifest.dependencies,
        optional_dependencies: manifest.optional_dependencies,
    }
}

fn classify(location: ModLocation, probe: &ManifestProbe) -> ModType {
    let declares_main = probe
        .manifest
        .as_ref()
        .and_then(|m| m.entry_point())
        .is_some();

    if location == ModLocation::EarlyPlugins {
        ModType::EarlyPlugin
    } else if declares_main || probe.has_classes {
        ModType::Plugin
    } else if probe.manifest.is_some() || location == ModLocation::Packs {
        ModType::Pack
    } else {
        ModType::Unknown
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
