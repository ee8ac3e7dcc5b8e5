use crate::models::error::SError;
use crate::models::mod_dto::ModManifest;
use crate::models::paths::ManifestPaths;
use camino::Utf8Path;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use tracing::debug;

/// What a manifest probe found inside one mod candidate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManifestProbe {
    pub manifest: Option<ModManifest>,
    /// Archive holds at least one `.class` entry. Always false for folders.
    pub has_classes: bool,
}

pub fn read_manifest(path: &Utf8Path) -> Result<ManifestProbe, SError> {
    if path.is_dir() {
        read_from_dir(path)
    } else {
        read_from_archive(path)
    }
}

/// Parses manifest text, accepting only a top-level JSON object.
pub fn parse_manifest(text: &str) -> Result<ModManifest, SError> {
    let mut value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
    let Some(object) = value.as_object_mut() else {
        return Err(SError::ParseError("manifest is not a JSON object".into()));
    };
    drop_shadowed_aliases(object);
    Ok(serde_json::from_value(value)?)
}

/// When both `Name` and `name` are present the PascalCase key wins.
fn drop_shadowed_aliases(object: &mut Map<String, Value>) {
    let view: &Map<String, Value> = object;
    let shadowed: Vec<String> = view
        .keys()
        .filter(|key| key.starts_with(|c: char| c.is_ascii_lowercase()))
        .filter(|key| view.contains_key(&pascal_case(key)))
        .cloned()
        .collect();
    for key in shadowed {
        object.remove(&key);
    }
}

fn pascal_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn read_from_dir(root: &Utf8Path) -> Result<ManifestProbe, SError> {
    let paths = ManifestPaths::new(root);
    let mut last_error: Option<String> = None;

    for candidate in paths.candidates() {
        if !candidate.is_file() {
            continue;
        }
        let parsed = std::fs::read_to_string(candidate)
            .map_err(SError::from)
            .and_then(|text| parse_manifest(&text));
        match parsed {
            Ok(manifest) => {
                debug!("manifest for {root} read from {candidate}");
                return Ok(ManifestProbe {
                    manifest: Some(manifest),
                    has_classes: false,
                });
            }
            Err(e) => last_error = Some(format!("{candidate}: {e}")),
        }
    }

    match last_error {
        Some(reason) => Err(SError::ManifestUnreadable(reason)),
        None => Ok(ManifestProbe::default()),
    }
}

fn read_from_archive(archive_path: &Utf8Path) -> Result<ManifestProbe, SError> {
    let unreadable = |e: String| SError::ManifestUnreadable(format!("{archive_path}: {e}"));

    let file = File::open(archive_path).map_err(|e| unreadable(e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| unreadable(e.to_string()))?;

    let mut has_classes = false;
    let mut root_manifest: Option<String> = None;
    let mut server_manifest: Option<String> = None;

    for name in archive.file_names() {
        let normalized = name.replace('\\', "/").to_ascii_lowercase();
        if normalized.ends_with(".class") {
            has_classes = true;
        } else if normalized == "manifest.json" && root_manifest.is_none() {
            root_manifest = Some(name.to_string());
        } else if normalized == "server/manifest.json" && server_manifest.is_none() {
            server_manifest = Some(name.to_string());
        }
    }

    let Some(entry_name) = root_manifest.or(server_manifest) else {
        return Ok(ManifestProbe {
            manifest: None,
            has_classes,
        });
    };

    let mut text = String::new();
    archive
        .by_name(&entry_name)
        .map_err(|e| unreadable(e.to_string()))?
        .read_to_string(&mut text)
        .map_err(|e| unreadable(e.to_string()))?;

    let manifest = parse_manifest(&text).map_err(|e| unreadable(e.to_string()))?;
    Ok(ManifestProbe {
        manifest: Some(manifest),
        has_classes,
    })
}

/// Display name used when a candidate has no usable manifest.
pub fn fallback_name(path: &Utf8Path) -> String {
    let name = if path.is_dir() {
        path.file_name()
    } else {
        path.file_stem()
    };
    name.map(str::to_string).unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_and_listed_dependencies_normalize_to_ids() {
        let keyed = parse_manifest(
            r#"{"Group":"Acme","Name":"Core","Dependencies":{"Acme:Lib":"*","Other":">=1"},"OptionalDependencies":["Extra"]}"#,
        )
        .unwrap();
        assert_eq!(keyed.dependencies, vec!["Acme:Lib", "Other"]);
        assert_eq!(keyed.optional_dependencies, vec!["Extra"]);

        let listed = parse_manifest(r#"{"name":"Solo","dependencies":["A","B"]}"#).unwrap();
        assert_eq!(listed.name.as_deref(), Some("Solo"));
        assert_eq!(listed.dependencies, vec!["A", "B"]);
    }

    #[test]
    fn pascal_case_key_wins_over_its_alias() {
        let manifest = parse_manifest(
            r#"{"name":"lower","Name":"Upper","dependencies":["x"],"Dependencies":["Y"],"version":"1.0"}"#,
        )
        .unwrap();
        assert_eq!(manifest.name.as_deref(), Some("Upper"));
        assert_eq!(manifest.dependencies, vec!["Y"]);
        assert_eq!(manifest.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn non_object_manifests_are_rejected() {
        assert!(parse_manifest("[1, 2]").is_err());
        assert!(parse_manifest("{ not json").is_err());
    }

    #[test]
    fn blank_main_is_not_an_entry_point() {
        let manifest = parse_manifest(r#"{"Name":"P","Main":"  "}"#).unwrap();
        assert_eq!(manifest.entry_point(), None);
    }
}
