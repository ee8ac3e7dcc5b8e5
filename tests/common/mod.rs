#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use mod_warden_lib::config::AppSettings;
use mod_warden_lib::core::locations::Locations;
use mod_warden_lib::models::mod_dto::ModLocation;
use mod_warden_lib::models::paths::{DataPathRules, InstallPathRules};
use mod_warden_lib::Session;
use std::fs;
use std::io::Write;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A fake game install plus an app data dir, both inside one temp dir.
pub struct Fixture {
    _tmp: TempDir,
    pub root: Utf8PathBuf,
    pub install: Utf8PathBuf,
    pub data_dir: Utf8PathBuf,
}

impl Fixture {
    /// Install with `UserData/Mods`, `UserData/Saves` and `earlyplugins`.
    pub fn new() -> Self {
        let fixture = Self::bare();
        let rules = fixture.install_rules();
        for dir in [&rules.mods, &rules.saves, &rules.early_plugins] {
            fs::create_dir_all(dir).unwrap();
        }
        fixture
    }

    /// Install root only, no game folders below it.
    pub fn bare() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let install = root.join("game");
        let data_dir = root.join("data");
        fs::create_dir_all(&install).unwrap();

        Self {
            _tmp: tmp,
            root,
            install,
            data_dir,
        }
    }

    pub fn install_rules(&self) -> InstallPathRules {
        InstallPathRules::new(&self.install)
    }

    pub fn data_paths(&self) -> DataPathRules {
        DataPathRules::new(&self.data_dir)
    }

    pub fn settings(&self) -> AppSettings {
        AppSettings {
            install_path_override: Some(self.install.clone()),
            data_dir_override: Some(self.data_dir.clone()),
            ..Default::default()
        }
    }

    pub fn session(&self) -> Session {
        Session::new(self.settings()).unwrap()
    }

    pub fn locations(&self) -> Locations {
        Locations::from_install(Some(&self.install), &self.data_paths())
    }

    pub fn mods(&self) -> Utf8PathBuf {
        self.install_rules().mods
    }

    pub fn early_plugins(&self) -> Utf8PathBuf {
        self.install_rules().early_plugins
    }

    pub fn disabled(&self, location: ModLocation) -> Utf8PathBuf {
        let dir = self.data_paths().disabled.join(location.dir_name());
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Creates `Saves/<name>/config.json` with the given contents.
    pub fn add_world(&self, name: &str, config: &str) -> Utf8PathBuf {
        let dir = self.install_rules().saves.join(name);
        fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("config.json");
        fs::write(&config_path, config).unwrap();
        config_path
    }
}

pub fn manifest(group: Option<&str>, name: &str, deps: &[&str]) -> String {
    let group = group
        .map(|g| format!(r#""Group": "{g}","#))
        .unwrap_or_default();
    let deps = deps
        .iter()
        .map(|d| format!(r#""{d}""#))
        .collect::<Vec<_>>()
        .join(", ");
    format!(r#"{{ {group} "Name": "{name}", "Version": "1.0.0", "Dependencies": [{deps}] }}"#)
}

/// Folder mod with an optional root `manifest.json` and one asset file.
pub fn write_mod_dir(parent: &Utf8Path, folder: &str, manifest_json: Option<&str>) -> Utf8PathBuf {
    let dir = parent.join(folder);
    fs::create_dir_all(dir.join("Common")).unwrap();
    fs::write(dir.join("Common/asset.bin"), folder).unwrap();
    if let Some(json) = manifest_json {
        fs::write(dir.join("manifest.json"), json).unwrap();
    }
    dir
}

/// Zip or jar built from `(entry name, contents)` pairs.
pub fn write_archive(path: &Utf8Path, entries: &[(&str, &[u8])]) -> Utf8PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
    path.to_path_buf()
}

/// Plugin jar with a root manifest and one compiled class.
pub fn write_plugin_jar(parent: &Utf8Path, file_name: &str, manifest_json: &str) -> Utf8PathBuf {
    write_archive(
        &parent.join(file_name),
        &[
            ("manifest.json", manifest_json.as_bytes()),
            ("com/acme/Main.class", b"\xca\xfe\xba\xbe"),
        ],
    )
}
