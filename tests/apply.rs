mod common;

use common::{manifest, write_mod_dir, write_plugin_jar, Fixture};
use mod_warden_lib::commands;
use mod_warden_lib::core::applicator;
use mod_warden_lib::core::profile_store::ProfileStore;
use mod_warden_lib::core::world::{self, WorldInfo};
use mod_warden_lib::models::mod_dto::ModLocation;
use mod_warden_lib::models::report::MoveDirection;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;

fn ids(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn world_info(fx: &Fixture, name: &str, config: &str) -> WorldInfo {
    let config_path = fx.add_world(name, config);
    WorldInfo {
        id: name.to_string(),
        path: config_path.parent().unwrap().to_path_buf(),
        config_path,
        modified_at: None,
    }
}

fn read_json(path: &camino::Utf8Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn enable_transition_moves_and_writes_world_override() {
    let fx = Fixture::new();
    write_mod_dir(&fx.disabled(ModLocation::Mods), "X", None);
    let world = world_info(&fx, "Realm", r#"{"Seed":7,"Mods":{"X":{"Enabled":false,"Pinned":"1.0"}}}"#);
    let store = ProfileStore::open_in_memory().unwrap();
    let profile = store.create("Play", ids(&["X"])).unwrap();

    let report = applicator::apply(&fx.locations(), &store, Some(&world), &profile.id).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.moved.len(), 1);
    assert_eq!(report.moved[0].direction, MoveDirection::Enable);
    assert!(fx.mods().join("X").is_dir());
    assert!(!fx.disabled(ModLocation::Mods).join("X").exists());

    let doc = read_json(&world.config_path);
    assert_eq!(doc["Mods"]["X"]["Enabled"], true);
    assert_eq!(doc["Mods"]["X"]["Pinned"], "1.0");
    assert_eq!(doc["Seed"], 7);

    assert!(store.require(&profile.id).unwrap().is_active);
}

#[test]
fn second_apply_moves_nothing() {
    let fx = Fixture::new();
    write_plugin_jar(&fx.mods(), "Keep.jar", &manifest(None, "Keep", &[]));
    write_plugin_jar(&fx.mods(), "Drop.jar", &manifest(None, "Drop", &[]));
    write_mod_dir(&fx.disabled(ModLocation::Mods), "Back", None);
    let world = world_info(&fx, "W", "{}");
    let store = ProfileStore::open_in_memory().unwrap();
    let profile = store.create("P", ids(&["Keep", "Back"])).unwrap();
    let locations = fx.locations();

    let first = applicator::apply(&locations, &store, Some(&world), &profile.id).unwrap();
    assert_eq!(first.moved.len(), 2);
    assert!(fx.disabled(ModLocation::Mods).join("Drop.jar").is_file());
    assert!(fx.mods().join("Back").is_dir());
    let after_first = world::read_overrides(&world.config_path).unwrap();

    let second = applicator::apply(&locations, &store, Some(&world), &profile.id).unwrap();
    assert!(second.moved.is_empty());
    assert!(second.is_complete());
    assert_eq!(world::read_overrides(&world.config_path).unwrap(), after_first);
    assert_eq!(
        after_first.into_iter().filter(|(_, on)| *on).map(|(id, _)| id).collect::<BTreeSet<_>>(),
        ids(&["Back", "Keep"])
    );
}

#[test]
fn collision_at_destination_is_skipped_not_overwritten() {
    let fx = Fixture::new();
    fs::write(fx.disabled(ModLocation::Mods).join("Dup.jar"), "disabled copy").unwrap();
    write_plugin_jar(&fx.mods(), "Dup.jar", &manifest(None, "Dup", &[]));
    let store = ProfileStore::open_in_memory().unwrap();
    let profile = store.create("Empty", BTreeSet::new()).unwrap();

    let report = applicator::apply(&fx.locations(), &store, None, &profile.id).unwrap();

    assert!(report.moved.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].mod_id, "Dup");
    assert_eq!(
        report.skipped[0].blocked_by.file_name(),
        Some("Dup.jar")
    );
    // Both files untouched.
    assert!(fx.mods().join("Dup.jar").is_file());
    assert_eq!(
        fs::read_to_string(fx.disabled(ModLocation::Mods).join("Dup.jar")).unwrap(),
        "disabled copy"
    );
}

#[test]
fn stale_profile_reference_is_ignored() {
    let fx = Fixture::new();
    write_mod_dir(&fx.disabled(ModLocation::Mods), "Real", None);
    let world = world_info(&fx, "W", r#"{"Mods":{}}"#);
    let store = ProfileStore::open_in_memory().unwrap();
    let profile = store.create("P", ids(&["Real", "Z"])).unwrap();

    let report = applicator::apply(&fx.locations(), &store, Some(&world), &profile.id).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.moved.len(), 1);
    let overrides = world::read_overrides(&world.config_path).unwrap();
    assert_eq!(overrides.get("Real"), Some(&true));
    assert!(!overrides.contains_key("Z"));
}

#[test]
fn unknown_profile_is_not_found() {
    let fx = Fixture::new();
    let store = ProfileStore::open_in_memory().unwrap();
    let result = applicator::apply(&fx.locations(), &store, None, "missing");
    assert!(matches!(
        result,
        Err(mod_warden_lib::SError::NotFound(_))
    ));
}

#[test]
fn corrupt_world_config_is_reported_and_left_alone() {
    let fx = Fixture::new();
    write_mod_dir(&fx.disabled(ModLocation::Mods), "X", None);
    let world = world_info(&fx, "W", "{ broken");
    let store = ProfileStore::open_in_memory().unwrap();
    let profile = store.create("P", ids(&["X"])).unwrap();

    let report = applicator::apply(&fx.locations(), &store, Some(&world), &profile.id).unwrap();

    assert_eq!(report.moved.len(), 1);
    assert!(report.world_error.is_some());
    assert!(!report.is_complete());
    assert_eq!(fs::read_to_string(&world.config_path).unwrap(), "{ broken");
}

#[test]
fn early_plugins_return_to_their_own_folder() {
    let fx = Fixture::new();
    write_plugin_jar(&fx.early_plugins(), "Boot.jar", &manifest(None, "Boot", &[]));
    let store = ProfileStore::open_in_memory().unwrap();
    let off = store.create("Off", BTreeSet::new()).unwrap();
    let on = store.create("On", ids(&["Boot"])).unwrap();
    let locations = fx.locations();

    applicator::apply(&locations, &store, None, &off.id).unwrap();
    assert!(fx.disabled(ModLocation::EarlyPlugins).join("Boot.jar").is_file());

    applicator::apply(&locations, &store, None, &on.id).unwrap();
    assert!(fx.early_plugins().join("Boot.jar").is_file());
    assert_eq!(store.active().unwrap().map(|p| p.id), Some(on.id));
}

#[test]
fn apply_command_uses_most_recent_world() {
    let fx = Fixture::new();
    write_mod_dir(&fx.disabled(ModLocation::Mods), "X", None);
    let config_path = fx.add_world("Only", "{}");
    let session = fx.session();
    let profile = commands::create_profile(&session, "P", ids(&["X"])).unwrap();

    let report = commands::apply_profile(&session, &profile.id, None).unwrap();

    assert_eq!(report.world_id.as_deref(), Some("Only"));
    assert_eq!(read_json(&config_path)["Mods"]["X"]["Enabled"], true);
}

#[test]
fn one_failed_move_does_not_stop_the_batch() {
    let fx = Fixture::new();
    write_plugin_jar(&fx.early_plugins(), "Boot.jar", &manifest(None, "Boot", &[]));
    write_plugin_jar(&fx.mods(), "Other.jar", &manifest(None, "Other", &[]));
    // A plain file where the disabled early-plugins folder should be.
    let blocked = fx.locations().disabled_dir_for(ModLocation::EarlyPlugins);
    fs::create_dir_all(blocked.parent().unwrap()).unwrap();
    fs::write(&blocked, "not a folder").unwrap();
    let world = world_info(&fx, "W", "{}");
    let store = ProfileStore::open_in_memory().unwrap();
    let profile = store.create("Off", BTreeSet::new()).unwrap();

    let report = applicator::apply(&fx.locations(), &store, Some(&world), &profile.id).unwrap();

    assert_eq!(report.moved.len(), 1);
    assert_eq!(report.moved[0].mod_id, "Other");
    assert!(fx.disabled(ModLocation::Mods).join("Other.jar").is_file());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].mod_id, "Boot");
    assert!(fx.early_plugins().join("Boot.jar").is_file());
    assert!(!report.is_complete());
    assert!(report.world_error.is_none());
    assert!(store.require(&profile.id).unwrap().is_active);
}
