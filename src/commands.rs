pub mod archive;
pub mod library;
pub mod profile;

pub use archive::{
    clear_deleted_mods, delete_mod, list_deleted_mods, permanently_delete_mod, restore_deleted_mod,
};
pub use library::{list_worlds, resolve_locations, scan, set_mod_enabled};
pub use profile::{apply_profile, create_profile, delete_profile, list_profiles, update_profile};
