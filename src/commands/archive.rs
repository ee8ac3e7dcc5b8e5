use crate::core::deleted_archive;
use crate::core::session::Session;
use crate::models::error::SError;
use crate::models::mod_backup::{DeleteOutcome, DeletedModBackup, RestoreOutcome};
use camino::Utf8Path;
use tracing::{info, instrument};

#[instrument(skip(session))]
pub fn delete_mod(session: &Session, mod_id: &str, mod_path: &Utf8Path) -> Result<DeleteOutcome, SError> {
    let locations = session.locations();
    session.ensure_game_stopped(&locations)?;

    let outcome = deleted_archive::delete_mod(&locations, mod_path)?;
    info!("{mod_id} moved to the deleted archive");
    Ok(outcome)
}

#[instrument(skip(session))]
pub fn list_deleted_mods(session: &Session) -> Result<Vec<DeletedModBackup>, SError> {
    deleted_archive::list_deleted_mods(&session.locations())
}

#[instrument(skip(session))]
pub fn restore_deleted_mod(session: &Session, backup_id: &str) -> Result<RestoreOutcome, SError> {
    let locations = session.locations();
    session.ensure_game_stopped(&locations)?;
    deleted_archive::restore_deleted_mod(&locations, backup_id)
}

#[instrument(skip(session))]
pub fn permanently_delete_mod(session: &Session, backup_id: &str) -> Result<(), SError> {
    deleted_archive::permanently_delete(&session.locations(), backup_id)
}

#[instrument(skip(session))]
pub fn clear_deleted_mods(session: &Session) -> Result<usize, SError> {
    deleted_archive::clear_all(&session.locations())
}
