use crate::core::applicator;
use crate::core::session::Session;
use crate::models::error::SError;
use crate::models::profile::{Profile, ProfileUpdate};
use crate::models::report::ApplyReport;
use std::collections::BTreeSet;
use tracing::instrument;

#[instrument(skip(session))]
pub fn apply_profile(
    session: &Session,
    profile_id: &str,
    world_id: Option<&str>,
) -> Result<ApplyReport, SError> {
    let locations = session.locations();
    session.ensure_game_stopped(&locations)?;

    let world = session.resolve_world(&locations, world_id)?;
    let store = session.profiles();
    applicator::apply(&locations, &store, world.as_ref(), profile_id)
}

#[instrument(skip(session))]
pub fn list_profiles(session: &Session) -> Result<Vec<Profile>, SError> {
    session.profiles().list()
}

#[instrument(skip(session))]
pub fn create_profile(
    session: &Session,
    name: &str,
    enabled_mods: BTreeSet<String>,
) -> Result<Profile, SError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SError::ParseError("profile name is empty".into()));
    }
    session.profiles().create(name, enabled_mods)
}

#[instrument(skip(session))]
pub fn update_profile(
    session: &Session,
    profile_id: &str,
    changes: ProfileUpdate,
) -> Result<Profile, SError> {
    session.profiles().update(profile_id, changes)
}

#[instrument(skip(session))]
pub fn delete_profile(session: &Session, profile_id: &str) -> Result<(), SError> {
    session.profiles().delete(profile_id)
}
