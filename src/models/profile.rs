use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_PROFILE_ID: &str = "default";
pub const DEFAULT_PROFILE_NAME: &str = "Default";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub enabled_mods: BTreeSet<String>,
    /// Advisory only; the applicator never reorders anything on disk.
    pub load_order: Vec<String>,
    pub notes: Option<String>,
    pub readonly: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Profile {
    /// Drops every reference to an id outside `existing`. Returns true if anything changed.
    pub fn retain_existing(&mut self, existing: &BTreeSet<String>) -> bool {
        let before = (self.enabled_mods.len(), self.load_order.len());
        self.enabled_mods.retain(|id| existing.contains(id));
        self.load_order.retain(|id| existing.contains(id));
        before != (self.enabled_mods.len(), self.load_order.len())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub enabled_mods: Option<BTreeSet<String>>,
    pub load_order: Option<Vec<String>>,
    pub notes: Option<String>,
}
