use crate::models::mod_dto::ModEntry;
use crate::models::validation::ValidationResult;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ScanIssue {
    /// A second physical copy of an id; left on disk, not listed.
    DuplicateId {
        id: String,
        kept: Utf8PathBuf,
        ignored: Utf8PathBuf,
    },
    ManifestUnreadable { path: Utf8PathBuf, reason: String },
    ConfigCorrupt { path: Utf8PathBuf, reason: String },
    LocationUnreadable { path: Utf8PathBuf, reason: String },
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub install_path: Option<Utf8PathBuf>,
    pub world_id: Option<String>,
    pub entries: Vec<ModEntry>,
    pub validation: Option<ValidationResult>,
    pub issues: Vec<ScanIssue>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Enable,
    Disable,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub mod_id: String,
    pub direction: MoveDirection,
    pub from: Utf8PathBuf,
    pub to: Utf8PathBuf,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplySkip {
    pub mod_id: String,
    pub direction: MoveDirection,
    /// The existing path that blocked the move.
    pub blocked_by: Utf8PathBuf,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyFailure {
    pub mod_id: String,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    pub profile_id: String,
    pub applied_at: DateTime<Utc>,
    pub world_id: Option<String>,
    pub moved: Vec<MoveRecord>,
    pub skipped: Vec<ApplySkip>,
    pub failures: Vec<ApplyFailure>,
    /// Set when the world override write failed after the moves went through.
    pub world_error: Option<String>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty() && self.world_error.is_none()
    }
}
