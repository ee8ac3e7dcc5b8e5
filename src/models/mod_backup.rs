use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedModBackup {
    /// `<originalName>_<dash-escaped ISO-8601 timestamp>`; also the entry name on disk.
    pub backup_id: String,
    pub original_name: String,
    pub deleted_at: DateTime<Utc>,
    pub path: Utf8PathBuf,
    pub is_directory: bool,
    pub size: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub success: bool,
    pub backup_path: Utf8PathBuf,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOutcome {
    pub success: bool,
    pub restored_path: Utf8PathBuf,
}
