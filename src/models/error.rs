use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Display, Clone, PartialEq)]
pub enum SError {
    #[display("not found: {_0}")]
    NotFound(String),
    #[display("path escapes managed roots: {_0}")]
    PathEscape(String),
    #[display("destination already exists: {_0}")]
    NameCollision(String),
    #[display("could not remove {path} ({reason}), complete copy kept at {kept}")]
    RemovalIncomplete {
        path: String,
        kept: String,
        reason: String,
    },
    #[display("manifest unreadable: {_0}")]
    ManifestUnreadable(String),
    #[display("world config corrupt: {_0}")]
    ConfigCorrupt(String),
    #[display("io error: {_0}")]
    IOError(String),
    #[display("parse error: {_0}")]
    ParseError(String),
    #[display("database error: {_0}")]
    Database(String),
    #[display("profile is readonly: {_0}")]
    ReadonlyProfile(String),
    #[display("game is running")]
    GameRunning,
    #[display("no game installation found")]
    NoInstallation,
    #[display("unexpected error: {_0:?}")]
    Unexpected(Option<String>),
}

impl std::error::Error for SError {}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<zip::result::ZipError> for SError {
    fn from(e: zip::result::ZipError) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<rusqlite::Error> for SError {
    fn from(e: rusqlite::Error) -> Self {
        SError::Database(e.to_string())
    }
}

impl From<walkdir::Error> for SError {
    fn from(e: walkdir::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<confy::ConfyError> for SError {
    fn from(e: confy::ConfyError) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<std::path::StripPrefixError> for SError {
    fn from(e: std::path::StripPrefixError) -> Self {
        SError::ParseError(e.to_string())
    }
}
