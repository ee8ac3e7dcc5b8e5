use crate::models::error::SError;
use camino::Utf8Path;
use std::fs;

pub struct Json;

impl Json {
    /// Pretty-prints `data` into a sibling temp file and renames it over `path`,
    /// so readers never observe a half-written document.
    pub fn write_atomic<T: serde::Serialize>(path: &Utf8Path, data: &T) -> Result<(), SError> {
        let parent = path
            .parent()
            .ok_or_else(|| SError::IOError(format!("no parent directory for {path}")))?;
        fs::create_dir_all(parent)?;

        let file_name = path
            .file_name()
            .ok_or_else(|| SError::IOError(format!("no file name in {path}")))?;
        let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        let text = serde_json::to_string_pretty(data)?;
        fs::write(&temp_path, text)?;
        fs::rename(&temp_path, path).inspect_err(|_| {
            let _ = fs::remove_file(&temp_path);
        })?;
        Ok(())
    }
}
