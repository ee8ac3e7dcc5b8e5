pub mod error;
pub mod mod_backup;
pub mod mod_dto;
pub mod paths;
pub mod profile;
pub mod report;
pub mod validation;
