pub mod applicator;
pub mod deleted_archive;
pub mod locations;
pub mod manifest;
pub mod profile_store;
pub mod scanner;
pub mod session;
pub mod validator;
pub mod world;
