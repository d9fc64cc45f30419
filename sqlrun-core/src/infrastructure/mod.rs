// sqlrun-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod source;
pub mod validator;

pub use adapters::open_connector;
pub use validator::SqlParserValidator;
