// sqlrun-core/src/infrastructure/config/mod.rs

pub mod loader;

pub use loader::{parse_runner_config, read_runner_config, validate};
