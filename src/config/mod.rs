//! Configuration loading

pub mod nugraph_toml;

pub use nugraph_toml::{NugraphConfig, OutputConfig, OutputFormat, CONFIG_FILE_NAME};
