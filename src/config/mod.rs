//! Configuration module
//!
//! Display glyphs, table defaults and logging level, loaded from TOML.

pub mod config;

pub use config::Config;
