//! Configuration types
//!
//! Board-agnostic display configuration, loaded from TOML at boot.

pub mod hardware;
pub mod toml;
pub mod types;

pub use hardware::*;
pub use toml::parse_config;
pub use types::*;
