//! Shared types, error model, and configuration for Groups2BuildingInstructions.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`Groups2BiError`], the unified error type
//! - Domain types ([`Group`], [`GroupSystem`], [`Step`], [`BuildingInstruction`])
//! - Configuration ([`AppConfig`], [`BuildOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildOptions, DefaultsConfig, OutputConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Groups2BiError, Result};
pub use types::{BUILDING_GUIDE_NAME, BuildingInstruction, Group, GroupSystem, Step};
