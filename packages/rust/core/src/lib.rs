//! Building instruction generation for Groups2BuildingInstructions.
//!
//! This crate turns the group hierarchy of an LXFML model into numbered
//! building steps (`builder`) and wires that into an end-to-end file
//! regeneration (`pipeline`).

pub mod builder;
pub mod part_refs;
pub mod pipeline;

pub use builder::{build_instruction, build_steps};
pub use pipeline::{RegenerateConfig, RegenerateResult, regenerate};
