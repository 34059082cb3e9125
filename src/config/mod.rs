// src/config/mod.rs

//! Configuration loading and validation for watchcmd.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate semantic invariants like the version gate and rule shapes
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{EXAMPLE_CONFIG, load_and_validate, load_from_path, write_example_config};
pub use model::{CommandSection, ConfigFile, MonitorSection, NotifierSection};
pub use validate::{SUPPORTED_VERSION, validate_config};
