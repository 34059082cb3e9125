// src/errors.rs

//! Crate-wide error aliases.
//!
//! Everything fatal happens during setup and is reported through `anyhow`
//! with context; runtime failures are logged and swallowed. A thin alias is
//! all that's needed, and it keeps one place to grow structured errors into.

pub use anyhow::{Error, Result};
