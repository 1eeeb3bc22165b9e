//! Storage engines for redux-persistence
//!
//! This crate provides:
//! - [`MemoryEngine`] keeping the last saved state in memory
//! - [`FileEngine`] writing versioned JSON or TOML snapshots to disk
//! - Platform directory helpers in [`paths`]

pub mod file;
pub mod memory;
pub mod paths;

pub use file::{FileEngine, Format};
pub use memory::MemoryEngine;
