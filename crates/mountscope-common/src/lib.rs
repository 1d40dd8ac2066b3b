//! # mountscope-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the mountscope workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and holds no Linux-specific code, so the filesystem
//! magic table in [`constants::magic`] is the only platform-dependent data.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
