//! Shared utilities for bemdecl.
//!
//! This crate provides the cross-cutting concerns used by the other bemdecl
//! crates: the unified operation error type and filesystem helpers for
//! locating config files and writing build targets.

pub mod errors;
pub mod fs;
