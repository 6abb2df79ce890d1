//! Core data types for bemdecl.
//!
//! This crate defines BEM entities and declarations, the set algebra over
//! declarations (merge, intersect, subtract), the JSON declaration encodings,
//! BEMJSON entity collection, and project configuration.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod algebra;
pub mod bemjson;
pub mod codec;
pub mod config;
pub mod declaration;
pub mod entity;
pub mod error;

pub use declaration::{DeclEntry, Declaration};
pub use entity::BemEntity;
pub use error::{DeclError, MalformedEntity};
