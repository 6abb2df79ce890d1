//! High-level operations wiring CLI commands to the core and the resolver:
//! one tech per declaration transformation, plus tree reports.

pub mod bundle;
pub mod ops_bemjson;
pub mod ops_deps;
pub mod ops_intersect;
pub mod ops_merge;
pub mod ops_subtract;
pub mod ops_tree;
pub mod tech;
