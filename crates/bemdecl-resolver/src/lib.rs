//! Dependency resolution engine: breadth-first expansion of a declaration
//! through a dependency provider, `must`/`should` graph construction, and
//! linearization with rollback and cycle detection.

pub mod builder;
pub mod diagnostics;
pub mod graph;
pub mod order;
pub mod provider;
pub mod resolver;

pub use provider::{DependencyProvider, DependencyRecord, ProviderError, StaticProvider};
pub use resolver::{resolve, CycleError, ResolutionResult, ResolveError, ResolveOptions};
