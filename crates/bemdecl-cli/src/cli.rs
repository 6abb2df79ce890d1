//! CLI argument definitions for bemdecl.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use bemdecl_core::codec::DeclFormat;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "bemdecl",
    version,
    about = "Resolve and combine BEM declarations",
    long_about = "bemdecl expands BEM declarations through their dependency records into a \
                  deterministic build order, and merges, intersects or subtracts declarations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to bemdecl.toml (searched upwards from the bundle by default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bundle directory; `?` in file masks expands to its name
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub bundle: PathBuf,
}

/// Output options shared by every command that writes a declaration.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Target file mask
    #[arg(short = 'o', long)]
    pub target: Option<String>,
    /// Output shape: bemdecl or deps
    #[arg(long)]
    pub format: Option<DeclFormat>,
    /// Write JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

/// How `deps` and `tree` resolve a bundle.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Declaration file mask
    #[arg(long, default_value = "?.bemdecl.json")]
    pub source: String,
    /// Dependency records file mask
    #[arg(long, default_value = "?.records.json")]
    pub records: String,
    /// Only apply dependency records for this tech
    #[arg(long)]
    pub tech: Option<String>,
    /// Per-entity rollback budget
    #[arg(long)]
    pub retraction_limit: Option<usize>,
    /// Fail instead of recovering when a rollback is needed
    #[arg(long)]
    pub fail_on_rollback: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge declarations
    Merge {
        /// Source file masks
        #[arg(required = true)]
        sources: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Keep the entities common to all declarations
    Intersect {
        /// Source file masks
        #[arg(required = true)]
        sources: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove the entities of one declaration from another
    Subtract {
        /// Declaration to subtract from
        #[arg(long)]
        from: String,
        /// Declaration to subtract
        #[arg(long)]
        what: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Resolve dependencies into an ordered deps file
    Deps {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Target file mask
        #[arg(short = 'o', long, default_value = "?.deps.json")]
        target: String,
        /// Verify the resolved order before writing it
        #[arg(long)]
        check: bool,
        /// Write JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Collect the declaration of a BEMJSON template
    Bemjson {
        /// BEMJSON file mask
        #[arg(long, default_value = "?.bemjson.json")]
        source: String,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the resolved dependency tree
    Tree {
        #[command(flatten)]
        resolve: ResolveArgs,
        /// Maximum depth
        #[arg(long)]
        depth: Option<usize>,
        /// Explain why an entity is included
        #[arg(long)]
        why: Option<String>,
        /// Show what depends on an entity
        #[arg(long)]
        invert: Option<String>,
        /// Show the rollback report
        #[arg(long)]
        rollbacks: bool,
    },

    /// Print the canonical notation of entities
    Entity {
        /// Entity notations
        #[arg(required = true)]
        notations: Vec<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
