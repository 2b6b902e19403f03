//! CLI command definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// flowgraph - inspect, traverse and edit form flow graphs
#[derive(Parser, Debug)]
#[command(name = "flowgraph")]
#[command(version)]
#[command(about = "Inspect, traverse and edit form flow graphs")]
#[command(
    long_about = "Works on flow graphs stored as JSON objects of id -> node. Edits print the new graph together with the json0 ops that produce it."
)]
pub struct Cli {
    /// Config file (TOML, or JSON by extension). Falls back to $FLOWGRAPH_CONFIG.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Component catalog file, overriding the config's [[components]].
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that a graph has a root, no dangling edges and no cycles
    Validate {
        /// Graph JSON file
        graph: PathBuf,
    },

    /// Print the ids to present next
    Upcoming {
        /// Graph JSON file
        graph: PathBuf,

        /// Recorded breadcrumbs JSON file
        #[arg(short, long)]
        breadcrumbs: Option<PathBuf>,

        /// Order by position in the graph instead of discovery order
        #[arg(long, default_value_t = false)]
        depth_first: bool,
    },

    /// Replay ops against a graph and print the result
    Apply {
        /// Graph JSON file
        graph: PathBuf,

        /// Ops JSON file
        ops: PathBuf,

        /// Apply the inverse of the ops instead
        #[arg(long, default_value_t = false)]
        invert: bool,
    },

    /// Describe ops as change-log sentences
    Summarize {
        /// Graph JSON file the ops apply to
        graph: PathBuf,

        /// Ops JSON file
        ops: PathBuf,
    },

    /// Copy a subtree so it no longer shares its private nodes
    MakeUnique {
        /// Graph JSON file
        graph: PathBuf,

        /// Id of the subtree's top node
        id: String,

        /// Parent to attach the copy to (default: _root)
        #[arg(short, long)]
        parent: Option<String>,
    },
}
