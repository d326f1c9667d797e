use clap::Subcommand;
use std::path::PathBuf;

pub mod graph;
pub mod outputs;
pub mod synth;
pub mod validate;

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize the deployment template as JSON
    Synth {
        /// Write the template to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Emit compact single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Build the topology and run every validation pass
    Validate,

    /// Display the resource dependency graph
    Graph {
        /// Emit Graphviz DOT instead of an edge list
        #[arg(long)]
        dot: bool,
    },

    /// List the declared outputs and their source expressions
    Outputs,
}
