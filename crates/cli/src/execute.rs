use crate::commands::Commands;
use formwork_core::Result;

impl Commands {
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Synth { output, compact } => crate::commands::synth::execute(output, compact),
            Commands::Validate => crate::commands::validate::execute(),
            Commands::Graph { dot } => crate::commands::graph::execute(dot),
            Commands::Outputs => crate::commands::outputs::execute(),
        }
    }
}
