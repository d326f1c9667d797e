use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod execute;
mod topology;

use commands::Commands;

#[derive(Parser)]
#[command(name = "formwork")]
#[command(about = "Compile the storage application's topology into a deployment template", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Parse command-line arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    // Execute the command; a bare `formwork` synthesizes to stdout
    if let Some(command) = cli.command {
        command.execute()?;
    } else {
        Commands::Synth {
            output: None,
            compact: false,
        }
        .execute()?;
    }

    Ok(())
}

/// Initialize the tracing system
///
/// `FORMWORK_LOG` wins when set; otherwise the `-v` count picks the level.
/// Diagnostics go to stderr so template output on stdout stays parseable.
fn init_tracing(verbosity: u8) -> eyre::Result<()> {
    let default_directives = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("FORMWORK_LOG")
        .or_else(|_| EnvFilter::try_new(default_directives))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
