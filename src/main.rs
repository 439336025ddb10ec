use anyhow::Result;
use clap::{Parser, Subcommand};
use fxtui::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxtui::AppCommand {
    fn from(cmd: Commands) -> fxtui::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => fxtui::AppCommand::Convert { amount, from, to },
            Commands::Rates => fxtui::AppCommand::Rates,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount once and print the result
    Convert {
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Currency code to convert from
        from: String,
        /// Currency code to convert to
        to: String,
    },
    /// Show the current exchange rate table
    Rates,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxtui::cli::setup::setup(),
        Some(cmd) => fxtui::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            fxtui::run_command(fxtui::AppCommand::Interactive, cli.config_path.as_deref()).await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
