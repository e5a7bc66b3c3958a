use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use spendfx::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display exchange rates for every supported currency
    Rates {
        /// Currency the rates are expressed against
        #[arg(short, long)]
        base: Option<String>,
        /// Fetch fresh rates even if the cache is still fresh
        #[arg(short, long)]
        refresh: bool,
    },
    /// Convert an amount between currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
        /// Fail on unsupported currencies instead of assuming 1:1
        #[arg(long)]
        strict: bool,
    },
    /// Display the exchange rate between two currencies
    Rate { from: String, to: String },
    /// Display the rate cache location and age
    Status,
}

impl From<Commands> for spendfx::AppCommand {
    fn from(cmd: Commands) -> spendfx::AppCommand {
        match cmd {
            Commands::Rates { base, refresh } => spendfx::AppCommand::Rates { base, refresh },
            Commands::Convert {
                amount,
                from,
                to,
                strict,
            } => spendfx::AppCommand::Convert {
                amount,
                from,
                to,
                strict,
            },
            Commands::Rate { from, to } => spendfx::AppCommand::Rate { from, to },
            Commands::Status => spendfx::AppCommand::Status,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => spendfx::cli::setup::setup(),
        Some(cmd) => spendfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
