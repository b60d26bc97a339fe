//! Command-line entry point for the lead console core.
//!
//! Runs without a subcommand to probe core linkage.

use clap::{Parser, Subcommand};
use leadconsole_cli::{import, start_logging, summary, CliResult};
use leadconsole_core::{ConsoleConfig, LatencyProfile};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "leadconsole_cli")]
#[command(about = "Inspect and seed a lead console store")]
struct Cli {
    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Delay each store operation like the interactive console does
    #[arg(long, global = true)]
    simulate_latency: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print lead and opportunity counts
    Summary {
        /// SQLite database file
        db_path: PathBuf,
    },

    /// Bulk-add leads from a JSON array while the store holds under 100 leads
    Import {
        /// SQLite database file
        db_path: PathBuf,
        /// JSON file with an array of leads
        seed: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let Some(command) = cli.command else {
        println!("leadconsole_core ping={}", leadconsole_core::ping());
        println!("leadconsole_core version={}", leadconsole_core::core_version());
        return Ok(());
    };

    let config_for = |db_path: PathBuf| {
        let mut config = ConsoleConfig::new(db_path);
        if cli.simulate_latency {
            config = config.with_latency(LatencyProfile::demo());
        }
        match &cli.log_dir {
            Some(dir) => config.with_log_dir(dir),
            None => config,
        }
    };

    match command {
        Commands::Summary { db_path } => {
            let config = config_for(db_path);
            start_logging(&config)?;
            println!("{}", summary(&config)?);
        }
        Commands::Import { db_path, seed } => {
            let config = config_for(db_path);
            start_logging(&config)?;
            println!("{}", import(&config, &seed)?);
        }
    }
    Ok(())
}
