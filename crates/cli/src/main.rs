use anyhow::Result;
use clap::{Parser, Subcommand};
use command::{run_check, run_rewrite, CheckArgs, RewriteArgs};
use config::Config;
use std::path::PathBuf;

mod command;
mod config;
mod files;
mod report;

/// Exit status for usage, I/O, and config errors
const ERROR_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "samewindow")]
#[command(about = "Rewrite target=\"_blank\" links so they open in the same window", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (overrides SAMEWINDOW_CONFIG and ./samewindow.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite target="_blank" anchors to target="_self"
    Rewrite(RewriteArgs),

    /// List anchors that still open a new window (exit 1 if any)
    Check(CheckArgs),
}

fn init_logging(cli: &Cli) {
    let json_output = match &cli.command {
        Commands::Rewrite(args) => args.json,
        Commands::Check(args) => args.json,
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // stdout is reserved for JSON
    if cli.quiet || json_output {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Rewrite(args) => run_rewrite(args, &config),
        Commands::Check(args) => run_check(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ERROR_EXIT_CODE
        }
    };
    std::process::exit(code);
}
