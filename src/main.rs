use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;

use screentime::cli::args::{Cli, Commands};
use screentime::cli::commands;
use screentime::config::Config;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    // RUST_LOG, when set, takes precedence over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("loading configuration")?;
    let format = cli.output.unwrap_or(config.general.default_output);
    let db = cli.db.as_deref();

    let output = match cli.command {
        Commands::Track(args) => commands::track(&args, &config, db, format)?,
        Commands::Report(args) => commands::report(&args, &config, db, format)?,
        Commands::History(args) => commands::history(&args, db, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{}", output.trim_end());
    }
    Ok(())
}
