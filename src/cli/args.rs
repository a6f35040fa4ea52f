use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "screentime")]
#[command(about = "Track how long each application holds focus and report daily, weekly or monthly usage")]
#[command(long_about = "screentime - foreground application usage tracker

Samples the focused application on a fixed interval, records one session
per contiguous stretch of focus, and aggregates the sessions into calendar
reports.

QUICK START:
  screentime track                  Record usage until Ctrl-C
  screentime report                 Today's usage per application
  screentime report -p weekly       This week's usage
  screentime history --limit 20     Most recent sessions

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default, alias 'text')
  --output json      Machine-readable JSON for scripting
  --output csv       One row per application

For more information on a specific command, run:
  screentime <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to `general.default_output` from the config file, which is
    /// 'pretty' unless changed.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Path of the session database
    #[arg(long, global = true, env = "SCREENTIME_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    #[value(alias = "text")]
    #[serde(alias = "text")]
    Pretty,
    /// Machine-readable JSON output.
    Json,
    /// Comma-separated values.
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record foreground application usage
    ///
    /// Polls the focused application until interrupted with Ctrl-C, then
    /// closes the open session and saves everything still pending.
    ///
    /// # Examples
    ///
    ///   screentime track              Sample every 5 seconds
    ///   screentime track -i 2         Sample every 2 seconds
    ///   screentime start -i 500ms     Short alias, sub-second interval
    #[command(alias = "start")]
    Track(TrackArgs),

    /// Show usage per application for a calendar period
    ///
    /// Sessions crossing the period boundary are clipped, so each minute of
    /// focus is counted in exactly one day, week or month.
    ///
    /// # Examples
    ///
    ///   screentime report                          Today
    ///   screentime report -p weekly                This week
    ///   screentime report -p monthly -d 2024-02-10 February 2024
    ///   screentime report -o csv --file usage.csv  Write CSV to a file
    #[command(alias = "r")]
    Report(ReportArgs),

    /// List the most recent sessions
    ///
    /// # Examples
    ///
    ///   screentime history
    ///   screentime history -n 50 -o json
    History(HistoryArgs),

    /// Generate shell completions
    ///
    /// Outputs completion script for the specified shell.
    /// Redirect to a file or source directly.
    ///
    /// Example: screentime completions bash > ~/.bash_completion.d/screentime
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the track command.
#[derive(Args, Debug, Default)]
pub struct TrackArgs {
    /// Time between samples (e.g. 5, 5s, 1m, 500ms; bare numbers are seconds)
    #[arg(short, long)]
    pub interval: Option<String>,
}

/// Arguments for the report command.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Period to report (daily, weekly, monthly)
    #[arg(short, long)]
    pub period: Option<String>,

    /// Report the period containing this date (YYYY-MM-DD) instead of today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Write the rendered report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Arguments for the history command.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of sessions to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}
