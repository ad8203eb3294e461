use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::date::{DEFAULT_BASE_URL, DEFAULT_SERVICE};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a day's schedule page and save it as JSON.
    Fetch(FetchArgs),
    /// Build a schedule from a saved HTML page.
    Parse(ParseArgs),
    /// Print a saved schedule.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Schedule day as YYYY-MM-DD (default: today, UK time).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Broadcast service id in the schedule URL.
    #[arg(long, default_value = DEFAULT_SERVICE)]
    pub service: String,

    /// Schedules root; the service id and date are appended as path segments.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output directory; the file is named `<YYYY-MM-DD>.json`.
    #[arg(long, default_value = "json")]
    pub out: String,

    /// Overwrite an existing schedule file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Saved schedule page.
    #[arg(long)]
    pub html: String,

    /// URL the page was fetched from (default: file URL of `--html`).
    #[arg(long)]
    pub url: Option<String>,

    /// Output file path (default: stdout).
    #[arg(long)]
    pub out: Option<String>,

    /// Overwrite an existing output file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Schedule JSON written by `fetch` or `parse`.
    #[arg(long)]
    pub schedule: String,
}
