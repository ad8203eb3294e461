use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    schedscrape::logging::init().context("init logging")?;

    let cli = schedscrape::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        schedscrape::cli::Command::Fetch(args) => {
            schedscrape::scrape::fetch(args).context("fetch")?;
        }
        schedscrape::cli::Command::Parse(args) => {
            schedscrape::scrape::parse(args).context("parse")?;
        }
        schedscrape::cli::Command::Show(args) => {
            schedscrape::scrape::show(args).context("show")?;
        }
    }

    Ok(())
}
