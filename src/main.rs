// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

mod api;
mod config;
mod dates;
mod downloads;
mod logging;
#[cfg(test)]
mod test_server;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use crate::config::Config;
use crate::dates::PuzzleDate;
use crate::downloads::{DownloadSummary, Downloader};

/// Log in to the crossword site and download daily .puz files.
#[derive(Parser, Debug)]
#[command(name = "puz-dl", version, about)]
struct Cli {
    /// Puzzle dates as MM-DD-YYYY, e.g. 06-01-2014
    dates: Vec<String>,

    /// Config file with credentials and URLs
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Where to write the .puz files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    app(cli).await
}

async fn app(cli: Cli) -> ExitCode {
    let dates = match build_date_list(&cli.dates) {
        Ok(dates) => dates,
        Err(e) => {
            eprintln!("Not initialized correctly: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match run(&cli, dates).await {
        Ok(summary) => {
            summary.print();
            println!("Done.");
            if summary.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_date_list(args: &[String]) -> Result<Vec<PuzzleDate>> {
    if args.is_empty() {
        anyhow::bail!("no puzzle dates given");
    }
    let dates = dates::parse_dates(args);
    if dates.is_empty() {
        anyhow::bail!("none of the {} date(s) given could be parsed", args.len());
    }
    Ok(dates)
}

async fn run(cli: &Cli, dates: Vec<PuzzleDate>) -> Result<DownloadSummary> {
    let config = Config::load(&cli.config)?;

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create {}", cli.output_dir.display()))?;

    println!("Downloading {} puzzles in .PUZ format", dates.len());

    let session = api::login(&config).await.context("Login failed")?;

    let summary = Downloader::new(session, config.puz_uri_template, cli.output_dir.clone())
        .with_progress(!cli.no_progress)
        .download_all(dates)
        .await;

    Ok(summary)
}
