// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Response;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::api::Session;
use crate::dates::PuzzleDate;

pub const PUZ_EXTENSION: &str = "puz";
pub const DATE_PLACEHOLDER: &str = "{date}";

/// Download URL for `date`.
///
/// A template containing `{date}` gets the remote date substituted in;
/// anything else is treated as a prefix for `daily-<date>.puz`.
pub fn puzzle_url(template: &str, date: &PuzzleDate) -> String {
    if template.contains(DATE_PLACEHOLDER) {
        template.replace(DATE_PLACEHOLDER, &date.remote())
    } else {
        format!("{}daily-{}.{}", template, date.remote(), PUZ_EXTENSION)
    }
}

pub fn puzzle_path(output_dir: &Path, date: &PuzzleDate) -> PathBuf {
    output_dir.join(format!("{}.{}", date.remote(), PUZ_EXTENSION))
}

#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub succeeded: Vec<(PuzzleDate, PathBuf)>,
    pub failed: Vec<(PuzzleDate, String)>,
}

impl DownloadSummary {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn print(&self) {
        println!("\n✅ Downloaded {} puzzle(s)", self.succeeded_count());
        for (date, path) in &self.succeeded {
            println!("  {} - {}", date, path.display());
        }
        if !self.failed.is_empty() {
            println!("\n❌ Failed to download {} puzzle(s):", self.failed.len());
            for (date, error) in &self.failed {
                println!("  {} - {}", date, error);
            }
        }
    }
}

/// Fetches puzzles one date at a time over a logged-in session.
pub struct Downloader {
    session: Session,
    url_template: String,
    output_dir: PathBuf,
    show_progress: bool,
}

impl Downloader {
    pub fn new(
        session: Session,
        url_template: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            session,
            url_template: url_template.into(),
            output_dir: output_dir.into(),
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download every date in order. A failed date is recorded and the batch
    /// moves on; the session is dropped once the batch is done.
    pub async fn download_all(self, dates: Vec<PuzzleDate>) -> DownloadSummary {
        let progress = if self.show_progress {
            ProgressBar::new(dates.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        let mut summary = DownloadSummary::default();

        for date in dates {
            progress.set_message(format!("Downloading {}", date));

            match self.download(&date).await {
                Ok((path, bytes)) => {
                    let line = format!("{} OK! ({} bytes)", date, bytes);
                    if progress.is_hidden() {
                        println!("{}", line);
                    } else {
                        progress.println(line);
                    }
                    info!("Saved {} to {}", date, path.display());
                    summary.succeeded.push((date, path));
                }
                Err(e) => {
                    error!("Failed to download puzzle for {}: {:#}", date, e);
                    summary.failed.push((date, format!("{:#}", e)));
                }
            }
            progress.inc(1);
        }
        progress.finish_with_message("Done.");

        summary
    }

    /// Fetch one puzzle and write it to `<output_dir>/<yyyy-MM-dd>.puz`,
    /// replacing any existing file. Returns the path and the byte count.
    ///
    /// The body goes to `<yyyy-MM-dd>.puz.part` first and is renamed into
    /// place only once it has been read completely.
    pub async fn download(&self, date: &PuzzleDate) -> Result<(PathBuf, u64)> {
        let url = puzzle_url(&self.url_template, date);
        debug!("GET {}", url);

        let response = self.session.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Download failed with status {}", status);
        }

        let path = puzzle_path(&self.output_dir, date);
        let part = part_path(&path);
        let written = match write_body(response, &part).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(rm) = fs::remove_file(&part).await {
                    debug!("Could not remove {}: {}", part.display(), rm);
                }
                return Err(e);
            }
        };
        fs::rename(&part, &path)
            .await
            .with_context(|| format!("Failed to move {} to {}", part.display(), path.display()))?;

        Ok((path, written))
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

async fn write_body(response: Response, part: &Path) -> Result<u64> {
    let mut file = File::create(part)
        .await
        .with_context(|| format!("Failed to create {}", part.display()))?;

    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Failed to read response body")?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", part.display()))?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    Ok(written)
}
