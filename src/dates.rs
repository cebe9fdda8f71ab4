// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fmt;
use tracing::warn;

/// Format typed on the command line, e.g. `06-01-2014` for 1 June 2014.
pub const ENTRY_FORMAT: &str = "%m-%d-%Y";
/// Format the remote site uses in its file names.
pub const REMOTE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PuzzleDate(NaiveDate);

impl From<NaiveDate> for PuzzleDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl PuzzleDate {
    pub fn parse_entry(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), ENTRY_FORMAT)
            .map(Self)
            .with_context(|| format!("Invalid date {:?}. Use MM-DD-YYYY", s))
    }

    #[cfg(test)]
    pub fn parse_remote(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s.trim(), REMOTE_FORMAT)
            .map(Self)
            .with_context(|| format!("Invalid date {:?}. Use YYYY-MM-DD", s))
    }

    pub fn remote(&self) -> String {
        self.0.format(REMOTE_FORMAT).to_string()
    }
}

impl fmt::Display for PuzzleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.remote())
    }
}

/// Build the date list in argument order, skipping entries that don't parse.
pub fn parse_dates<S: AsRef<str>>(args: &[S]) -> Vec<PuzzleDate> {
    args.iter()
        .filter_map(|arg| {
            let arg = arg.as_ref();
            match PuzzleDate::parse_entry(arg) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!("Problem parsing date: {} ({:#})", arg, e);
                    None
                }
            }
        })
        .collect()
}
