// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "puzdl.toml";

const USERNAME_ENV: &str = "PUZDL_USERNAME";
const PASSWORD_ENV: &str = "PUZDL_PASSWORD";

/// Site credentials and endpoints, read once at startup.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub username: String,
    pub password: String,
    #[serde(rename = "loginuri")]
    pub login_uri: String,
    /// Either contains `{date}` or is a prefix for `daily-<date>.puz`.
    #[serde(rename = "puz_uri_tmpl")]
    pub puz_uri_template: String,
    pub user_agent: String,
}

// Password is masked.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"********")
            .field("login_uri", &self.login_uri)
            .field("puz_uri_template", &self.puz_uri_template)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Load the TOML config at `path`, then apply `PUZDL_USERNAME` / `PUZDL_PASSWORD`.
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Error reading config file {}", path.display()))?;
        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Error parsing config file {}", path.display()))?;

        Ok(config.with_overrides(env::var(USERNAME_ENV).ok(), env::var(PASSWORD_ENV).ok()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }

    fn with_overrides(mut self, username: Option<String>, password: Option<String>) -> Self {
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            self.username = username;
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.password = password;
        }
        self
    }
}
