// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use tracing::debug;

/// Hidden inputs the login endpoint expects back, besides the credentials.
pub const LOGIN_FIELDS: [&str; 4] = ["is_continue", "token", "expires", "remember"];

pub const USERNAME_FIELD: &str = "userid";
pub const PASSWORD_FIELD: &str = "password";

/// Name/value pairs scraped from the login page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    fields: Vec<(String, String)>,
}

impl LoginForm {
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let input_selector =
            Selector::parse("form input").map_err(|e| anyhow!("Bad selector: {}", e))?;

        let mut fields: Vec<(String, String)> = Vec::with_capacity(LOGIN_FIELDS.len());
        for input in document.select(&input_selector) {
            let Some(name) = input.value().attr("name") else {
                continue;
            };
            if !LOGIN_FIELDS.contains(&name) || fields.iter().any(|(n, _)| n == name) {
                continue;
            }
            let value = input.value().attr("value").unwrap_or_default();
            fields.push((name.to_string(), value.to_string()));
        }

        for missing in LOGIN_FIELDS.iter().filter(|f| !fields.iter().any(|(n, _)| n == *f)) {
            debug!("Login page has no {} field", missing);
        }

        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The POST body: scraped fields followed by the credentials.
    pub fn into_body(self, username: &str, password: &str) -> Vec<(String, String)> {
        let mut body = self.fields;
        body.push((USERNAME_FIELD.to_string(), username.to_string()));
        body.push((PASSWORD_FIELD.to_string(), password.to_string()));
        body
    }
}
