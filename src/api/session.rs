// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, Url};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::login_form::LoginForm;
use crate::config::Config;

/// A client whose cookie jar holds the cookies set during login.
pub struct Session {
    client: Client,
    // Same jar, but never follows redirects. Used for the login POST.
    form_client: Client,
    jar: Arc<Jar>,
}

impl Session {
    fn new(user_agent: &str) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("Failed to build HTTP client")?;
        let form_client = Client::builder()
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .redirect(Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            form_client,
            jar,
        })
    }

    pub async fn get(&self, url: &str) -> Result<Response> {
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))
    }

    pub fn has_cookies_for(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|url| self.jar.cookies(&url))
            .is_some()
    }
}

/// Log in with the configured credentials.
///
/// GETs the login page to pick up the hidden form fields, then POSTs them back
/// with the username and password. The POST is sent exactly once and a
/// redirect in its answer is not followed. The server's answer isn't checked
/// beyond logging: a transport error is the only failure.
pub async fn login(config: &Config) -> Result<Session> {
    let session = Session::new(&config.user_agent)?;

    info!("Loading login page {}", config.login_uri);
    let response = session.get(&config.login_uri).await?;
    let status = response.status();
    if !status.is_success() {
        warn!("Login page returned {}", status);
    }
    let html = response
        .text()
        .await
        .context("Failed to get login page text")?;

    let form = LoginForm::parse(&html)?;
    if form.is_empty() {
        warn!("Login page has none of the expected form fields");
    } else if form.get("token").is_none() {
        warn!("Login page has no token field; login will probably fail");
    } else {
        debug!("Scraped {} login form fields", form.len());
    }

    let body = form.into_body(&config.username, &config.password);
    let response = session
        .form_client
        .post(&config.login_uri)
        .form(&body)
        .send()
        .await
        .context("Failed to send login request")?;

    let status = response.status();
    if status.is_success() || status.is_redirection() {
        info!("Logged in as {} ({})", config.username, status);
    } else {
        warn!("Login request returned {}; downloads may fail", status);
    }

    if !session.has_cookies_for(&config.login_uri) {
        warn!("No cookies were set during login");
    }

    Ok(session)
}
