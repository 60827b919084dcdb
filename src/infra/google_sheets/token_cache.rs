//! On-disk OAuth token for an authorized user.
//!
//! The file format is the one Google's own client libraries write after the
//! browser consent flow (`token`, `refresh_token`, `expiry`, ...), so an
//! existing `google_token.json` keeps working. The consent flow itself is not
//! run here: without a usable token file the run fails with an auth error.
//!
//! Per run the file is read, refreshed if the access token is about to
//! expire, and written back. Only one run at a time is expected.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::standings::SheetError;

const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUserToken {
    /// The access token (written as "token" by Google's client libraries).
    #[serde(alias = "access_token", default)]
    pub token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// UTC, e.g. `2023-05-07T18:00:00.123456Z`.
    #[serde(default)]
    pub expiry: Option<String>,
    /// Fields we don't use (account, universe_domain, ...) survive a rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn format_expiry(expiry: DateTime<Utc>) -> String {
    expiry.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

impl AuthorizedUserToken {
    /// True when the access token is missing, has no readable expiry, or
    /// expires within the next minute.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return true;
        }
        match self.expiry.as_deref().and_then(parse_expiry) {
            Some(expiry) => expiry <= now + Duration::seconds(EXPIRY_MARGIN_SECS),
            None => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn auth_error(e: impl std::fmt::Display) -> SheetError {
    SheetError::Auth(e.to_string())
}

pub struct TokenCache {
    path: PathBuf,
    client: Client,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            client: Client::new(),
        }
    }

    pub fn load(&self) -> Result<AuthorizedUserToken, SheetError> {
        if !self.path.exists() {
            return Err(auth_error(format!(
                "no Google token at {}; run the consent flow once to create it",
                self.path.display()
            )));
        }
        let content = std::fs::read_to_string(&self.path).map_err(auth_error)?;
        serde_json::from_str(&content)
            .map_err(|e| auth_error(format!("invalid token file {}: {}", self.path.display(), e)))
    }

    pub fn save(&self, token: &AuthorizedUserToken) -> Result<(), SheetError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(auth_error)?;
            }
        }
        let content = serde_json::to_string_pretty(token).map_err(auth_error)?;
        std::fs::write(&self.path, content).map_err(auth_error)?;
        Ok(())
    }

    /// Returns a usable access token, refreshing and persisting it first if needed.
    pub async fn access_token(&self) -> Result<String, SheetError> {
        let token = self.load()?;
        if !token.needs_refresh(Utc::now()) {
            tracing::debug!("Using cached Google access token");
            return Ok(token.token);
        }

        tracing::info!(path = %self.path.display(), "Refreshing Google access token");
        let refreshed = self.refresh(&token).await?;
        self.save(&refreshed)?;
        Ok(refreshed.token)
    }

    async fn refresh(&self, token: &AuthorizedUserToken) -> Result<AuthorizedUserToken, SheetError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| auth_error("token expired and has no refresh_token"))?;

        let mut form = vec![
            ("client_id", token.client_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        if let Some(secret) = token.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self
            .client
            .post(&token.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(auth_error(format!("Token refresh failed ({}): {}", status, text)));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        let mut refreshed = token.clone();
        refreshed.token = body.access_token;
        refreshed.expiry = Some(format_expiry(
            Utc::now() + Duration::seconds(body.expires_in.unwrap_or(3600)),
        ));
        if let Some(new_refresh) = body.refresh_token {
            refreshed.refresh_token = Some(new_refresh);
        }
        Ok(refreshed)
    }
}
