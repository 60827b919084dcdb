use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::service_account::ServiceAccountAuth;
use super::token_cache::TokenCache;
use crate::core::standings::{RawGrid, SheetError, SheetSource};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// How we prove to Google who we are.
pub enum GoogleAuth {
    ServiceAccount(ServiceAccountAuth),
    AuthorizedUser(TokenCache),
}

impl GoogleAuth {
    pub async fn access_token(&self) -> Result<String, SheetError> {
        match self {
            GoogleAuth::ServiceAccount(auth) => auth.access_token().await,
            GoogleAuth::AuthorizedUser(cache) => cache.access_token().await,
        }
    }
}

/// Response body of `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[allow(dead_code)]
    range: Option<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn grid_from_values(values: Vec<Vec<serde_json::Value>>) -> RawGrid {
    values
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect()
}

/// Read-only client for the Google Sheets values API.
pub struct GoogleSheetsClient {
    client: Client,
    auth: GoogleAuth,
    base_url: String,
}

impl GoogleSheetsClient {
    pub fn new(auth: GoogleAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: SHEETS_BASE_URL.to_string(),
        }
    }

    /// `{base}/spreadsheets/{id}/values/{range}` with both ids percent-encoded.
    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url, SheetError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SheetError::Http(format!("invalid Sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::Http("Sheets base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(&["spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn fetch_grid(&self, spreadsheet_id: &str, range: &str) -> Result<RawGrid, SheetError> {
        let token = self.auth.access_token().await?;
        let url = self.values_url(spreadsheet_id, range)?;

        tracing::debug!(range, "Fetching Google Sheet values");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(SheetError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        if body.values.is_empty() {
            tracing::error!(range, "Google Sheet returned no data");
            return Err(SheetError::NoData(range.to_string()));
        }

        tracing::debug!(rows = body.values.len(), "Access to Google Sheets succeeded");
        Ok(grid_from_values(body.values))
    }
}
