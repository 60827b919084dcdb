use super::standings_models::RawGrid;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("No data found in range {0}")]
    NoData(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Sheets API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Where the workout log comes from.
///
/// The core only needs "give me the cells in this range"; OAuth and the
/// Sheets REST API are the infra layer's problem.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_grid(&self, spreadsheet_id: &str, range: &str) -> Result<RawGrid, SheetError>;
}
