// =============================================================================
// GOOGLE SHEETS MODULE
// =============================================================================
//
// Reads the workout tracker through the Sheets REST API.
//
// **Authentication Options:**
// 1. **Service Account**: `GOOGLE_SERVICE_ACCOUNT_KEY` points at the JSON key;
//    the sheet must be shared with the service account email.
// 2. **Authorized User**: a cached OAuth token file (`GOOGLE_TOKEN_FILE`,
//    default `secrets/google_token.json`) with a refresh token.

pub mod service_account;
pub mod sheets_client;
pub mod token_cache;

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

pub use service_account::ServiceAccountAuth;
pub use sheets_client::{GoogleAuth, GoogleSheetsClient};
pub use token_cache::TokenCache;
