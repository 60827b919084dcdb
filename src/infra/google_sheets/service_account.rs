// Service-account authentication for the Sheets API.
//
// Setup: create a service account in Google Cloud, download its JSON key,
// enable the Google Sheets API and share the workout sheet with the service
// account's email (Viewer is enough). Point GOOGLE_SERVICE_ACCOUNT_KEY at the
// key file.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::SHEETS_READONLY_SCOPE;
use crate::core::standings::SheetError;

/// Service account credentials from the JSON key file.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountCredentials {
    /// The service account email (used as issuer in JWT).
    client_email: String,

    /// The private key in PEM format.
    private_key: String,

    /// The token URI (where to exchange JWT for access token).
    token_uri: String,
}

/// JWT claims for Google OAuth2.
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    /// Max 1 hour from iat.
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

fn auth_error(e: impl std::fmt::Display) -> SheetError {
    SheetError::Auth(e.to_string())
}

pub struct ServiceAccountAuth {
    credentials: ServiceAccountCredentials,
    client: Client,
}

impl ServiceAccountAuth {
    pub async fn from_file(path: &Path) -> Result<Self, SheetError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            auth_error(format!(
                "could not read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, SheetError> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(json).map_err(auth_error)?;
        Ok(Self {
            credentials,
            client: Client::new(),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    /// Exchanges a freshly signed JWT for an access token.
    ///
    /// The bot runs once per invocation, so the token is not cached.
    pub async fn access_token(&self) -> Result<String, SheetError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(auth_error)?
            .as_secs();

        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            scope: SHEETS_READONLY_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            iat: now,
            exp: now + 3600,
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes()).map_err(auth_error)?;
        let jwt = encode(&header, &claims, &key).map_err(auth_error)?;

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(auth_error(format!("Token exchange failed ({}): {}", status, text)));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| SheetError::Http(e.to_string()))?;
        tracing::debug!(account = %self.credentials.client_email, "Obtained service account token");
        Ok(token_response.access_token)
    }
}
