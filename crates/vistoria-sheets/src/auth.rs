use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::client::SheetError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Service-account authentication for the Sheets API.
///
/// Signs a short-lived JWT assertion with the account's RSA key and exchanges
/// it for an access token at Google's OAuth token endpoint.
pub struct ServiceAccountAuth {
    client_email: String,
    encoding_key: EncodingKey,
    http: reqwest::Client,
}

impl ServiceAccountAuth {
    /// Build an authenticator from the service-account email and PEM key.
    ///
    /// Keys delivered through environment files commonly carry escaped `\n`
    /// sequences instead of real newlines; those are normalized before
    /// parsing.
    pub fn new(
        client_email: String,
        private_key_pem: &str,
        http: reqwest::Client,
    ) -> Result<Self, SheetError> {
        let pem = private_key_pem.replace("\\n", "\n");
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| SheetError::Auth(format!("invalid service account key: {}", e)))?;

        Ok(ServiceAccountAuth {
            client_email,
            encoding_key,
            http,
        })
    }

    /// Exchange a freshly signed assertion for an access token.
    pub async fn access_token(&self) -> Result<String, SheetError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| SheetError::Auth(format!("failed to sign assertion: {}", e)))?;

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status, "Token exchange failed");
            return Err(SheetError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}
