use async_trait::async_trait;
use thiserror::Error;

use crate::auth::ServiceAccountAuth;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Append-only tabular record of submissions.
///
/// The spreadsheet-backed implementation is the production one; tests swap in
/// counting fakes.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Append all rows of one submission in a single batch call.
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), SheetError>;
}

/// Google Sheets append client.
pub struct SheetsClient {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    spreadsheet_id: String,
    range: String,
}

impl SheetsClient {
    pub fn new(
        spreadsheet_id: String,
        range: String,
        client_email: String,
        private_key_pem: &str,
    ) -> Result<Self, SheetError> {
        let http = reqwest::Client::new();
        let auth = ServiceAccountAuth::new(client_email, private_key_pem, http.clone())?;

        Ok(SheetsClient {
            http,
            auth,
            spreadsheet_id,
            range,
        })
    }
}

fn append_url(spreadsheet_id: &str, range: &str) -> String {
    format!(
        "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
        spreadsheet_id,
        urlencoding::encode(range)
    )
}

#[async_trait]
impl TabularStore for SheetsClient {
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        let token = self.auth.access_token().await?;
        let row_count = rows.len();
        let url = append_url(&self.spreadsheet_id, &self.range);

        let start = std::time::Instant::now();

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "values": rows }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status,
                rows = row_count,
                spreadsheet_id = %self.spreadsheet_id,
                "Sheet append failed"
            );
            return Err(SheetError::Api { status, body });
        }

        tracing::info!(
            rows = row_count,
            spreadsheet_id = %self.spreadsheet_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Sheet append successful"
        );

        Ok(())
    }
}
