//! Application setup and initialization
//!
//! All initialization logic lives here instead of main.rs so tests can build
//! the application without binding a socket.

pub mod routes;
pub mod server;

use anyhow::{Context, Result};
use std::sync::Arc;

use vistoria_core::Config;
use vistoria_processing::signature::WhitePixelHeuristic;
use vistoria_sheets::{SheetsClient, TabularStore};
use vistoria_storage::create_storage;

use crate::services::email::{Notifier, SmtpNotifier};
use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize object storage")?;

    let sheets = setup_sheets(&config)?;
    let notifier = setup_notifier(&config);

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        sheets,
        notifier,
        classifier: Arc::new(WhitePixelHeuristic),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

fn setup_sheets(config: &Config) -> Result<Option<Arc<dyn TabularStore>>> {
    let (Some(spreadsheet_id), Some(email), Some(key)) = (
        &config.spreadsheet_id,
        &config.service_account_email,
        &config.service_account_private_key,
    ) else {
        // validate() guarantees these are all-or-nothing.
        tracing::warn!(
            "Spreadsheet credentials not configured; submissions will be rejected until they are set"
        );
        return Ok(None);
    };

    let client = SheetsClient::new(
        spreadsheet_id.clone(),
        config.sheet_range.clone(),
        email.clone(),
        key,
    )
    .context("Failed to initialize Sheets client")?;

    tracing::info!(spreadsheet_id = %spreadsheet_id, range = %config.sheet_range, "Sheets client initialized");
    Ok(Some(Arc::new(client)))
}

fn setup_notifier(config: &Config) -> Option<Arc<dyn Notifier>> {
    match SmtpNotifier::from_config(config) {
        Some(notifier) => Some(Arc::new(notifier)),
        None => {
            tracing::info!("SMTP not configured; notification emails disabled");
            None
        }
    }
}
