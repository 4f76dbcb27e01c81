//! End-to-end pipeline tests with in-memory collaborators.
//!
//! Storage, the tabular store, and the notifier are replaced by counting
//! fakes so every external interaction of one submission can be asserted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use vistoria_api::services::email::Notifier;
use vistoria_api::services::pipeline::process_submission;
use vistoria_api::state::AppState;
use vistoria_core::models::{InspectionId, InspectionItem, InspectionSubmission};
use vistoria_core::{AppError, Config, StorageBackend};
use vistoria_processing::signature::WhitePixelHeuristic;
use vistoria_sheets::{SheetError, TabularStore, COLUMN_COUNT};
use vistoria_storage::{Storage, StorageError, StorageResult};

struct FakeStorage {
    uploads: AtomicUsize,
    fail_with: Option<String>,
}

impl FakeStorage {
    fn succeeding() -> Arc<Self> {
        Arc::new(FakeStorage {
            uploads: AtomicUsize::new(0),
            fail_with: None,
        })
    }

    fn failing(reason: &str) -> Arc<Self> {
        Arc::new(FakeStorage {
            uploads: AtomicUsize::new(0),
            fail_with: Some(reason.to_string()),
        })
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn upload(
        &self,
        storage_key: &str,
        _content_type: &str,
        _data: Vec<u8>,
    ) -> StorageResult<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(reason) => Err(StorageError::UploadFailed(reason.clone())),
            None => Ok(format!("https://store.example.com/{}", storage_key)),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

struct FakeSheets {
    appended: Mutex<Vec<Vec<Vec<String>>>>,
    fail: bool,
}

impl FakeSheets {
    fn recording() -> Arc<Self> {
        Arc::new(FakeSheets {
            appended: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(FakeSheets {
            appended: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn batches(&self) -> Vec<Vec<Vec<String>>> {
        self.appended.lock().expect("lock").clone()
    }
}

#[async_trait]
impl TabularStore for FakeSheets {
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        if self.fail {
            return Err(SheetError::Api {
                status: 503,
                body: "backend unavailable".to_string(),
            });
        }
        self.appended.lock().expect("lock").push(rows);
        Ok(())
    }
}

struct FakeNotifier {
    calls: AtomicUsize,
    succeed: bool,
}

impl FakeNotifier {
    fn new(succeed: bool) -> Arc<Self> {
        Arc::new(FakeNotifier {
            calls: AtomicUsize::new(0),
            succeed,
        })
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(
        &self,
        _recipient: &str,
        document: &[u8],
        _inspection_id: &InspectionId,
    ) -> bool {
        assert!(document.starts_with(b"%PDF-"));
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.succeed
    }
}

fn test_config() -> Config {
    Config {
        server_port: 4000,
        cors_origins: vec!["*".to_string()],
        environment: "development".to_string(),
        spreadsheet_id: Some("sheet-id".to_string()),
        sheet_range: "Inspections!A:V".to_string(),
        service_account_email: Some("svc@example.iam.gserviceaccount.com".to_string()),
        service_account_private_key: Some("unused".to_string()),
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some("/tmp/vistoria-test".to_string()),
        local_storage_base_url: Some("http://localhost:4000/artifacts".to_string()),
        smtp_host: None,
        smtp_port: 587,
        smtp_user: None,
        smtp_password: None,
        smtp_from: None,
        smtp_tls: true,
    }
}

fn state(
    storage: Option<Arc<dyn Storage>>,
    sheets: Option<Arc<dyn TabularStore>>,
    notifier: Option<Arc<dyn Notifier>>,
) -> AppState {
    AppState {
        config: test_config(),
        storage,
        sheets,
        notifier,
        classifier: Arc::new(WhitePixelHeuristic),
    }
}

/// A data URL large enough and varied enough to classify as inked.
fn inked_data_url() -> String {
    let bytes: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
    format!("data:image/png;base64,{}", STANDARD.encode(&bytes))
}

/// An all-white payload, classified as an untouched pad.
fn blank_data_url() -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(vec![0xffu8; 4096]))
}

fn submission_with_items(count: u32) -> InspectionSubmission {
    let mut submission = InspectionSubmission::default();
    submission.header.department = "Operations".to_string();
    submission.conclusion = "acceptable".to_string();
    submission.items = (1..=count)
        .map(|n| InspectionItem {
            sequence_number: n,
            observed_fact: format!("finding {}", n),
            ..Default::default()
        })
        .collect();
    submission
}

#[tokio::test]
async fn blank_signatures_are_never_uploaded() {
    let storage = FakeStorage::succeeding();
    let sheets = FakeSheets::recording();
    let state = state(Some(storage.clone()), Some(sheets.clone()), None);

    let mut submission = submission_with_items(1);
    submission.signatures.inspector = Some(blank_data_url());
    submission.signatures.unit_responsible = None;

    let response = process_submission(&state, submission).await.expect("success");
    assert!(response.success);

    assert_eq!(storage.uploads.load(Ordering::SeqCst), 0);
    let batches = sheets.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0][0][20], "not signed");
    assert_eq!(batches[0][0][21], "not signed");
}

#[tokio::test]
async fn inked_signature_uploaded_once_and_fanned_to_all_rows() {
    let storage = FakeStorage::succeeding();
    let sheets = FakeSheets::recording();
    let state = state(Some(storage.clone()), Some(sheets.clone()), None);

    let mut submission = submission_with_items(3);
    submission.signatures.inspector = Some(inked_data_url());

    process_submission(&state, submission).await.expect("success");

    // One signature upload, no evidence (items carry no photos).
    assert_eq!(storage.uploads.load(Ordering::SeqCst), 1);
    let batch = &sheets.batches()[0];
    assert_eq!(batch.len(), 3);
    for row in batch {
        assert_eq!(row.len(), COLUMN_COUNT);
        assert_eq!(row[20], batch[0][20]);
        assert!(row[20].starts_with("=HYPERLINK(\"https://store.example.com/signatures/"));
        assert_eq!(row[21], "not signed");
    }
}

#[tokio::test]
async fn storage_failure_degrades_but_request_succeeds() {
    let storage = FakeStorage::failing("quota exceeded");
    let sheets = FakeSheets::recording();
    let state = state(Some(storage.clone()), Some(sheets.clone()), None);

    let mut submission = submission_with_items(2);
    submission.items[0].photo = Some(inked_data_url());
    submission.signatures.inspector = Some(inked_data_url());

    let response = process_submission(&state, submission).await.expect("success");
    assert!(response.success);

    let batch = &sheets.batches()[0];
    assert!(batch[0][18].contains("quota exceeded"));
    assert_eq!(batch[1][18], "none");
    assert!(batch[0][20].contains("quota exceeded"));
}

#[tokio::test]
async fn evidence_outcomes_are_independent_per_item() {
    let storage = FakeStorage::succeeding();
    let sheets = FakeSheets::recording();
    let state = state(Some(storage.clone()), Some(sheets.clone()), None);

    let mut submission = submission_with_items(3);
    submission.items[0].photo = Some(inked_data_url());
    submission.items[2].photo = Some("a plain caption, not an image".to_string());

    process_submission(&state, submission).await.expect("success");

    assert_eq!(storage.uploads.load(Ordering::SeqCst), 1);
    let batch = &sheets.batches()[0];
    assert!(batch[0][18].contains("view evidence"));
    assert_eq!(batch[1][18], "none");
    // Non-image photo values count as absent, not as a failed upload.
    assert_eq!(batch[2][18], "none");
}

#[tokio::test]
async fn missing_storage_marks_uploads_failed_without_failing_request() {
    let sheets = FakeSheets::recording();
    let state = state(None, Some(sheets.clone()), None);

    let mut submission = submission_with_items(1);
    submission.items[0].photo = Some(inked_data_url());
    submission.signatures.inspector = Some(inked_data_url());

    let response = process_submission(&state, submission).await.expect("success");
    assert!(response.success);

    let batch = &sheets.batches()[0];
    assert!(batch[0][18].contains("storage is not configured"));
    assert!(batch[0][20].contains("storage is not configured"));
}

#[tokio::test]
async fn zero_items_appends_exactly_one_placeholder_row() {
    let sheets = FakeSheets::recording();
    let state = state(None, Some(sheets.clone()), None);

    process_submission(&state, submission_with_items(0))
        .await
        .expect("success");

    let batch = &sheets.batches()[0];
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].len(), COLUMN_COUNT);
    assert_eq!(batch[0][12], "no items were added");
}

#[tokio::test]
async fn sheet_append_failure_fails_the_request() {
    let sheets = FakeSheets::failing();
    let state = state(None, Some(sheets), None);

    let result = process_submission(&state, submission_with_items(1)).await;
    match result {
        Err(AppError::SheetAppend(message)) => assert!(message.contains("503")),
        other => panic!("expected sheet append error, got {:?}", other.map(|r| r.success)),
    }
}

#[tokio::test]
async fn missing_sheets_configuration_is_a_config_error() {
    let state = state(None, None, None);

    let result = process_submission(&state, submission_with_items(1)).await;
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[tokio::test]
async fn notification_failure_does_not_fail_the_request() {
    let sheets = FakeSheets::recording();
    let notifier = FakeNotifier::new(false);
    let state = state(None, Some(sheets.clone()), Some(notifier.clone()));

    let mut submission = submission_with_items(1);
    submission.header.notification_email = Some("qsms@example.com".to_string());

    let response = process_submission(&state, submission).await.expect("success");
    assert!(response.success);
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    // The record was still committed.
    assert_eq!(sheets.batches().len(), 1);
}

#[tokio::test]
async fn no_recipient_skips_notification() {
    let sheets = FakeSheets::recording();
    let notifier = FakeNotifier::new(true);
    let state = state(None, Some(sheets), Some(notifier.clone()));

    let mut submission = submission_with_items(1);
    submission.header.notification_email = Some("   ".to_string());

    process_submission(&state, submission).await.expect("success");
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
}
