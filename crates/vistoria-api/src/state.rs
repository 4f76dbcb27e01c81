//! Application state.
//!
//! One `AppState` built at startup and shared by all requests. Every external
//! collaborator sits behind a trait object so tests can swap in fakes; the
//! optional ones are `None` when their configuration is absent and the
//! pipeline degrades accordingly.

use std::sync::Arc;

use vistoria_core::Config;
use vistoria_processing::signature::BlankClassifier;
use vistoria_sheets::TabularStore;
use vistoria_storage::Storage;

use crate::services::email::Notifier;

pub struct AppState {
    pub config: Config,
    /// Object storage for signature and evidence images. `None` degrades
    /// every upload to a failure outcome, not the request.
    pub storage: Option<Arc<dyn Storage>>,
    /// The tabular store. `None` fails submissions with a configuration
    /// error; recording the form is the one thing this service must do.
    pub sheets: Option<Arc<dyn TabularStore>>,
    /// Best-effort mail delivery. `None` skips notification entirely.
    pub notifier: Option<Arc<dyn Notifier>>,
    pub classifier: Arc<dyn BlankClassifier>,
}
