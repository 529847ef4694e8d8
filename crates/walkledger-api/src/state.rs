//! Shared application state.

use std::sync::Arc;

use walkledger_core::repository::LedgerRepository;
use walkledger_processing::application::worker::ActivityQueue;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Processed-activity ledger.
    pub ledger: Arc<dyn LedgerRepository>,
    /// Queue feeding the background activity worker.
    pub queue: ActivityQueue,
    /// Expected `hub.verify_token` for subscription validation, if any.
    pub verify_token: Option<Arc<str>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerRepository>,
        queue: ActivityQueue,
        verify_token: Option<String>,
    ) -> Self {
        Self {
            ledger,
            queue,
            verify_token: verify_token.map(Arc::from),
        }
    }
}
