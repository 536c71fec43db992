// src/state.rs

use std::sync::Arc;

use crate::services::ReportService;
use crate::session::SessionStore;

/// Shared application state handed to every handler.
pub struct AppState {
    pub sessions: SessionStore,
    pub reports: ReportService,
}

pub type SharedState = Arc<AppState>;
