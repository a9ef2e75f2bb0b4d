use std::sync::Arc;

use crate::telemetry::Registry;

/// Shared handler state. The registry is constructed once at startup and
/// injected here rather than living in a global.
#[derive(Clone, Default)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}
