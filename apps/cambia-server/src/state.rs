//! Application state management

use std::sync::Arc;

use crate::config::Config;

/// Shared application state
///
/// Conversions hold no shared mutable state; each request writes to its own
/// output file, so the state is just the configuration behind an Arc.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(config),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner
    }
}
