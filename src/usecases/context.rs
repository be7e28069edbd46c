use tracing_appender::non_blocking::WorkerGuard;

use crate::infra::config::AppConfig;

/// Resolved configuration plus the resources that must live as long as the app.
pub struct AppContext {
    pub config: AppConfig,
    username: String,
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(config: AppConfig, username: String) -> Self {
        Self {
            config,
            username,
            _log_guard: None,
        }
    }

    pub fn with_log_guard(mut self, guard: WorkerGuard) -> Self {
        self._log_guard = Some(guard);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
