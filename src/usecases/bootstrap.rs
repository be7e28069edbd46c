use std::path::Path;

use crate::{
    infra::{
        self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError,
        storage_layout::StorageLayout,
    },
    usecases::context::AppContext,
};

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub username: Option<String>,
}

pub fn bootstrap(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<AppContext, AppError> {
    let context = build_context(&FileConfigAdapter::new(config_path), overrides)?;
    let layout = StorageLayout::resolve()?;
    let log_guard = infra::logging::init(&context.config.logging, &layout)?;

    tracing::info!(
        log_file = %layout.log_file().display(),
        server = %context.config.server.base_url,
        username = context.username(),
        "configuration loaded"
    );

    Ok(context.with_log_guard(log_guard))
}

fn build_context(
    config_adapter: &dyn ConfigAdapter,
    overrides: ConfigOverrides,
) -> Result<AppContext, AppError> {
    let mut config = config_adapter.load()?;

    if let Some(server) = overrides.server {
        config.server.base_url = server;
    }
    if let Some(username) = overrides.username {
        config.server.username = Some(username);
    }

    let username = config
        .server
        .username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(AppError::MissingUsername)?
        .to_owned();

    Ok(AppContext::new(config, username))
}
