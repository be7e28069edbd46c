use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::infra::config::ServerConfig;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should be creatable");
        file.write_all(contents.as_bytes())
            .expect("must write test config");
        file
    }

    #[test]
    fn returns_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");

        let config = load(Some(&dir.path().join("missing.toml"))).expect("config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn merges_file_values_over_defaults() {
        let file = config_file(
            r#"[logging]
level = "debug"

[server]
base_url = "https://chat.example.org"
username = "alice"
"#,
        );

        let config = load(Some(file.path())).expect("config must load");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.server.base_url, "https://chat.example.org");
        assert_eq!(config.server.username.as_deref(), Some("alice"));
        assert_eq!(
            config.server.request_timeout_ms,
            ServerConfig::default().request_timeout_ms
        );
        assert_eq!(config.startup, AppConfig::default().startup);
    }

    #[test]
    fn blank_username_is_treated_as_unset() {
        let file = config_file("[server]\nusername = \"   \"\n");

        let config = load(Some(file.path())).expect("config must load");

        assert_eq!(config.server.username, None);
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let file = config_file("[server]\nrequest_timeout_ms = \"soon\"\n");

        let error = load(Some(file.path())).expect_err("config must fail");

        assert!(matches!(error, AppError::ConfigParse { ref path, .. } if path == file.path()));
    }
}
