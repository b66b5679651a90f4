use crate::RenderOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Client settings, read from `insightboard.toml`.
///
/// ```toml
/// endpoint = "http://analysis.internal:8000"
/// timeout_seconds = 120
///
/// [render]
/// width = 800
/// height = 360
/// type = "svg"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub render: RenderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 120,
            render: RenderOptions::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", config_path.display()))?;
        Ok(config)
    }

    pub fn default_config_path() -> PathBuf {
        PathBuf::from("insightboard.toml")
    }

    /// An explicit path must load; the default path is optional
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::load_from_file(&path)
                } else {
                    tracing::debug!("no {} found, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.render.format, OutputFormat::Png);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://example.test:9000\"\n[render]\ntype = \"svg\"").unwrap();
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://example.test:9000");
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.render.format, OutputFormat::Svg);
        assert_eq!(config.render.width, RenderOptions::default().width);
    }

    #[test]
    fn test_bad_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_seconds = \"soon\"").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }

    #[test]
    fn test_endpoint_override() {
        let config = Config::default().with_endpoint(Some("http://other:1".into()));
        assert_eq!(config.endpoint, "http://other:1");
        let config = config.with_endpoint(None);
        assert_eq!(config.endpoint, "http://other:1");
    }
}
