use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use directories::ProjectDirs;
use std::env;

const DEFAULT_REPORT_FIELD: &str = "count";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReportConfig {
    pub url: Option<String>,
    pub field: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Try to load from file first
        let mut config = if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                let config_str = std::fs::read_to_string(&config_path)
                    .context("Failed to read config file")?;

                let config: Config = serde_yaml::from_str(&config_str)
                    .context("Failed to parse config file")?;

                config
            } else {
                Config::default()
            }
        } else {
            Config::default()
        };

        // Check environment variables and override config if they exist
        if let Ok(url) = env::var("KEYTALLY_REPORT_URL") {
            config.report.url = Some(url);
        }

        if let Ok(field) = env::var("KEYTALLY_REPORT_FIELD") {
            config.report.field = Some(field);
        }

        if let Ok(dir) = env::var("KEYTALLY_DATA_DIR") {
            config.storage.data_dir = Some(dir);
        }

        log::debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "keytally", "keytally")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_dir(&self) -> Option<&str> {
        self.storage.data_dir.as_deref()
    }

    /// The remote endpoint; empty when reporting is unconfigured.
    pub fn report_url(&self) -> &str {
        self.report.url.as_deref().unwrap_or("")
    }

    pub fn report_field(&self) -> &str {
        self.report.field.as_deref().unwrap_or(DEFAULT_REPORT_FIELD)
    }

    pub fn has_report_config(&self) -> bool {
        !self.report_url().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_reporting_unconfigured() {
        let config = Config::default();

        assert_eq!(config.report_url(), "");
        assert_eq!(config.report_field(), "count");
        assert!(!config.has_report_config());
        assert!(config.data_dir().is_none());
    }

    #[test]
    fn parses_a_full_config_file() {
        let yaml = r#"
storage:
  data_dir: /tmp/keytally
report:
  url: https://example.com/submit
  field: keystrokes
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.data_dir(), Some("/tmp/keytally"));
        assert_eq!(config.report_url(), "https://example.com/submit");
        assert_eq!(config.report_field(), "keystrokes");
        assert!(config.has_report_config());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let yaml = r#"
report:
  url: https://example.com/submit
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.report_field(), "count");
        assert!(config.data_dir().is_none());
        assert!(config.has_report_config());
    }
}
