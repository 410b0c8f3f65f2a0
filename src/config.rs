use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rpc::ops::DEFAULT_BUILD_LABEL;
use crate::rpc::{TransportTimeouts, WireSettings};

pub const DEFAULT_BASE_URL: &str = "https://notebooklm.google.com";
pub const CONFIG_FILE: &str = "config.toml";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_build_label() -> String {
    DEFAULT_BUILD_LABEL.to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_rpc_timeout() -> u64 {
    30
}

fn default_page_timeout() -> u64 {
    15
}

fn default_research_interval() -> u64 {
    30
}

fn default_research_max_wait() -> u64 {
    300
}

/// Runtime configuration.
/// Loaded from `{data_path}/config.toml`, then overridden by `NBLM_*` env vars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NblmConfig {
    /// Service origin (default: `https://notebooklm.google.com`)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Frontend build label sent as `bl` on every request
    #[serde(default = "default_build_label")]
    pub build_label: String,
    /// Interface language sent as `hl`
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout_secs: u64,
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,
    /// Default seconds between research polls
    #[serde(default = "default_research_interval")]
    pub research_poll_interval_secs: u64,
    /// Default research wait budget in seconds
    #[serde(default = "default_research_max_wait")]
    pub research_max_wait_secs: u64,
}

impl Default for NblmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            build_label: default_build_label(),
            locale: default_locale(),
            rpc_timeout_secs: default_rpc_timeout(),
            page_timeout_secs: default_page_timeout(),
            research_poll_interval_secs: default_research_interval(),
            research_max_wait_secs: default_research_max_wait(),
        }
    }
}

impl NblmConfig {
    pub fn wire_settings(&self) -> WireSettings {
        WireSettings {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            build_label: self.build_label.clone(),
            locale: self.locale.clone(),
        }
    }

    pub fn timeouts(&self) -> TransportTimeouts {
        TransportTimeouts {
            rpc: Duration::from_secs(self.rpc_timeout_secs),
            page: Duration::from_secs(self.page_timeout_secs),
        }
    }

    /// Apply `NBLM_BASE_URL`, `NBLM_BUILD_LABEL` and `NBLM_LOCALE` through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("NBLM_BASE_URL") {
            self.base_url = url;
        }
        if let Some(label) = lookup("NBLM_BUILD_LABEL") {
            self.build_label = label;
        }
        if let Some(locale) = lookup("NBLM_LOCALE") {
            self.locale = locale;
        }
    }
}

fn read_config_file(config_path: &Path) -> Option<NblmConfig> {
    if !config_path.exists() {
        return None;
    }
    match std::fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<NblmConfig>(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", config_path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse {}: {}. Using defaults.",
                    config_path.display(),
                    e
                );
                None
            }
        },
        Err(e) => {
            tracing::warn!(
                "Failed to read {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Load config with priority:
/// 1. `NBLM_*` env vars
/// 2. `{data_path}/config.toml`
/// 3. Defaults
pub fn load_config(data_path: &Path) -> NblmConfig {
    load_config_with(data_path, |key| std::env::var(key).ok())
}

pub(crate) fn load_config_with(
    data_path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> NblmConfig {
    let mut config = read_config_file(&data_path.join(CONFIG_FILE)).unwrap_or_default();
    config.apply_overrides(lookup);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_config_with(dir.path(), no_env), NblmConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "locale = \"de\"\nresearch_max_wait_secs = 600\n",
        )
        .unwrap();

        let config = load_config_with(dir.path(), no_env);
        assert_eq!(config.locale, "de");
        assert_eq!(config.research_max_wait_secs, 600);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.rpc_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "locale = [").unwrap();
        assert_eq!(load_config_with(dir.path(), no_env), NblmConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "locale = \"de\"\n").unwrap();

        let config = load_config_with(dir.path(), |key| match key {
            "NBLM_LOCALE" => Some("fr".into()),
            "NBLM_BASE_URL" => Some("http://127.0.0.1:9000/".into()),
            _ => None,
        });
        assert_eq!(config.locale, "fr");
        assert_eq!(config.wire_settings().base_url, "http://127.0.0.1:9000");
    }
}
