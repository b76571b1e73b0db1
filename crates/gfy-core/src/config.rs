//! User configuration (`config.toml`) with environment overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_API_BASE;
use crate::guesswork::DEFAULT_VIDEO_SELECTOR;
use crate::http::SessionOptions;
use crate::strategy::{
    api_credentials, is_api_enabled, StrategyConfig, ENV_API_ENABLED, ENV_API_SECRET,
    ENV_API_TOKEN,
};

/// `[api]` section: authenticated API access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Use the API instead of page scraping. Requires `client_id` and `client_secret`.
    pub enabled: bool,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Base URL of the v1 API, ending in `/`.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            client_id: None,
            client_secret: None,
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// `[http]` section: applied to every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

/// `[scrape]` section: page scraping for the guesswork strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// CSS selector of the main video element whose `poster` names the item.
    pub video_selector: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            video_selector: DEFAULT_VIDEO_SELECTOR.to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/gfy/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GfyConfig {
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub scrape: ScrapeConfig,
}

impl GfyConfig {
    /// Overrides the `[api]` section from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_lookup(|key| std::env::var(key).ok());
    }

    /// Overrides the `[api]` section from `lookup`; unset variables keep file values.
    pub fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_API_ENABLED) {
            self.api.enabled = is_api_enabled(Some(&v));
        }
        if let Some(v) = lookup(ENV_API_TOKEN) {
            self.api.client_id = Some(v);
        }
        if let Some(v) = lookup(ENV_API_SECRET) {
            self.api.client_secret = Some(v);
        }
    }

    pub fn strategy_config(&self) -> StrategyConfig {
        StrategyConfig {
            api_enabled: self.api.enabled,
            credentials: api_credentials(self.api.client_id.clone(), self.api.client_secret.clone()),
            api_base: normalize_base(&self.api.base_url),
            video_selector: self.scrape.video_selector.clone(),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            timeout: Duration::from_secs(self.http.timeout_secs),
            user_agent: self.http.user_agent.clone(),
        }
    }
}

fn normalize_base(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gfy")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Loads `~/.config/gfy/config.toml`, writing the defaults on first run.
pub fn load_or_init() -> Result<GfyConfig> {
    load_or_init_at(&config_path()?)
}

/// Loads the config at `path`; a missing file is created with defaults.
pub fn load_or_init_at(path: &Path) -> Result<GfyConfig> {
    match fs::read_to_string(path) {
        Ok(data) => toml::from_str(&data).with_context(|| format!("parse {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let cfg = GfyConfig::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, toml::to_string_pretty(&cfg)?)
                .with_context(|| format!("write default config {}", path.display()))?;
            tracing::info!("created default config at {}", path.display());
            Ok(cfg)
        }
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Credentials;
    use std::collections::HashMap;

    #[test]
    fn default_config_values() {
        let cfg = GfyConfig::default();
        assert!(!cfg.api.enabled);
        assert_eq!(cfg.api.base_url, "https://api.gfycat.com/v1/");
        assert_eq!(cfg.http.connect_timeout_secs, 15);
        assert_eq!(cfg.http.timeout_secs, 30);
        assert_eq!(cfg.scrape.video_selector, "video.video.media");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = GfyConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GfyConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_partial_sections() {
        let toml = r#"
            [api]
            enabled = true
            client_id = "id"
            client_secret = "secret"
            base_url = "http://127.0.0.1:9000/v1"

            [scrape]
            video_selector = "video#main"
        "#;
        let cfg: GfyConfig = toml::from_str(toml).unwrap();
        assert!(cfg.api.enabled);
        assert_eq!(cfg.http, HttpConfig::default());

        let s = cfg.strategy_config();
        assert!(s.api_enabled);
        assert_eq!(s.credentials, Some(Credentials::new("id", "secret")));
        assert_eq!(s.api_base, "http://127.0.0.1:9000/v1/");
        assert_eq!(s.video_selector, "video#main");
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg: GfyConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, GfyConfig::default());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg: GfyConfig = toml::from_str(
            r#"
            [api]
            enabled = true
            client_id = "file-id"
            client_secret = "file-secret"
        "#,
        )
        .unwrap();
        let vars: HashMap<&str, &str> =
            [(ENV_API_ENABLED, "0"), (ENV_API_TOKEN, "env-id")].into_iter().collect();
        cfg.apply_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert!(!cfg.api.enabled);
        assert_eq!(cfg.api.client_id.as_deref(), Some("env-id"));
        assert_eq!(cfg.api.client_secret.as_deref(), Some("file-secret"));
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gfy").join("config.toml");

        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg, GfyConfig::default());
        assert!(path.exists());

        fs::write(&path, "[scrape]\nvideo_selector = \"video#player\"\n").unwrap();
        let cfg = load_or_init_at(&path).unwrap();
        assert_eq!(cfg.scrape.video_selector, "video#player");
        assert_eq!(cfg.api, ApiConfig::default());
    }

    #[test]
    fn load_invalid_toml_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[http]\ntimeout_secs = \"soon\"\n").unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }

    #[test]
    fn session_options_from_http_section() {
        let cfg: GfyConfig = toml::from_str(
            r#"
            [http]
            connect_timeout_secs = 5
            timeout_secs = 10
            user_agent = "gfy/0.1"
        "#,
        )
        .unwrap();
        let o = cfg.session_options();
        assert_eq!(o.connect_timeout, Duration::from_secs(5));
        assert_eq!(o.timeout, Duration::from_secs(10));
        assert_eq!(o.user_agent.as_deref(), Some("gfy/0.1"));
    }
}
