use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;
use wallet_integration::{AppMetadata, Network, WalletKitConfig};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub project_id: String,
    pub site_url: String,
    pub networks: Vec<String>,
    pub log_filter: String,
    pub connect_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_id: "5acef91d7967e48a748a4a68f1cb790c".into(),
            site_url: "http://localhost:3000".into(),
            networks: vec!["eip155:1".into()],
            log_filter: "info".into(),
            connect_timeout_secs: 10,
        }
    }
}

/// Defaults, then `path` (if it exists), then environment overrides.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(path) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

impl Settings {
    /// Applies keys from a `site.toml` body. Unknown keys and a file that
    /// fails to parse are ignored.
    pub fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<toml::Table>(raw) else {
            return;
        };
        if let Some(v) = file_cfg.get("project_id").and_then(|v| v.as_str()) {
            self.project_id = v.to_string();
        }
        if let Some(v) = file_cfg.get("site_url").and_then(|v| v.as_str()) {
            self.site_url = v.to_string();
        }
        if let Some(v) = file_cfg.get("log_filter").and_then(|v| v.as_str()) {
            self.log_filter = v.to_string();
        }
        if let Some(v) = file_cfg
            .get("connect_timeout_secs")
            .and_then(|v| v.as_integer())
            .and_then(|v| u64::try_from(v).ok())
        {
            self.connect_timeout_secs = v;
        }
        if let Some(v) = file_cfg.get("networks").and_then(|v| v.as_array()) {
            self.networks = v
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect();
        }
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("REOWN_PROJECT_ID") {
            self.project_id = v;
        }
        if let Some(v) = lookup("APP__PROJECT_ID") {
            self.project_id = v;
        }

        if let Some(v) = lookup("APP__SITE_URL") {
            self.site_url = v;
        }

        if let Some(v) = lookup("APP__NETWORKS") {
            self.networks = v
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(v) = lookup("APP__LOG_FILTER") {
            self.log_filter = v;
        }

        if let Some(v) = lookup("APP__CONNECT_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.connect_timeout_secs = parsed;
            }
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn wallet_kit_config(&self) -> Result<WalletKitConfig> {
        let url = Url::parse(&self.site_url)
            .with_context(|| format!("invalid site_url '{}'", self.site_url))?;
        let icons = vec![url.join("/favicon.ico").context("invalid icon url")?];
        let networks = self
            .networks
            .iter()
            .map(|raw| raw.parse::<Network>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WalletKitConfig {
            project_id: self.project_id.clone(),
            networks,
            metadata: AppMetadata {
                name: "FTTY".into(),
                description: "FTTY Token Website".into(),
                url,
                icons,
            },
        })
    }
}
