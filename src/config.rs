//! Application configuration management.
//!
//! The API base URL and asset host come from the environment (with a local
//! development default); the small persisted configuration (last used email)
//! is stored at `~/.config/hireflow/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "hireflow";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
const API_URL_ENV: &str = "HIREFLOW_API_URL";

/// Environment variable naming the host that serves uploaded assets
const ASSET_HOST_ENV: &str = "HIREFLOW_ASSET_HOST";

/// Local development backend
const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

/// API base URL from the environment, falling back to the local backend.
/// A trailing slash is tolerated and stripped.
pub fn api_base_url() -> String {
    let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    url.trim_end_matches('/').to_string()
}

/// Optional host serving uploaded assets (resumes, company logos).
pub fn asset_host() -> Option<String> {
    std::env::var(ASSET_HOST_ENV).ok().filter(|h| !h.is_empty())
}

/// Resolve an asset path returned by the API against the asset host.
/// Absolute URLs are passed through unchanged.
pub fn asset_url(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    match asset_host() {
        Some(host) => format!(
            "{}/{}",
            host.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_asset_urls_pass_through() {
        let url = "https://cdn.example.com/logos/acme.png";
        assert_eq!(asset_url(url), url);
    }
}
