//! Board Configuration
//!
//! Loaded from a JSON file; every field has a default so a missing or
//! partial file still gives a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

const DEFAULT_PORT: &str = "3000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Base URL of the API server; derived from the environment when unset
    pub api_url: Option<String>,
    /// Local SQLite database
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    /// Log file prefix
    pub app_name: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            db_path: PathBuf::from("issue_board.db"),
            log_dir: PathBuf::from("logs"),
            app_name: "IssueBoard".to_string(),
        }
    }
}

impl BoardConfig {
    /// Read a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Internal(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| DomainError::InvalidInput(format!("Bad config {}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> DomainResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| DomainError::Internal(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// API base URL: explicit setting, else the deployment host, else localhost
    pub fn resolve_base_url(&self) -> String {
        self.base_url_from(|key| std::env::var(key).ok())
    }

    fn base_url_from(&self, env: impl Fn(&str) -> Option<String>) -> String {
        if let Some(url) = self.api_url.as_deref().filter(|url| !url.is_empty()) {
            return url.trim_end_matches('/').to_string();
        }
        if let Some(host) = env("VERCEL_URL").filter(|host| !host.is_empty()) {
            return format!("https://{}", host);
        }
        let port = env("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
        format!("http://localhost:{}", port)
    }

    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.resolve_base_url())
    }
}
