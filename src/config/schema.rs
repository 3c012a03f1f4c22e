use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::listing::{
    PLAGIARISM_PAGE_SIZE, RECEIPTS_PAGE_SIZE, USERS_PAGE_SIZE, WORKS_PAGE_SIZE,
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Top-level `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub listing: ListingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL, without trailing slash.
    pub base_url: String,
    /// Per-request timeout. Requests are never retried.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SessionConfig {
    /// Forget the login token after this many hours. Unset: keep until logout.
    pub ttl_hours: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ListingConfig {
    pub works_page_size: usize,
    pub users_page_size: usize,
    pub plagiarism_page_size: usize,
    /// Local receipts ledger.
    pub receipts_page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            works_page_size: WORKS_PAGE_SIZE,
            users_page_size: USERS_PAGE_SIZE,
            plagiarism_page_size: PLAGIARISM_PAGE_SIZE,
            receipts_page_size: RECEIPTS_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StorageConfig {
    /// Session and receipts ledger. `~` is expanded. Defaults to the platform data dir.
    pub data_dir: Option<String>,
    /// Downloaded certificates and reports. Defaults to `<data_dir>/artifacts`.
    pub artifacts_dir: Option<String>,
}
