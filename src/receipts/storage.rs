use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Downloaded certificates and reports, organized by date.
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(base_dir: &str) -> Self {
        let expanded = shellexpand::tilde(base_dir).to_string();
        Self {
            base_dir: PathBuf::from(expanded),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Store artifact bytes, returns (relative_path, absolute_path).
    ///
    /// The extension is taken from `locator` (a URL or path), `pdf` by default.
    pub async fn store(&self, locator: &str, data: &[u8]) -> Result<(String, PathBuf)> {
        let now = Local::now();
        let date_dir = now.format("%Y/%m/%d").to_string();
        let abs_dir = self.base_dir.join(&date_dir);
        fs::create_dir_all(&abs_dir)
            .await
            .context("Failed to create date directory")?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), extension_of(locator));
        let abs_path = abs_dir.join(&stored_name);
        fs::write(&abs_path, data)
            .await
            .context("Failed to write artifact")?;

        let rel_path = format!("{date_dir}/{stored_name}");
        Ok((rel_path, abs_path))
    }
}

fn extension_of(locator: &str) -> String {
    let path = locator.split(['?', '#']).next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default();
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_lowercase)
        .unwrap_or_else(|| "pdf".to_string())
}
