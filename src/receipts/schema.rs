use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptKind {
    Upload,
    Analysis,
}

impl ReceiptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Analysis => "analysis",
        }
    }
}

impl fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceiptKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "analysis" => Ok(Self::Analysis),
            other => Err(format!("unknown receipt kind: {other}")),
        }
    }
}

/// What the client remembers about one upload or plagiarism check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub kind: ReceiptKind,
    pub title: String,
    pub author: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    /// SHA-256 (hex) of the bytes that were submitted.
    pub local_sha256: Option<String>,
    /// `empreinte_hash` returned by the registration endpoint.
    pub fingerprint: Option<String>,
    /// `analyse_id` returned by the plagiarism endpoint.
    pub remote_id: Option<String>,
    /// Resolved certificate or report URL.
    pub artifact_url: String,
    /// Similarity percentage of an analysis.
    pub similarity: Option<f64>,
    pub created_at: String,
}

impl Receipt {
    /// Whether the server fingerprint is the SHA-256 of what was sent.
    ///
    /// `None` when either side is unknown. The fingerprint format is up to the
    /// backend, so `Some(false)` is informative, not an error.
    pub fn fingerprint_matches_local(&self) -> Option<bool> {
        let remote = self.fingerprint.as_deref()?;
        let local = self.local_sha256.as_deref()?;
        Some(remote.trim().eq_ignore_ascii_case(local))
    }
}

/// Paginated list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptListResponse {
    pub receipts: Vec<Receipt>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}
