use thiserror::Error;

/// Generic message shown when nothing more specific is known.
pub const GENERIC_ERROR: &str = "Une erreur est survenue";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response. `message` is the body's `detail` or the endpoint fallback.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("{message}: {source}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// Rejected locally before anything was sent.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Human-readable message, as a user should see it.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Status { message, .. } | Self::Network { message, .. } => message,
            Self::Decode(_) => GENERIC_ERROR,
            Self::Validation(msg) => msg,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pick the message to surface for an error body: a non-empty string `detail`
/// when the body is JSON and carries one, the endpoint fallback otherwise.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(|d| d.as_str())
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| fallback.to_string())
}
