//! Plagiarism risk levels derived from a similarity percentage.
//!
//! Presentation only: the backend never sees these buckets.

use std::fmt;

use serde::Serialize;

/// Below this percentage a result is low risk.
pub const LOW_RISK_BELOW: f64 = 15.0;
/// At or above this percentage a result is high risk.
pub const HIGH_RISK_FROM: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Undetermined,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Undetermined => "Non déterminé",
            Self::Low => "Faible risque",
            Self::Moderate => "Risque modéré",
            Self::High => "Risque élevé",
        }
    }

    /// Badge color name.
    pub fn color(self) -> &'static str {
        match self {
            Self::Undetermined => "slate",
            Self::Low => "green",
            Self::Moderate => "amber",
            Self::High => "red",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket a similarity percentage (0-100).
///
/// A missing or NaN score is `Undetermined`; `0` is a real score and is `Low`.
pub fn classify(similarity: Option<f64>) -> RiskLevel {
    match similarity {
        None => RiskLevel::Undetermined,
        Some(s) if s.is_nan() => RiskLevel::Undetermined,
        Some(s) if s < LOW_RISK_BELOW => RiskLevel::Low,
        Some(s) if s < HIGH_RISK_FROM => RiskLevel::Moderate,
        Some(_) => RiskLevel::High,
    }
}
