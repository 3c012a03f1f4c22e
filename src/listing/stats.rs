use std::collections::BTreeMap;

use serde::Serialize;

use crate::api::{PlagiarismRecord, Work};

/// Headline counts of the works dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl WorkStats {
    pub fn count(&self, type_oeuvre: &str) -> usize {
        self.by_type.get(type_oeuvre).copied().unwrap_or(0)
    }
}

pub fn work_stats(works: &[Work]) -> WorkStats {
    let mut by_type = BTreeMap::new();
    for w in works {
        *by_type.entry(w.type_oeuvre.clone()).or_insert(0) += 1;
    }
    WorkStats {
        total: works.len(),
        by_type,
    }
}

/// Unique non-blank authors, in first-seen order.
pub fn distinct_authors(records: &[PlagiarismRecord]) -> Vec<&str> {
    let mut seen = Vec::new();
    for author in records.iter().filter_map(|r| r.auteur.as_deref()) {
        if !author.trim().is_empty() && !seen.contains(&author) {
            seen.push(author);
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    pub range: &'static str,
    pub count: usize,
}

/// Distribution of AI scores (unit fractions) over three buckets.
///
/// Records without a score, or with a score of exactly zero, are left out.
pub fn ai_score_histogram(records: &[PlagiarismRecord]) -> [HistogramBucket; 3] {
    let mut counts = [0usize; 3];
    for score in records.iter().filter_map(|r| r.score_ia) {
        if score == 0.0 || score.is_nan() {
            continue;
        }
        let idx = if score < 0.3 {
            0
        } else if score < 0.6 {
            1
        } else {
            2
        };
        counts[idx] += 1;
    }
    [
        HistogramBucket {
            range: "0 - 0.3",
            count: counts[0],
        },
        HistogramBucket {
            range: "0.3 - 0.6",
            count: counts[1],
        },
        HistogramBucket {
            range: "0.6 - 1.0",
            count: counts[2],
        },
    ]
}
