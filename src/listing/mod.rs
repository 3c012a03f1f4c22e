//! Client-side search, filtering, pagination and dashboard statistics.
//!
//! The backend returns whole collections; everything here is a pure
//! function of (collection, search term, filter value).

pub mod filter;
pub mod pagination;
pub mod stats;

pub use filter::{filter_plagiarism_records, filter_users, filter_works};
pub use pagination::Paginator;
pub use stats::{ai_score_histogram, distinct_authors, work_stats, HistogramBucket, WorkStats};

pub const WORKS_PAGE_SIZE: usize = 5;
pub const USERS_PAGE_SIZE: usize = 5;
pub const PLAGIARISM_PAGE_SIZE: usize = 8;
pub const RECEIPTS_PAGE_SIZE: usize = 10;
