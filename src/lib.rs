//! Client for the OeuvreGuard creative-works registration and plagiarism-check
//! service.
//!
//! The backend does the real work (fingerprinting, certificates, similarity
//! scoring, authentication). This crate holds the contract it must satisfy
//! ([`api`]), the session lifecycle ([`session`]), and the presentation logic
//! the client derives from responses ([`risk`], [`listing`], [`users`]).

pub mod api;
pub mod config;
pub mod listing;
pub mod receipts;
pub mod risk;
pub mod session;
pub mod users;

pub use api::{ApiClient, ApiError, OeuvreApi};
pub use config::Config;
pub use risk::{classify, RiskLevel};
pub use session::{Session, SessionContext, SessionStore};
