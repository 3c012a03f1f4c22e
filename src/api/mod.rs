//! OeuvreGuard HTTP API: wire types, error taxonomy, and the reqwest client.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    AnalysisResult, Attachment, Credentials, LoginResponse, NewUser, PlagiarismInput,
    PlagiarismRecord, ResetResponse, UploadForm, UploadResult, User, Work,
};

use async_trait::async_trait;

/// Every call the client makes against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    ForgotPassword,
    Upload,
    ListWorks,
    CheckPlagiarism,
    ListPlagiarism,
    ListUsers,
    CreateUser,
    UpdateUser,
    DeleteUser,
}

impl Endpoint {
    /// Message surfaced when a failed response carries no `detail`.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Identifiants invalides",
            Self::ForgotPassword => "Impossible d'envoyer le lien de réinitialisation",
            Self::Upload => "Erreur lors de l'upload",
            Self::ListWorks => "Erreur lors du chargement des œuvres",
            Self::CheckPlagiarism => "Erreur lors de l'analyse",
            Self::ListPlagiarism => "Erreur lors du chargement des plagiats",
            Self::ListUsers => "Erreur lors du chargement des utilisateurs",
            Self::CreateUser => "Erreur lors de l'ajout de l'utilisateur",
            Self::UpdateUser => "Erreur lors de la mise à jour de l'utilisateur",
            Self::DeleteUser => "Erreur lors de la suppression de l'utilisateur",
        }
    }
}

/// The backend contract. [`ApiClient`] is the HTTP implementation; tests and
/// [`crate::users::UserDirectory`] work against any implementor.
#[async_trait]
pub trait OeuvreApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    async fn forgot_password(&self, email: &str) -> Result<ResetResponse, ApiError>;
    async fn upload_work(&self, form: UploadForm) -> Result<UploadResult, ApiError>;
    async fn list_works(&self) -> Result<Vec<Work>, ApiError>;
    async fn check_plagiarism(&self, input: PlagiarismInput) -> Result<AnalysisResult, ApiError>;
    async fn list_plagiarism_records(&self) -> Result<Vec<PlagiarismRecord>, ApiError>;
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;
    async fn update_user(&self, user: &User) -> Result<User, ApiError>;
    async fn delete_user(&self, id: i64) -> Result<(), ApiError>;
}

/// Turn a certificate or report locator into a fetchable URL.
///
/// Absolute locators (anything starting with `http`) pass through unchanged;
/// server-relative paths are prefixed with the API base URL.
pub fn resolve_locator(base_url: &str, locator: &str) -> String {
    if locator.starts_with("http") {
        return locator.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if locator.starts_with('/') {
        format!("{base}{locator}")
    } else {
        format!("{base}/{locator}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_locator_passes_through() {
        let url = "https://cdn.oeuvreguard.bf/certificats/TXT-2024-0012.pdf";
        assert_eq!(resolve_locator("http://127.0.0.1:8000", url), url);
    }

    #[test]
    fn relative_locator_gets_base_prefix() {
        assert_eq!(
            resolve_locator("http://127.0.0.1:8000", "/certificats/abc.pdf"),
            "http://127.0.0.1:8000/certificats/abc.pdf"
        );
        assert_eq!(
            resolve_locator("http://127.0.0.1:8000/", "rapports/AN-7.pdf"),
            "http://127.0.0.1:8000/rapports/AN-7.pdf"
        );
    }

    #[test]
    fn every_endpoint_has_a_french_fallback() {
        let all = [
            Endpoint::Login,
            Endpoint::ForgotPassword,
            Endpoint::Upload,
            Endpoint::ListWorks,
            Endpoint::CheckPlagiarism,
            Endpoint::ListPlagiarism,
            Endpoint::ListUsers,
            Endpoint::CreateUser,
            Endpoint::UpdateUser,
            Endpoint::DeleteUser,
        ];
        for endpoint in all {
            assert!(!endpoint.fallback_message().is_empty(), "{endpoint:?}");
        }
        assert_eq!(Endpoint::Upload.fallback_message(), "Erreur lors de l'upload");
    }
}
