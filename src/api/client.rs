//! reqwest implementation of the OeuvreGuard API contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::error::{error_message, ApiError};
use super::types::{
    AnalysisResult, Attachment, Credentials, LoginResponse, NewUser, PlagiarismInput,
    PlagiarismRecord, ResetRequest, ResetResponse, UploadForm, UploadResult, User, Work,
};
use super::{resolve_locator, Endpoint, OeuvreApi};

const DOWNLOAD_FAILED: &str = "Impossible de télécharger le document";

/// HTTP client for the OeuvreGuard backend.
///
/// One request per call, no retry: every failure is terminal for the
/// operation that triggered it.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    authorization: Option<String>,
}

impl ApiClient {
    /// `base_url` should be like `http://127.0.0.1:8000` (a trailing slash is trimmed).
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("oeuvreguard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: None,
        })
    }

    /// Send `Authorization: <type> <token>` on every request.
    pub fn with_token(mut self, token_type: &str, token: &str) -> Self {
        let scheme = if token_type.is_empty() || token_type.eq_ignore_ascii_case("bearer") {
            "Bearer"
        } else {
            token_type
        };
        self.authorization = Some(format!("{scheme} {token}"));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    /// Fetchable URL for a certificate or report locator returned by the API.
    pub fn artifact_url(&self, locator: &str) -> String {
        resolve_locator(&self.base_url, locator)
    }

    /// Download a certificate or report.
    pub async fn download(&self, locator: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.artifact_url(locator);
        info!(url = %url, "downloading artifact");
        let resp = self.dispatch(DOWNLOAD_FAILED, self.client.get(&url)).await?;
        let bytes = resp.bytes().await.map_err(|source| ApiError::Network {
            message: DOWNLOAD_FAILED.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch(
        &self,
        fallback: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let request = match &self.authorization {
            Some(value) => request.header(reqwest::header::AUTHORIZATION, value),
            None => request,
        };

        let resp = request.send().await.map_err(|source| ApiError::Network {
            message: fallback.to_string(),
            source,
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "error response");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body, fallback),
            });
        }
        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.dispatch(endpoint.fallback_message(), request).await?;
        let bytes = resp.bytes().await.map_err(|source| ApiError::Network {
            message: endpoint.fallback_message().to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Local checks the registration form enforces before submitting.
pub fn validate_upload(form: &UploadForm) -> Result<(), ApiError> {
    let required = [
        ("titre", &form.titre),
        ("auteur", &form.auteur),
        ("genre", &form.genre),
        ("langue", &form.langue),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::Validation(format!("Le champ « {field} » est requis")));
        }
    }
    if form.fichier.file_name.trim().is_empty() {
        return Err(ApiError::Validation("Un fichier est requis".to_string()));
    }
    Ok(())
}

fn file_part(attachment: Attachment) -> Result<Part, ApiError> {
    Part::bytes(attachment.data)
        .file_name(attachment.file_name)
        .mime_str(&attachment.mime_type)
        .map_err(|e| ApiError::Validation(format!("Type de fichier invalide: {e}")))
}

#[async_trait]
impl OeuvreApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.url("/login");
        info!(url = %url, email = %credentials.email, "logging in");
        self.send_json(Endpoint::Login, self.client.post(&url).json(credentials))
            .await
    }

    async fn forgot_password(&self, email: &str) -> Result<ResetResponse, ApiError> {
        let url = self.url("/forgot-password");
        info!(url = %url, "requesting password reset");
        let payload = ResetRequest {
            email: email.to_string(),
        };
        self.send_json(Endpoint::ForgotPassword, self.client.post(&url).json(&payload))
            .await
    }

    async fn upload_work(&self, form: UploadForm) -> Result<UploadResult, ApiError> {
        validate_upload(&form)?;
        let url = self.url("/upload");
        info!(
            url = %url,
            titre = %form.titre,
            fichier = %form.fichier.file_name,
            size = form.fichier.data.len(),
            "uploading work"
        );
        let multipart = Form::new()
            .text("titre", form.titre)
            .text("auteur", form.auteur)
            .text("genre", form.genre)
            .text("langue", form.langue)
            .part("fichier", file_part(form.fichier)?);
        let result: UploadResult = self
            .send_json(Endpoint::Upload, self.client.post(&url).multipart(multipart))
            .await?;
        info!(empreinte = %result.empreinte_hash, "work registered");
        Ok(result)
    }

    async fn list_works(&self) -> Result<Vec<Work>, ApiError> {
        let url = self.url("/oeuvres");
        let works: Vec<Work> = self
            .send_json(Endpoint::ListWorks, self.client.get(&url))
            .await?;
        info!(count = works.len(), "fetched works");
        Ok(works)
    }

    async fn check_plagiarism(&self, input: PlagiarismInput) -> Result<AnalysisResult, ApiError> {
        let url = self.url("/plagiat");
        let multipart = match input {
            PlagiarismInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(ApiError::Validation(
                        "Veuillez saisir un texte à vérifier".to_string(),
                    ));
                }
                info!(url = %url, chars = text.chars().count(), "checking text");
                Form::new().text("texte", text)
            }
            PlagiarismInput::File(attachment) => {
                info!(url = %url, fichier = %attachment.file_name, "checking file");
                Form::new().part("fichier", file_part(attachment)?)
            }
        };
        let result: AnalysisResult = self
            .send_json(
                Endpoint::CheckPlagiarism,
                self.client.post(&url).multipart(multipart),
            )
            .await?;
        info!(analyse_id = %result.analyse_id, similarite = ?result.similarite, "analysis complete");
        Ok(result)
    }

    async fn list_plagiarism_records(&self) -> Result<Vec<PlagiarismRecord>, ApiError> {
        let url = self.url("/plagiats");
        let records: Vec<PlagiarismRecord> = self
            .send_json(Endpoint::ListPlagiarism, self.client.get(&url))
            .await?;
        info!(count = records.len(), "fetched plagiarism records");
        Ok(records)
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.url("/users");
        let users: Vec<User> = self
            .send_json(Endpoint::ListUsers, self.client.get(&url))
            .await?;
        info!(count = users.len(), "fetched users");
        Ok(users)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let url = self.url("/users");
        info!(url = %url, email = %user.email, "creating user");
        self.send_json(Endpoint::CreateUser, self.client.post(&url).json(user))
            .await
    }

    async fn update_user(&self, user: &User) -> Result<User, ApiError> {
        let url = self.url(&format!("/users/{}", user.id));
        info!(url = %url, "updating user");
        self.send_json(Endpoint::UpdateUser, self.client.put(&url).json(user))
            .await
    }

    async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/{id}"));
        info!(url = %url, "deleting user");
        self.dispatch(
            Endpoint::DeleteUser.fallback_message(),
            self.client.delete(&url),
        )
        .await?;
        Ok(())
    }
}
