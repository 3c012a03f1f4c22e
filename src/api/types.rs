use serde::{Deserialize, Serialize};

/// A registered creative work (œuvre) as listed by `GET /oeuvres`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    /// Category-year-sequence style identifier, e.g. `TXT-2024-0012`.
    pub id: String,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub auteur: String,
    /// Category of the work ("Musique", "Texte", ...).
    #[serde(default)]
    pub type_oeuvre: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub langue: Option<String>,
    #[serde(default)]
    pub fichier_nom: String,
    #[serde(default)]
    pub date_enregistrement: String,
    #[serde(default)]
    pub ia_detectee: Option<String>,
    /// AI likelihood, unit fraction in `[0, 1]`.
    #[serde(default)]
    pub score_ia: Option<f64>,
    /// Similarity percentage in `[0, 100]`.
    #[serde(default)]
    pub similarite: Option<f64>,
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Work title echoed back by the server.
    pub oeuvre: String,
    /// Content fingerprint. Format is backend-defined.
    pub empreinte_hash: String,
    /// Absolute URL or server-relative path of the certificate.
    pub certificat_url: String,
}

/// Response of `POST /plagiat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analyse_id: String,
    /// Absolute URL or server-relative path of the report.
    pub rapport_pdf: String,
    /// Similarity percentage in `[0, 100]`.
    #[serde(default)]
    pub similarite: Option<f64>,
}

/// A prior plagiarism / AI-detection run as listed by `GET /plagiats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismRecord {
    pub id: String,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub auteur: Option<String>,
    #[serde(default)]
    pub ia_detectee: Option<String>,
    /// AI likelihood, unit fraction in `[0, 1]`. Not the same scale as
    /// [`AnalysisResult::similarite`].
    #[serde(default)]
    pub score_ia: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A user before the backend has assigned an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Response of `POST /login`. Backends answer with either `access_token` or `token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Fields of the registration form. Every text field is required.
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub titre: String,
    pub auteur: String,
    pub genre: String,
    pub langue: String,
    pub fichier: Attachment,
}

/// Genre choices offered by the registration form.
pub const GENRES: &[&str] = &["texte", "musique", "art", "video", "logiciel", "autre"];

/// Language choices offered by the registration form.
pub const LANGUES: &[&str] = &["fr", "en", "moore", "dioula", "fulfulde", "autre"];

/// What to submit for a plagiarism check: pasted text or a file, never both.
#[derive(Debug, Clone)]
pub enum PlagiarismInput {
    Text(String),
    File(Attachment),
}
