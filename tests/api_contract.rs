//! HTTP contract tests for ApiClient using wiremock

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oeuvreguard::api::{
    ApiClient, ApiError, Attachment, Credentials, NewUser, OeuvreApi, PlagiarismInput, UploadForm,
    User,
};
use oeuvreguard::risk::{classify, RiskLevel};
use oeuvreguard::users::UserDirectory;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn upload_form() -> UploadForm {
    UploadForm {
        titre: "Wend Kuuni".into(),
        auteur: "Awa Ouédraogo".into(),
        genre: "texte".into(),
        langue: "fr".into(),
        fichier: Attachment {
            file_name: "wend-kuuni.txt".into(),
            mime_type: "text/plain".into(),
            data: b"Il etait une fois".to_vec(),
        },
    }
}

#[tokio::test]
async fn test_upload_resolves_relative_certificate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"titre\""))
        .and(body_string_contains("Wend Kuuni"))
        .and(body_string_contains("name=\"fichier\"; filename=\"wend-kuuni.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "oeuvre": "Wend Kuuni",
            "empreinte_hash": "9f2c",
            "certificat_url": "/certificats/TXT-2024-0012.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let result = api.upload_work(upload_form()).await.unwrap();
    assert_eq!(result.empreinte_hash, "9f2c");
    assert_eq!(
        api.artifact_url(&result.certificat_url),
        format!("{}/certificats/TXT-2024-0012.pdf", server.uri())
    );
}

#[tokio::test]
async fn test_upload_keeps_absolute_certificate() {
    let server = MockServer::start().await;
    let absolute = "https://cdn.oeuvreguard.bf/certificats/MUS-2024-0003.pdf";

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "oeuvre": "Laafi",
            "empreinte_hash": "abcd",
            "certificat_url": absolute
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let result = api.upload_work(upload_form()).await.unwrap();
    assert_eq!(api.artifact_url(&result.certificat_url), absolute);
}

#[tokio::test]
async fn test_upload_validation_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = upload_form();
    form.auteur = String::new();
    let err = client(&server).upload_work(form).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_upload_error_uses_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "detail": "Cette œuvre est déjà enregistrée" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).upload_work(upload_form()).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message(), "Cette œuvre est déjà enregistrée");
}

#[tokio::test]
async fn test_login_failure_detail_and_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "email": "awa@example.bf", "password": "faux" })))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Mot de passe incorrect" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "email": "awa@example.bf", "password": "vide" })))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let api = client(&server);
    let creds = |password: &str| Credentials {
        email: "awa@example.bf".into(),
        password: password.into(),
    };

    let err = api.login(&creds("faux")).await.unwrap_err();
    assert_eq!(err.user_message(), "Mot de passe incorrect");

    let err = api.login(&creds("vide")).await.unwrap_err();
    assert_eq!(err.user_message(), "Identifiants invalides");
}

#[tokio::test]
async fn test_login_accepts_token_alias() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt-123" })))
        .mount(&server)
        .await;

    let resp = client(&server)
        .login(&Credentials {
            email: "awa@example.bf".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();
    assert_eq!(resp.access_token.as_deref(), Some("jwt-123"));
    assert_eq!(resp.token_type, "bearer");
}

#[tokio::test]
async fn test_forgot_password_sends_email() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/forgot-password"))
        .and(body_json(json!({ "email": "awa@example.bf" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client(&server)
        .forgot_password("awa@example.bf")
        .await
        .unwrap();
    assert_eq!(resp.message.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_list_works_fallback_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oeuvres"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let err = client(&server).list_works().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "Erreur lors du chargement des œuvres");
}

#[tokio::test]
async fn test_list_works_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oeuvres"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "TXT-2024-0012",
                "titre": "Wend Kuuni",
                "auteur": "Awa Ouédraogo",
                "type_oeuvre": "Texte",
                "fichier_nom": "wend-kuuni.txt",
                "date_enregistrement": "2024-03-01"
            },
            {
                "id": "MUS-2024-0003",
                "titre": "Laafi",
                "auteur": "Moussa Kaboré",
                "type_oeuvre": "Musique",
                "genre": "musique",
                "langue": "moore",
                "fichier_nom": "laafi.mp3",
                "date_enregistrement": "2024-03-02"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let works = client(&server)
        .with_token("bearer", "jwt-123")
        .list_works()
        .await
        .unwrap();
    assert_eq!(works.len(), 2);
    assert_eq!(works[1].langue.as_deref(), Some("moore"));
    assert!(works[0].genre.is_none());
}

#[tokio::test]
async fn test_malformed_success_body_is_generic_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plagiats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_plagiarism_records().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(err.user_message(), "Une erreur est survenue");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = api.list_users().await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(err.user_message(), "Erreur lors du chargement des utilisateurs");
}

#[tokio::test]
async fn test_check_text_and_classify() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/plagiat"))
        .and(body_string_contains("name=\"texte\""))
        .and(body_string_contains("La savane au matin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analyse_id": "AN-7",
            "rapport_pdf": "/rapports/AN-7.pdf",
            "similarite": 42.5
        })))
        .mount(&server)
        .await;

    let api = client(&server);
    let result = api
        .check_plagiarism(PlagiarismInput::Text("La savane au matin".into()))
        .await
        .unwrap();
    assert_eq!(classify(result.similarite), RiskLevel::High);
    assert_eq!(
        api.artifact_url(&result.rapport_pdf),
        format!("{}/rapports/AN-7.pdf", server.uri())
    );
}

#[tokio::test]
async fn test_check_file_without_similarity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/plagiat"))
        .and(body_string_contains("name=\"fichier\"; filename=\"poeme.txt\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analyse_id": "AN-8",
            "rapport_pdf": "https://cdn.oeuvreguard.bf/rapports/AN-8.pdf"
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .check_plagiarism(PlagiarismInput::File(Attachment {
            file_name: "poeme.txt".into(),
            mime_type: "text/plain".into(),
            data: b"Sous le baobab".to_vec(),
        }))
        .await
        .unwrap();
    assert_eq!(classify(result.similarite), RiskLevel::Undetermined);
}

#[tokio::test]
async fn test_check_blank_text_is_rejected_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/plagiat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .check_plagiarism(PlagiarismInput::Text("   \n".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn test_download_artifact() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/certificats/TXT-2024-0012.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let bytes = client(&server)
        .download("/certificats/TXT-2024-0012.pdf")
        .await
        .unwrap();
    assert_eq!(bytes, b"%PDF-1.4");
}

#[tokio::test]
async fn test_user_directory_converges_with_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Awa", "email": "awa@example.bf", "role": "admin" },
            { "id": 2, "name": "Moussa", "email": "moussa@example.bf", "role": "auteur" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({ "name": "Fatim", "email": "fatim@example.bf", "role": "auteur" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 17, "name": "Fatim", "email": "fatim@example.bf", "role": "auteur"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Moussa K.", "email": "moussa@example.bf", "role": "admin"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let mut directory = UserDirectory::new(&api);
    directory.load().await.unwrap();

    let created = directory
        .create(NewUser {
            name: "Fatim".into(),
            email: "fatim@example.bf".into(),
            role: "auteur".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 17);

    let edit = User {
        id: 2,
        name: "Moussa K.".into(),
        email: "moussa@example.bf".into(),
        role: "admin".into(),
    };
    directory.update(&edit).await.unwrap();
    directory.remove(1).await.unwrap();

    let ids: Vec<i64> = directory.users().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![2, 17]);
    assert_eq!(directory.get(2).unwrap().role, "admin");
}

#[tokio::test]
async fn test_failed_delete_keeps_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Awa", "email": "awa@example.bf", "role": "admin" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "detail": null })))
        .mount(&server)
        .await;

    let api = client(&server);
    let mut directory = UserDirectory::new(&api);
    directory.load().await.unwrap();

    let err = directory.remove(1).await.unwrap_err();
    assert_eq!(err.user_message(), "Erreur lors de la suppression de l'utilisateur");
    assert_eq!(directory.users().len(), 1);
}
