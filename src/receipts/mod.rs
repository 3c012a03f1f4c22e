//! Local receipts: a ledger of what this machine registered or checked,
//! downloaded certificates/reports on disk, and file-type detection for
//! multipart uploads.

pub mod extract;
pub mod index;
pub mod schema;
pub mod storage;

pub use extract::{guess_mime_type, load_attachment};
pub use index::ReceiptIndex;
pub use schema::{Receipt, ReceiptKind, ReceiptListResponse};
pub use storage::ArtifactStore;

use sha2::{Digest, Sha256};

use crate::api::{Attachment, PlagiarismInput};

/// Longest title derived from pasted text.
const TEXT_TITLE_CHARS: usize = 60;

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Digest of what is about to be sent, taken before the request consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub sha256: String,
}

impl Submission {
    pub fn of_attachment(attachment: &Attachment) -> Self {
        Self {
            title: attachment.file_name.clone(),
            file_name: Some(attachment.file_name.clone()),
            mime_type: Some(attachment.mime_type.clone()),
            sha256: sha256_hex(&attachment.data),
        }
    }

    pub fn of_input(input: &PlagiarismInput) -> Self {
        match input {
            PlagiarismInput::File(attachment) => Self::of_attachment(attachment),
            PlagiarismInput::Text(text) => {
                let first_line = text.trim().lines().next().unwrap_or_default();
                let mut title: String = first_line.chars().take(TEXT_TITLE_CHARS).collect();
                if first_line.chars().count() > TEXT_TITLE_CHARS {
                    title.push('…');
                }
                Self {
                    title,
                    file_name: None,
                    mime_type: None,
                    sha256: sha256_hex(text.as_bytes()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn text_submission_title_is_truncated_first_line() {
        let long = "x".repeat(80);
        let s = Submission::of_input(&PlagiarismInput::Text(format!("  {long}\nsuite")));
        assert_eq!(s.title.chars().count(), TEXT_TITLE_CHARS + 1);
        assert!(s.title.ends_with('…'));
        assert!(s.file_name.is_none());

        let short = Submission::of_input(&PlagiarismInput::Text("Poème\nligne 2".into()));
        assert_eq!(short.title, "Poème");
    }
}
