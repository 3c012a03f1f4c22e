use super::schema::{Receipt, ReceiptKind, ReceiptListResponse};
use super::Submission;
use crate::api::{AnalysisResult, UploadResult};
use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

const COLUMNS: &str = "id, kind, title, author, file_name, mime_type, local_sha256,
     fingerprint, remote_id, artifact_url, similarity, created_at";

/// SQLite ledger of uploads and analyses made from this machine.
pub struct ReceiptIndex {
    conn: Arc<Mutex<Connection>>,
}

impl ReceiptIndex {
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let db_path = data_dir.join("receipts.db");
        let conn = Connection::open(&db_path).context("Failed to open receipts.db")?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             PRAGMA temp_store   = MEMORY;",
        )?;

        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS receipts (
                id              TEXT PRIMARY KEY,
                kind            TEXT NOT NULL,
                title           TEXT NOT NULL,
                author          TEXT,
                file_name       TEXT,
                mime_type       TEXT,
                local_sha256    TEXT,
                fingerprint     TEXT,
                remote_id       TEXT,
                artifact_url    TEXT NOT NULL,
                similarity      REAL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_receipts_kind ON receipts(kind);
            CREATE INDEX IF NOT EXISTS idx_receipts_created ON receipts(created_at);
            CREATE INDEX IF NOT EXISTS idx_receipts_fingerprint ON receipts(fingerprint);",
        )
        .context("Failed to init receipts schema")?;
        Ok(())
    }

    pub fn insert(&self, receipt: &Receipt) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO receipts ({COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            params![
                receipt.id,
                receipt.kind.as_str(),
                receipt.title,
                receipt.author,
                receipt.file_name,
                receipt.mime_type,
                receipt.local_sha256,
                receipt.fingerprint,
                receipt.remote_id,
                receipt.artifact_url,
                receipt.similarity,
                receipt.created_at,
            ],
        )
        .context("Failed to insert receipt")?;
        Ok(())
    }

    /// Remember a successful registration.
    pub fn record_upload(
        &self,
        submission: &Submission,
        author: &str,
        result: &UploadResult,
        artifact_url: &str,
    ) -> Result<Receipt> {
        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            kind: ReceiptKind::Upload,
            title: result.oeuvre.clone(),
            author: Some(author.to_string()),
            file_name: submission.file_name.clone(),
            mime_type: submission.mime_type.clone(),
            local_sha256: Some(submission.sha256.clone()),
            fingerprint: Some(result.empreinte_hash.clone()),
            remote_id: None,
            artifact_url: artifact_url.to_string(),
            similarity: None,
            created_at: Utc::now().to_rfc3339(),
        };
        self.insert(&receipt)?;
        Ok(receipt)
    }

    /// Remember a completed plagiarism check.
    pub fn record_analysis(
        &self,
        submission: &Submission,
        result: &AnalysisResult,
        artifact_url: &str,
    ) -> Result<Receipt> {
        let receipt = Receipt {
            id: Uuid::new_v4().to_string(),
            kind: ReceiptKind::Analysis,
            title: submission.title.clone(),
            author: None,
            file_name: submission.file_name.clone(),
            mime_type: submission.mime_type.clone(),
            local_sha256: Some(submission.sha256.clone()),
            fingerprint: None,
            remote_id: Some(result.analyse_id.clone()),
            artifact_url: artifact_url.to_string(),
            similarity: result.similarite,
            created_at: Utc::now().to_rfc3339(),
        };
        self.insert(&receipt)?;
        Ok(receipt)
    }

    pub fn get(&self, id: &str) -> Result<Option<Receipt>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM receipts WHERE id = ?1"))?;
        match stmt.query_row(params![id], Self::row_to_receipt) {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Newest first, optionally restricted to one kind.
    pub fn list(
        &self,
        offset: usize,
        limit: usize,
        kind: Option<ReceiptKind>,
    ) -> Result<ReceiptListResponse> {
        let conn = self.conn.lock();

        let (where_sql, count_params, query_params) = Self::build_filter(kind, offset, limit);

        let total: usize = conn.query_row(
            &format!("SELECT COUNT(*) FROM receipts {where_sql}"),
            rusqlite::params_from_iter(&count_params),
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {COLUMNS} FROM receipts {where_sql}
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        );
        let mut stmt = conn.prepare(&sql)?;
        let receipts = stmt
            .query_map(
                rusqlite::params_from_iter(&query_params),
                Self::row_to_receipt,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ReceiptListResponse {
            receipts,
            total,
            offset,
            limit,
        })
    }

    /// Substring search over title, author, fingerprint and analysis id.
    pub fn search(&self, term: &str, limit: usize) -> Result<Vec<Receipt>> {
        let conn = self.conn.lock();
        let pattern = format!("%{}%", escape_like(term));
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM receipts
             WHERE title LIKE ?1 ESCAPE '\\'
                OR author LIKE ?1 ESCAPE '\\'
                OR fingerprint LIKE ?1 ESCAPE '\\'
                OR remote_id LIKE ?1 ESCAPE '\\'
             ORDER BY created_at DESC
             LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(params![pattern, limit as i64], Self::row_to_receipt)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // WHERE clause and params for list()
    fn build_filter(
        kind: Option<ReceiptKind>,
        offset: usize,
        limit: usize,
    ) -> (String, Vec<String>, Vec<String>) {
        let mut count_params = Vec::new();
        let mut query_params = Vec::new();

        let where_sql = match kind {
            Some(kind) => {
                count_params.push(kind.as_str().to_string());
                query_params.push(kind.as_str().to_string());
                "WHERE kind = ?".to_string()
            }
            None => String::new(),
        };

        query_params.push(limit.to_string());
        query_params.push(offset.to_string());

        (where_sql, count_params, query_params)
    }

    fn row_to_receipt(row: &rusqlite::Row) -> rusqlite::Result<Receipt> {
        let kind: String = row.get(1)?;
        let kind = kind.parse::<ReceiptKind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
        })?;
        Ok(Receipt {
            id: row.get(0)?,
            kind,
            title: row.get(2)?,
            author: row.get(3)?,
            file_name: row.get(4)?,
            mime_type: row.get(5)?,
            local_sha256: row.get(6)?,
            fingerprint: row.get(7)?,
            remote_id: row.get(8)?,
            artifact_url: row.get(9)?,
            similarity: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
