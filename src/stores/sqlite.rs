//! SQLite storage implementation.
//!
//! A file-based store using `sqlx`. Timestamps are stored as RFC 3339
//! text; ids and enums as their string forms.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{PipelineError, Result};
use crate::traits::store::DocumentStore;
use crate::types::document::{
    AnalysisId, AnalysisRecord, DocumentId, DocumentRecord, DocumentStatus,
};

/// SQLite-backed document store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and run migrations.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - in-memory database (ephemeral)
    /// - `sqlite:./minutes.db?mode=rwc` - file, created if missing
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(storage_err)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                cache_location TEXT,
                content_hash TEXT,
                status TEXT NOT NULL,
                scraped_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_documents_status ON documents(status);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analyses (
                id TEXT PRIMARY KEY,
                document_id TEXT NOT NULL REFERENCES documents(id),
                kind TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_analyses_document_id ON analyses(document_id);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn storage_err(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Storage(e.to_string().into())
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    title: String,
    url: String,
    cache_location: Option<String>,
    content_hash: Option<String>,
    status: String,
    scraped_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl DocumentRow {
    fn into_record(self) -> Result<DocumentRecord> {
        Ok(DocumentRecord {
            id: DocumentId::parse(&self.id).map_err(storage_err)?,
            title: self.title,
            url: self.url,
            cache_location: self.cache_location,
            content_hash: self.content_hash,
            status: self
                .status
                .parse::<DocumentStatus>()
                .map_err(storage_err)?,
            scraped_at: self.scraped_at.as_deref().map(parse_timestamp).transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: String,
    document_id: String,
    kind: String,
    content: String,
    created_at: String,
}

impl AnalysisRow {
    fn into_record(self) -> Result<AnalysisRecord> {
        Ok(AnalysisRecord {
            id: AnalysisId::parse(&self.id).map_err(storage_err)?,
            document_id: DocumentId::parse(&self.document_id).map_err(storage_err)?,
            kind: self.kind.parse().map_err(storage_err)?,
            content: self.content,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| storage_err(format!("invalid timestamp: {e}")))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert_documents(&self, documents: &[DocumentRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        for doc in documents {
            sqlx::query(
                r#"
                INSERT INTO documents
                    (id, title, url, cache_location, content_hash, status,
                     scraped_at, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(doc.id.to_string())
            .bind(&doc.title)
            .bind(&doc.url)
            .bind(&doc.cache_location)
            .bind(&doc.content_hash)
            .bind(doc.status.as_str())
            .bind(doc.scraped_at.map(|t| t.to_rfc3339()))
            .bind(doc.created_at.to_rfc3339())
            .bind(doc.updated_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        }
        tx.commit().await.map_err(storage_err)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<DocumentRecord>> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT * FROM documents WHERE url = ?")
                .bind(url)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_err)?;
        row.map(DocumentRow::into_record).transpose()
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<DocumentRecord>> {
        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT * FROM documents WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_err)?;
        row.map(DocumentRow::into_record).transpose()
    }

    async fn find_by_status(&self, status: DocumentStatus) -> Result<Vec<DocumentRecord>> {
        let rows: Vec<DocumentRow> =
            sqlx::query_as("SELECT * FROM documents WHERE status = ? ORDER BY created_at")
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(storage_err)?;
        rows.into_iter().map(DocumentRow::into_record).collect()
    }

    async fn update_document(&self, document: &DocumentRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET title = ?, cache_location = ?, content_hash = ?, status = ?,
                scraped_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&document.title)
        .bind(&document.cache_location)
        .bind(&document.content_hash)
        .bind(document.status.as_str())
        .bind(document.scraped_at.map(|t| t.to_rfc3339()))
        .bind(document.updated_at.to_rfc3339())
        .bind(document.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(storage_err(format!(
                "unknown document id: {}",
                document.id
            )));
        }
        Ok(())
    }

    async fn create_analysis(&self, analysis: &AnalysisRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analyses (id, document_id, kind, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(analysis.id.to_string())
        .bind(analysis.document_id.to_string())
        .bind(analysis.kind.as_str())
        .bind(&analysis.content)
        .bind(analysis.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn analyses_for_document(&self, id: DocumentId) -> Result<Vec<AnalysisRecord>> {
        let rows: Vec<AnalysisRow> = sqlx::query_as(
            "SELECT * FROM analyses WHERE document_id = ? ORDER BY created_at, id",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        rows.into_iter().map(AnalysisRow::into_record).collect()
    }
}
