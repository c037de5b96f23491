use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::Bill;
use crate::store::{ReceiptUpload, Store, StoreError, StoredFile};

const BILL_COLUMNS: &str =
    "id, email, type, name, amount, date, vat, pct, commentary, file_url, file_name, status, comment_admin";

/// Postgres-backed bills store, scoped to the connected employee
pub struct Database {
    pool: PgPool,
    receipts_dir: PathBuf,
    owner_email: String,
}

impl Database {
    /// Create a new Database instance with a connection pool and run migrations
    pub async fn new(config: &Config, owner_email: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(config.database_url()?)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let receipts_dir = PathBuf::from(&config.receipts_dir);
        tokio::fs::create_dir_all(&receipts_dir).await?;

        info!(receipts_dir = %receipts_dir.display(), owner = %owner_email, "database ready");
        Ok(Self {
            pool,
            receipts_dir,
            owner_email: owner_email.to_string(),
        })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    fn receipt_path(&self, key: &str, file_name: &str) -> PathBuf {
        self.receipts_dir.join(format!("{}-{}", key, sanitize_file_name(file_name)))
    }
}

/// Keep only the final path component so uploads cannot escape the receipts directory.
fn sanitize_file_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "receipt".to_string())
}

// Bills belong to the employee who sent them; `$1` is the owner's email.
fn list_query() -> String {
    format!("SELECT {} FROM bills WHERE email = $1 ORDER BY date DESC", BILL_COLUMNS)
}

/// Write the receipt file, then commit. The file is removed again if either step fails.
async fn persist_receipt<F, Fut>(path: &Path, content: &[u8], commit: F) -> Result<(), StoreError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    if let Err(err) = tokio::fs::write(path, content).await {
        discard_receipt(path).await;
        return Err(err.into());
    }

    if let Err(err) = commit().await {
        discard_receipt(path).await;
        return Err(err.into());
    }

    Ok(())
}

async fn discard_receipt(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "discarded receipt"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "could not discard receipt"),
    }
}

fn file_url(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

#[async_trait]
impl Store for Database {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let bills = sqlx::query_as::<_, Bill>(&list_query())
            .bind(&self.owner_email)
            .fetch_all(self.get_pool())
            .await?;

        debug!(count = bills.len(), owner = %self.owner_email, "listed bills");
        Ok(bills)
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<StoredFile, StoreError> {
        if upload.email.is_empty() {
            return Err(StoreError::Unauthorized);
        }

        let mut tx = self.pool.begin().await?;

        let key: String = sqlx::query_scalar(
            "INSERT INTO receipts (email, file_name) VALUES ($1, $2) RETURNING key",
        )
        .bind(&upload.email)
        .bind(&upload.file_name)
        .fetch_one(&mut *tx)
        .await?;

        let path = self.receipt_path(&key, &upload.file_name);
        let url = file_url(&path);

        sqlx::query("UPDATE receipts SET file_url = $1 WHERE key = $2")
            .bind(&url)
            .bind(&key)
            .execute(&mut *tx)
            .await?;

        persist_receipt(&path, &upload.content, move || tx.commit()).await?;

        info!(key = %key, path = %path.display(), "stored receipt");
        Ok(StoredFile { file_url: url, key })
    }

    async fn update(&self, key: &str, bill: &Bill) -> Result<Bill, StoreError> {
        let exists: Option<String> = sqlx::query_scalar("SELECT key FROM receipts WHERE key = $1")
            .bind(key)
            .fetch_optional(self.get_pool())
            .await?;
        if exists.is_none() {
            return Err(StoreError::NotFound);
        }

        let query = format!(
            r#"
            INSERT INTO bills ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE
            SET email = $2, type = $3, name = $4, amount = $5, date = $6, vat = $7,
                pct = $8, commentary = $9, file_url = $10, file_name = $11,
                status = $12, comment_admin = $13
            RETURNING {columns}
            "#,
            columns = BILL_COLUMNS
        );

        let saved = sqlx::query_as::<_, Bill>(&query)
            .bind(key)
            .bind(&bill.email)
            .bind(&bill.bill_type)
            .bind(&bill.name)
            .bind(bill.amount)
            .bind(&bill.date)
            .bind(&bill.vat)
            .bind(bill.pct)
            .bind(&bill.commentary)
            .bind(&bill.file_url)
            .bind(&bill.file_name)
            .bind(&bill.status)
            .bind(&bill.comment_admin)
            .fetch_one(self.get_pool())
            .await?;

        info!(key = %key, "saved bill");
        Ok(saved)
    }
}
