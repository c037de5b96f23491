use std::path::Path;

use chrono::NaiveDate;
use mime::Mime;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Bill, BillStatus, ExpenseType, User};
use crate::routes::Route;
use crate::store::{ReceiptUpload, Store, StoreError};

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const DEFAULT_PCT: i32 = 20;

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("Seuls les fichiers jpg, jpeg ou png sont acceptés ({0})")]
    UnsupportedExtension(String),

    #[error("Type de fichier non accepté: {0}")]
    UnsupportedType(String),

    #[error("Lecture du fichier impossible: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Receipt accepted by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedReceipt {
    pub key: String,
    pub file_url: String,
    pub file_name: String,
}

/// Raw values typed into the new bill form.
#[derive(Debug, Clone)]
pub struct NewBillForm {
    pub expense_type: ExpenseType,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
    pub file_path: String,
}

impl Default for NewBillForm {
    fn default() -> Self {
        Self {
            expense_type: ExpenseType::Transports,
            name: String::new(),
            date: String::new(),
            amount: String::new(),
            vat: String::new(),
            pct: String::new(),
            commentary: String::new(),
            file_path: String::new(),
        }
    }
}

/// Check a receipt's extension and, when known, its MIME type.
pub fn validate_receipt(file_name: &str, content_type: Option<&str>) -> Result<Mime, ReceiptError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ReceiptError::UnsupportedExtension(file_name.to_string()));
    }

    match content_type {
        Some(raw) => {
            let parsed: Mime = raw
                .parse()
                .map_err(|_| ReceiptError::UnsupportedType(raw.to_string()))?;
            let subtype = parsed.subtype().as_str();
            if parsed.type_() != mime::IMAGE || !matches!(subtype, "jpeg" | "jpg" | "png") {
                return Err(ReceiptError::UnsupportedType(raw.to_string()));
            }
            Ok(parsed)
        }
        None if extension == "png" => Ok(mime::IMAGE_PNG),
        None => Ok(mime::IMAGE_JPEG),
    }
}

/// Guess an image type from the file's leading bytes.
pub fn sniff_content_type(content: &[u8]) -> Option<&'static str> {
    if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if content.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if content.starts_with(b"GIF8") {
        Some("image/gif")
    } else {
        None
    }
}

/// New bill page logic.
pub struct NewBill {
    user: User,
    pub form: NewBillForm,
    receipt: Option<UploadedReceipt>,
}

impl NewBill {
    pub fn new(user: User) -> Self {
        Self {
            user,
            form: NewBillForm::default(),
            receipt: None,
        }
    }

    pub fn receipt(&self) -> Option<&UploadedReceipt> {
        self.receipt.as_ref()
    }

    /// Read the file at `path`, validate it and upload it.
    pub async fn handle_change_file(&mut self, store: &dyn Store, path: &Path) -> Result<(), ReceiptError> {
        self.receipt = None;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Reject on the name alone before touching the disk.
        validate_receipt(&file_name, None).inspect_err(|_| self.form.file_path.clear())?;

        let content = tokio::fs::read(path).await?;
        let content_type = sniff_content_type(&content);

        self.upload_receipt(store, &file_name, content_type, content).await
    }

    /// Validate and upload an in-memory receipt.
    pub async fn upload_receipt(
        &mut self,
        store: &dyn Store,
        file_name: &str,
        content_type: Option<&str>,
        content: Vec<u8>,
    ) -> Result<(), ReceiptError> {
        self.receipt = None;

        if let Err(err) = validate_receipt(file_name, content_type) {
            warn!(file_name, error = %err, "rejected receipt");
            self.form.file_path.clear();
            return Err(err);
        }

        let stored = store
            .create(ReceiptUpload {
                file_name: file_name.to_string(),
                content,
                email: self.user.email.clone(),
            })
            .await?;

        info!(key = %stored.key, file_name, "uploaded receipt");
        self.receipt = Some(UploadedReceipt {
            key: stored.key,
            file_url: stored.file_url,
            file_name: file_name.to_string(),
        });

        Ok(())
    }

    /// Names of required fields that are missing or malformed.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if NaiveDate::parse_from_str(self.form.date.trim(), "%Y-%m-%d").is_err() {
            missing.push("Date");
        }
        if self.form.amount.trim().parse::<i32>().is_err() {
            missing.push("Montant TTC");
        }
        if !self.form.vat.trim().is_empty() && self.form.vat.trim().parse::<f64>().is_err() {
            missing.push("TVA");
        }
        if !self.form.pct.trim().is_empty() && self.form.pct.trim().parse::<i32>().is_err() {
            missing.push("%");
        }
        if self.receipt.is_none() {
            missing.push("Justificatif");
        }

        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Send the bill. Returns the page to show next: the bills list on
    /// success, this page again if the form is incomplete.
    pub async fn handle_submit(&mut self, store: &dyn Store) -> Result<Route, StoreError> {
        let Some(bill) = self.build_bill() else {
            warn!(missing = ?self.missing_fields(), "new bill form is incomplete");
            return Ok(Route::NewBill);
        };

        let key = bill.id.clone();
        store.update(&key, &bill).await?;
        info!(key = %key, "submitted bill");

        Ok(Route::Bills)
    }

    fn build_bill(&self) -> Option<Bill> {
        if !self.is_valid() {
            return None;
        }
        let receipt = self.receipt.as_ref()?;

        Some(Bill {
            id: receipt.key.clone(),
            email: self.user.email.clone(),
            bill_type: self.form.expense_type.as_str().to_string(),
            name: self.form.name.trim().to_string(),
            amount: self.form.amount.trim().parse().ok()?,
            date: self.form.date.trim().to_string(),
            vat: self.form.vat.trim().to_string(),
            pct: self.form.pct.trim().parse().unwrap_or(DEFAULT_PCT),
            commentary: self.form.commentary.clone(),
            file_url: receipt.file_url.clone(),
            file_name: receipt.file_name.clone(),
            status: BillStatus::Pending.as_str().to_string(),
            comment_admin: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn filled_form(container: &mut NewBill) {
        container.form.expense_type = ExpenseType::ServicesEnLigne;
        container.form.name = "Nouvelle facture".to_string();
        container.form.date = "2020-12-15".to_string();
        container.form.amount = "300".to_string();
        container.form.vat = "20".to_string();
        container.form.pct = "5".to_string();
        container.form.commentary = "this is a comment".to_string();
    }

    fn temp_file(name: &str, content: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("billed-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn accepts_jpg_jpeg_and_png() {
        assert_eq!(validate_receipt("test.jpg", Some("image/jpg")).unwrap().subtype(), "jpg");
        assert_eq!(validate_receipt("test.JPEG", None).unwrap(), mime::IMAGE_JPEG);
        assert_eq!(validate_receipt("scan.png", Some("image/png")).unwrap(), mime::IMAGE_PNG);
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(matches!(
            validate_receipt("test.gif", Some("image/gif")),
            Err(ReceiptError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            validate_receipt("receipt", None),
            Err(ReceiptError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn rejects_mismatched_content_types() {
        assert!(matches!(
            validate_receipt("test.jpg", Some("image/gif")),
            Err(ReceiptError::UnsupportedType(_))
        ));
        assert!(matches!(
            validate_receipt("test.png", Some("application/pdf")),
            Err(ReceiptError::UnsupportedType(_))
        ));
        assert!(matches!(
            validate_receipt("test.png", Some("not a mime")),
            Err(ReceiptError::UnsupportedType(_))
        ));
    }

    #[test]
    fn sniffs_common_image_headers() {
        assert_eq!(sniff_content_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_content_type(b"\x89PNG\r\n"), Some("image/png"));
        assert_eq!(sniff_content_type(b"GIF89a"), Some("image/gif"));
        assert_eq!(sniff_content_type(b"test"), None);
    }

    #[tokio::test]
    async fn gif_upload_is_rejected_and_form_stays_invalid() {
        let store = MemoryStore::new(Vec::new());
        let mut container = NewBill::new(User::employee("employee@test.tld"));
        filled_form(&mut container);
        container.form.file_path = "test.gif".to_string();

        let result = container
            .upload_receipt(&store, "test.gif", Some("image/gif"), b"randomGif".to_vec())
            .await;

        assert!(result.is_err());
        assert!(container.receipt().is_none());
        assert!(container.form.file_path.is_empty());
        assert!(!container.is_valid());
        assert_eq!(container.missing_fields(), vec!["Justificatif"]);
    }

    #[tokio::test]
    async fn submitting_an_invalid_form_stays_on_the_page() {
        let store = MemoryStore::new(Vec::new());
        let mut container = NewBill::new(User::employee("employee@test.tld"));

        let next = container.handle_submit(&store).await.unwrap();

        assert_eq!(next, Route::NewBill);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submitting_a_valid_form_sends_the_bill_and_returns_to_bills() {
        let store = MemoryStore::new(Vec::new());
        let mut container = NewBill::new(User::employee("employee@test.tld"));
        filled_form(&mut container);

        container
            .upload_receipt(&store, "test.jpg", Some("image/jpg"), b"test".to_vec())
            .await
            .unwrap();
        assert!(container.is_valid());

        let next = container.handle_submit(&store).await.unwrap();
        assert_eq!(next, Route::Bills);

        let bills = store.list().await.unwrap();
        assert_eq!(bills.len(), 1);
        let bill = &bills[0];
        assert_eq!(bill.email, "employee@test.tld");
        assert_eq!(bill.bill_type, "Services en ligne");
        assert_eq!(bill.amount, 300);
        assert_eq!(bill.pct, 5);
        assert_eq!(bill.status, "pending");
        assert_eq!(bill.file_name, "test.jpg");
    }

    #[tokio::test]
    async fn pct_defaults_to_twenty() {
        let store = MemoryStore::new(Vec::new());
        let mut container = NewBill::new(User::employee("employee@test.tld"));
        filled_form(&mut container);
        container.form.pct.clear();
        container
            .upload_receipt(&store, "test.png", None, b"test".to_vec())
            .await
            .unwrap();

        container.handle_submit(&store).await.unwrap();

        assert_eq!(store.list().await.unwrap()[0].pct, 20);
    }

    #[tokio::test]
    async fn change_file_reads_and_uploads_from_disk() {
        let store = MemoryStore::new(Vec::new());
        let mut container = NewBill::new(User::employee("employee@test.tld"));
        let path = temp_file("receipt.png", b"\x89PNG\r\n\x1a\n");

        container.handle_change_file(&store, &path).await.unwrap();

        let receipt = container.receipt().unwrap();
        assert_eq!(receipt.file_name, "receipt.png");
        assert!(receipt.file_url.ends_with("/receipt.png"));
    }

    #[tokio::test]
    async fn change_file_rejects_a_gif_named_jpg() {
        let store = MemoryStore::new(Vec::new());
        let mut container = NewBill::new(User::employee("employee@test.tld"));
        let path = temp_file("disguised.jpg", b"GIF89a....");

        let err = container.handle_change_file(&store, &path).await.unwrap_err();

        assert!(matches!(err, ReceiptError::UnsupportedType(_)));
        assert!(container.receipt().is_none());
    }

    #[tokio::test]
    async fn change_file_reports_missing_files() {
        let store = MemoryStore::new(Vec::new());
        let mut container = NewBill::new(User::employee("employee@test.tld"));

        let err = container
            .handle_change_file(&store, Path::new("/nonexistent/billed/receipt.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, ReceiptError::Io(_)));
    }
}
