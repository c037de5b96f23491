use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::Bill;
use crate::store::{fixture_bills, ReceiptUpload, Store, StoreError, StoredFile};

/// Store kept in process memory, used by `--demo` and the tests.
pub struct MemoryStore {
    bills: Mutex<Vec<Bill>>,
    receipts: Mutex<HashMap<String, StoredFile>>,
    next_list_error: Mutex<Option<StoreError>>,
    list_calls: AtomicUsize,
    next_key: AtomicUsize,
}

impl MemoryStore {
    pub fn new(bills: Vec<Bill>) -> Self {
        Self {
            bills: Mutex::new(bills),
            receipts: Mutex::new(HashMap::new()),
            next_list_error: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            next_key: AtomicUsize::new(1),
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(fixture_bills())
    }

    /// Make the next `list` call fail with `err`.
    pub async fn fail_next_list(&self, err: StoreError) {
        *self.next_list_error.lock().await = Some(err);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.next_list_error.lock().await.take() {
            return Err(err);
        }

        Ok(self.bills.lock().await.clone())
    }

    async fn create(&self, upload: ReceiptUpload) -> Result<StoredFile, StoreError> {
        if upload.email.is_empty() {
            return Err(StoreError::Unauthorized);
        }

        let key = format!("bill-{:04}", self.next_key.fetch_add(1, Ordering::SeqCst));
        let stored = StoredFile {
            file_url: format!("memory://receipts/{}/{}", key, upload.file_name),
            key: key.clone(),
        };
        debug!(key = %key, file_name = %upload.file_name, "stored receipt in memory");

        self.receipts.lock().await.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, key: &str, bill: &Bill) -> Result<Bill, StoreError> {
        if !self.receipts.lock().await.contains_key(key) {
            return Err(StoreError::NotFound);
        }

        let mut saved = bill.clone();
        saved.id = key.to_string();

        let mut bills = self.bills.lock().await;
        match bills.iter_mut().find(|b| b.id == key) {
            Some(existing) => *existing = saved.clone(),
            None => bills.push(saved.clone()),
        }

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(email: &str) -> ReceiptUpload {
        ReceiptUpload {
            file_name: "receipt.jpg".to_string(),
            content: vec![0xFF, 0xD8, 0xFF],
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn lists_fixture_bills() {
        let store = MemoryStore::with_fixtures();
        let bills = store.list().await.unwrap();

        assert_eq!(bills.len(), 4);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn injected_failure_applies_once() {
        let store = MemoryStore::with_fixtures();
        store.fail_next_list(StoreError::from_status(404)).await;

        let err = store.list().await.unwrap_err();
        assert_eq!(err.to_string(), "Erreur 404");
        assert!(store.list().await.is_ok());
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn create_then_update_adds_a_bill() {
        let store = MemoryStore::new(Vec::new());
        let stored = store.create(upload("employee@test.tld")).await.unwrap();
        assert!(stored.file_url.ends_with("/receipt.jpg"));

        let bill = Bill {
            name: "Nouvelle facture".to_string(),
            file_url: stored.file_url.clone(),
            ..Bill::default()
        };
        let saved = store.update(&stored.key, &bill).await.unwrap();
        assert_eq!(saved.id, stored.key);

        let bills = store.list().await.unwrap();
        assert_eq!(bills, vec![saved]);
    }

    #[tokio::test]
    async fn update_of_unknown_key_is_not_found() {
        let store = MemoryStore::new(Vec::new());
        let err = store.update("missing", &Bill::default()).await.unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn create_without_email_is_unauthorized() {
        let store = MemoryStore::new(Vec::new());
        let err = store.create(upload("")).await.unwrap_err();
        assert_eq!(err.status(), 401);
    }
}
