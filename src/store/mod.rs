mod error;
mod fixtures;
mod memory;

use async_trait::async_trait;

use crate::models::Bill;

pub use error::StoreError;
pub use fixtures::fixture_bills;
pub use memory::MemoryStore;

/// A receipt file on its way to the store.
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file_name: String,
    pub content: Vec<u8>,
    pub email: String,
}

/// Reference to a stored receipt. `key` identifies the bill to be filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub file_url: String,
    pub key: String,
}

/// The remote bills API.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;

    async fn create(&self, upload: ReceiptUpload) -> Result<StoredFile, StoreError>;

    /// Write `bill` into the record created for `key`.
    async fn update(&self, key: &str, bill: &Bill) -> Result<Bill, StoreError>;
}
