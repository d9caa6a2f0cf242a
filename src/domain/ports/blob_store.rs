use crate::domain::error::DomainError;

/// Opaque key-value storage for serialized ledger blobs.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn put(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
