use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct StorageError(pub String);

/// Where media bytes live. Objects are written once and never removed here.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Address at which `key` can be fetched without credentials.
    fn public_url(&self, key: &str) -> String;
}
