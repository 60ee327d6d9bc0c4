use super::access::MerchantSession;
use super::domain::{MerchantId, MerchantSnapshot};

/// Read-only merchant lookups backing the evaluator.
pub trait MerchantDirectory: Send + Sync {
    fn fetch(&self, id: &MerchantId) -> Result<Option<MerchantSnapshot>, DirectoryError>;
    fn list(&self) -> Result<Vec<MerchantSnapshot>, DirectoryError>;
}

/// Resolves bearer tokens to sessions issued by the auth provider.
pub trait SessionStore: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Option<MerchantSession>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
