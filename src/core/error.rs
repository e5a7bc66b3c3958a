use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FxError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("All rate providers failed: {0}")]
    AllProvidersFailed(String),
    #[error("Invalid rates response: {0}")]
    InvalidResponse(String),
}
