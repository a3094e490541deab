use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),
}

/// Convenience alias used throughout the types crate.
pub type Result<T> = std::result::Result<T, TypeError>;
