use thiserror::Error;

/// Errors produced while decoding configuration text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The line is neither a comment/blank line nor `key=value` with a
    /// non-empty key. `line_no` is 1-based, or 0 for a standalone line.
    #[error("illegal line {line_no}: {line:?}")]
    IllegalLine { line_no: usize, line: String },
}

/// Convenience alias used throughout the codec crate.
pub type Result<T> = std::result::Result<T, CodecError>;
