use std::num::{ParseFloatError, ParseIntError};

use lcs_codec::CodecError;

/// Errors from loading or committing a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while reading the source or writing the target.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document contains an illegal line.
    #[error("format error: {0}")]
    Codec(#[from] CodecError),

    /// A commit was requested but the storage target is not writable.
    #[error("storage target is not writable")]
    NotWritable,

    /// The background commit thread has exited, so nothing is left to
    /// receive queued jobs. Happens only after a commit job panicked.
    #[error("commit worker stopped")]
    WorkerStopped,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A present value could not be read as the requested type.
///
/// Absent keys never produce this error; they yield the caller's default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("value {value:?} of {key:?} is not a valid {target}: {source}")]
    InvalidInteger {
        key: String,
        value: String,
        target: &'static str,
        #[source]
        source: ParseIntError,
    },

    #[error("value {value:?} of {key:?} is not a valid real: {source}")]
    InvalidReal {
        key: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },
}
