//! Foundation types for the line config store (LCS).
//!
//! Every other LCS crate depends on `lcs-types`.
//!
//! # Key Types
//!
//! - [`Entry`] — One parsed line: a verbatim comment or a `key=value` property
//! - [`Charset`] — Text encoding used to read and write configuration files
//! - [`StorageTarget`] — Where, and whether, a store commits its entries
//! - [`SyncMode`] — Durability of a commit

pub mod charset;
pub mod entry;
pub mod error;
pub mod target;

pub use charset::Charset;
pub use entry::Entry;
pub use error::{Result, TypeError};
pub use target::{StorageTarget, SyncMode};
