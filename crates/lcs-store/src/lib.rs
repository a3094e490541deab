//! Ordered in-memory configuration store for the line config store (LCS).
//!
//! A [`ConfigStore`] holds the entries of one configuration namespace in
//! document order and persists them to a file on demand.
//!
//! # Concurrency
//!
//! Each store has one lock. `load`, every read, `set_property`,
//! `remove_property` and the write body of both commit flavours take it, so
//! they are totally ordered. `commit_async` hands work to a single
//! background thread owned by the store; queued commits run in submission
//! order and never overlap.
//!
//! # Errors
//!
//! Loading and committing are best effort: [`ConfigStore::load`] returns
//! `false` and [`ConfigStore::commit_sync`] only logs. Typed getters are
//! strict: a present value that does not parse is a [`ValueError`]. The
//! `try_*` variants expose [`StoreError`] for callers who need it.

pub mod error;
pub mod persist;
pub mod store;
pub mod value;
mod worker;

pub use error::{StoreError, StoreResult, ValueError};
pub use persist::write_document;
pub use store::{ConfigStore, StoreOptions};
pub use value::PropertyValue;
