//! Registry of named [`ConfigStore`] instances.
//!
//! A [`Registry`] is created once by the host and passed to whatever needs
//! configuration access. It owns one default store plus any number of named
//! stores, all created lazily on first reference.
//!
//! Removing a name only unregisters it: callers already holding the
//! `Arc<ConfigStore>` keep a fully working store.

pub mod registry;

pub use lcs_store::ConfigStore;
pub use registry::Registry;
