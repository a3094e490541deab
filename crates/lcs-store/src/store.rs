use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use lcs_codec::decode_document;
use lcs_types::{Charset, Entry, StorageTarget};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::oneshot;
use tokio::task;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult, ValueError};
use crate::persist::write_document;
use crate::value::PropertyValue;
use crate::worker::{CommitWorker, Job};

/// Options fixed at store construction.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    /// Thread name of the background commit worker.
    pub worker_name: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            worker_name: "lcs-commit".to_string(),
        }
    }
}

/// State shared with the commit worker thread.
///
/// `entries` is the store's single mutual-exclusion domain: loads, reads,
/// mutations and commit bodies all run under it.
#[derive(Default)]
pub(crate) struct Shared {
    entries: Mutex<Vec<Entry>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        // Every critical section leaves the sequence consistent, so a
        // poisoned lock still guards valid data.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialize the current entries to `target` while holding the lock.
    pub(crate) fn commit(&self, target: &StorageTarget) -> StoreResult<()> {
        let entries = self.lock();
        write_document(target, &entries)
    }
}

/// An ordered, in-memory configuration namespace.
///
/// Entries keep insertion order. Reads return the first property with a
/// matching key; writes update that first match in place or append. Values
/// are stored as text and parsed on read by the typed getters.
///
/// # Examples
///
/// ```
/// use lcs_store::ConfigStore;
/// use lcs_types::Charset;
///
/// let store = ConfigStore::new();
/// assert!(store.load("name=Roby\nheight=173\n".as_bytes(), Charset::Utf8));
/// assert_eq!(store.get_string("name", "?"), "Roby");
/// assert_eq!(store.get_int("height", 0).unwrap(), 173);
/// assert_eq!(store.get_int("missing", 7).unwrap(), 7);
/// ```
pub struct ConfigStore {
    shared: Arc<Shared>,
    target: RwLock<StorageTarget>,
    worker: Mutex<Option<CommitWorker>>,
    options: StoreOptions,
}

impl ConfigStore {
    /// Create an empty store with a non-writable target.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(Vec::new()),
            }),
            target: RwLock::new(StorageTarget::default()),
            worker: Mutex::new(None),
            options,
        }
    }

    // ---- Loading ----

    /// Replace the store's contents with the document read from `reader`.
    ///
    /// Returns `false` on any read or format error; the store is then left
    /// empty. The reader is consumed and dropped before returning.
    pub fn load<R: Read>(&self, reader: R, charset: Charset) -> bool {
        match self.try_load(reader, charset) {
            Ok(_) => true,
            Err(e) => {
                warn!(charset = %charset, error = %e, "load failed; store cleared");
                false
            }
        }
    }

    /// Fallible form of [`load`](Self::load). Returns the number of entries
    /// loaded. On error the store is cleared.
    pub fn try_load<R: Read>(&self, mut reader: R, charset: Charset) -> StoreResult<usize> {
        let parsed = read_entries(&mut reader, charset);
        drop(reader);

        let mut entries = self.shared.lock();
        match parsed {
            Ok(fresh) => {
                *entries = fresh;
                debug!(entries = entries.len(), charset = %charset, "store loaded");
                Ok(entries.len())
            }
            Err(e) => {
                entries.clear();
                Err(e)
            }
        }
    }

    // ---- Reads ----

    /// The value of the first property named `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.shared
            .lock()
            .iter()
            .find(|e| e.matches_key(key))
            .map(|e| e.value().to_string())
    }

    /// Returns `true` if a property named `key` exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.shared.lock().iter().any(|e| e.matches_key(key))
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_byte(&self, key: &str, default: i8) -> Result<i8, ValueError> {
        self.get_integer(key, default, "i8")
    }

    pub fn get_short(&self, key: &str, default: i16) -> Result<i16, ValueError> {
        self.get_integer(key, default, "i16")
    }

    pub fn get_int(&self, key: &str, default: i32) -> Result<i32, ValueError> {
        self.get_integer(key, default, "i32")
    }

    pub fn get_long(&self, key: &str, default: i64) -> Result<i64, ValueError> {
        self.get_integer(key, default, "i64")
    }

    /// Read a floating-point value. Absent keys yield `default`.
    ///
    /// Accepts one trailing `d`/`D`/`f`/`F` type suffix after a digit or `.`,
    /// so `63.5d` reads as `63.5`.
    pub fn get_real(&self, key: &str, default: f64) -> Result<f64, ValueError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => strip_real_suffix(&value)
                .parse()
                .map_err(|source| ValueError::InvalidReal {
                    key: key.to_string(),
                    value,
                    source,
                }),
        }
    }

    /// Read a boolean. Only `"true"` (any case) is true; every other present
    /// value is false. Absent keys yield `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .map_or(default, |v| v.eq_ignore_ascii_case("true"))
    }

    fn get_integer<T>(&self, key: &str, default: T, target: &'static str) -> Result<T, ValueError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|source| ValueError::InvalidInteger {
                key: key.to_string(),
                value,
                target,
                source,
            }),
        }
    }

    /// Snapshot of all entries, in order.
    pub fn list(&self) -> Vec<Entry> {
        self.shared.lock().clone()
    }

    /// Write one diagnostic line per entry to `out`.
    pub fn print_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for entry in self.list() {
            writeln!(out, "{entry}")?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.shared.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.lock().is_empty()
    }

    // ---- Mutations ----

    /// Set `key` to the text form of `value`.
    ///
    /// Updates the first property named `key` in place, or appends a new
    /// property. Empty keys are ignored.
    pub fn set_property(&self, key: &str, value: impl PropertyValue) {
        if key.is_empty() {
            warn!("ignoring set_property with empty key");
            return;
        }
        let value = value.to_property_string();
        let mut entries = self.shared.lock();
        match entries.iter_mut().find(|e| e.matches_key(key)) {
            Some(Entry::Property { value: slot, .. }) => *slot = value,
            _ => entries.push(Entry::property(key, value)),
        }
        debug!(key, "property set");
    }

    /// Remove the first property named `key`. Returns `true` if one existed.
    pub fn remove_property(&self, key: &str) -> bool {
        let mut entries = self.shared.lock();
        match entries.iter().position(|e| e.matches_key(key)) {
            Some(idx) => {
                entries.remove(idx);
                debug!(key, "property removed");
                true
            }
            None => false,
        }
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.shared.lock().clear();
    }

    // ---- Persistence ----

    /// Replace the storage target. Does not touch the file.
    pub fn configure_storage(&self, target: StorageTarget) {
        *self.target.write().unwrap_or_else(PoisonError::into_inner) = target;
    }

    /// The current storage target.
    pub fn target(&self) -> StorageTarget {
        self.target
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Write the entries to the target on the calling thread.
    ///
    /// No-op when the target is not writable. Failures are logged, never
    /// returned; use [`try_commit_sync`](Self::try_commit_sync) to observe
    /// them.
    pub fn commit_sync(&self) {
        let target = self.target();
        if !target.writable {
            return;
        }
        if let Err(e) = self.shared.commit(&target) {
            warn!(path = %target.path.display(), error = %e, "commit failed");
        }
    }

    /// Write the entries to the target on the calling thread, reporting
    /// failure. A non-writable target is an error here.
    pub fn try_commit_sync(&self) -> StoreResult<()> {
        self.shared.commit(&self.target())
    }

    /// Queue a commit on the store's background worker and return at once.
    ///
    /// No-op when the target is not writable. Queued commits run one at a
    /// time in submission order; each writes the entries current when it
    /// runs to the target configured when it was queued.
    pub fn commit_async(&self) {
        let target = self.target();
        if !target.writable {
            return;
        }
        if let Err(e) = self.submit(Job::Commit(target)) {
            warn!(error = %e, "could not queue async commit");
        }
    }

    /// Block until every async commit queued so far has finished.
    ///
    /// Safe to call from a multi-threaded tokio runtime, where the wait runs
    /// under `block_in_place`. On a current-thread runtime blocking would
    /// stall the runtime, so this logs a warning and returns without
    /// waiting; use [`flush`](Self::flush) there instead.
    pub fn flush_async(&self) {
        let Some(done) = self.queue_barrier() else {
            return;
        };
        match Handle::try_current() {
            Err(_) => {
                let _ = done.blocking_recv();
            }
            Ok(handle) => match handle.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    let _ = task::block_in_place(|| done.blocking_recv());
                }
                _ => warn!("flush_async on a current-thread runtime; use flush().await"),
            },
        }
    }

    /// Wait, without blocking the runtime, until every async commit queued
    /// so far has finished.
    pub async fn flush(&self) {
        if let Some(done) = self.queue_barrier() {
            let _ = done.await;
        }
    }

    /// Queue a barrier behind pending commits. `None` if no worker has been
    /// started or the worker is gone.
    fn queue_barrier(&self) -> Option<oneshot::Receiver<()>> {
        if self.lock_worker().is_none() {
            return None;
        }
        let (tx, rx) = oneshot::channel();
        match self.submit(Job::Barrier(tx)) {
            Ok(()) => Some(rx),
            Err(e) => {
                warn!(error = %e, "could not flush async commits");
                None
            }
        }
    }

    fn submit(&self, job: Job) -> StoreResult<()> {
        let mut worker = self.lock_worker();
        if worker.is_none() {
            *worker = Some(CommitWorker::spawn(
                &self.options.worker_name,
                Arc::clone(&self.shared),
            )?);
        }
        match worker.as_ref() {
            Some(w) => w.submit(job),
            None => Err(StoreError::WorkerStopped),
        }
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<CommitWorker>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("entry_count", &self.len())
            .field("target", &self.target())
            .finish()
    }
}

/// Drop a single float type suffix (`1.5d`, `2F`). `inf`/`nan` keep their
/// final letter.
fn strip_real_suffix(value: &str) -> &str {
    let bytes = value.as_bytes();
    match bytes {
        [.., prev, last]
            if matches!(last, b'd' | b'D' | b'f' | b'F')
                && (prev.is_ascii_digit() || *prev == b'.') =>
        {
            &value[..value.len() - 1]
        }
        _ => value,
    }
}

fn read_entries<R: Read>(reader: &mut R, charset: Charset) -> StoreResult<Vec<Entry>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(decode_document(&charset.decode(&bytes))?)
}
