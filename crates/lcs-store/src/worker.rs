//! Single-threaded background queue for asynchronous commits.
//!
//! Jobs run strictly in submission order on one named thread. The thread
//! drains any queued jobs and exits once the owning store drops the worker.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use lcs_types::StorageTarget;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::Shared;

pub(crate) enum Job {
    /// Serialize the current entries and write them to the target.
    Commit(StorageTarget),
    /// Signals once every job queued before it has finished.
    Barrier(oneshot::Sender<()>),
}

pub(crate) struct CommitWorker {
    sender: Option<mpsc::UnboundedSender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl CommitWorker {
    pub(crate) fn spawn(name: &str, shared: Arc<Shared>) -> io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = thread::Builder::new()
            .name(name.replace('\0', "?"))
            .spawn(move || worker_loop(rx, shared))?;
        info!(worker = name, "commit worker started");
        Ok(Self {
            sender: Some(tx),
            handle: Some(handle),
        })
    }

    pub(crate) fn submit(&self, job: Job) -> StoreResult<()> {
        self.sender
            .as_ref()
            .ok_or(StoreError::WorkerStopped)?
            .send(job)
            .map_err(|_| StoreError::WorkerStopped)
    }
}

impl Drop for CommitWorker {
    fn drop(&mut self) {
        // Closing the channel lets the thread finish queued jobs and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("commit worker panicked");
            }
        }
    }
}

fn worker_loop(mut rx: mpsc::UnboundedReceiver<Job>, shared: Arc<Shared>) {
    while let Some(job) = rx.blocking_recv() {
        match job {
            Job::Commit(target) => {
                if let Err(e) = shared.commit(&target) {
                    warn!(path = %target.path.display(), error = %e, "async commit failed");
                }
            }
            Job::Barrier(done) => {
                // The waiter may have given up; nothing to report then.
                let _ = done.send(());
            }
        }
    }
    info!("commit worker stopped");
}
