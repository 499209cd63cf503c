//! Background title sweep over a catalog.
//!
//! The sweep runs on its own thread and reads a single snapshot, so a
//! concurrent `add` is either fully visible to it or not at all.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use super::catalog::Catalog;
use super::error::{CatalogError, Result};

const THREAD_NAME: &str = "libris-indexer";

/// Read-only indexer producing the catalog's titles
pub struct Indexer;

impl Indexer {
    /// Start the sweep on a new thread without waiting for it
    pub fn spawn(catalog: Arc<Catalog>) -> Result<JoinHandle<Result<Vec<String>>>> {
        thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || sweep(&catalog))
            .map_err(|e| CatalogError::Unavailable(format!("failed to spawn indexer: {}", e)))
    }

    /// Run the sweep on a new thread and block until it completes
    pub fn run(catalog: Arc<Catalog>) -> Result<Vec<String>> {
        Self::spawn(catalog)?
            .join()
            .map_err(|_| CatalogError::Unavailable("indexer thread panicked".to_string()))?
    }

    /// Like [`Indexer::run`], but stop waiting after `timeout`.
    ///
    /// The worker is not cancelled; its result is discarded if it finishes late.
    pub fn run_with_deadline(catalog: Arc<Catalog>, timeout: Duration) -> Result<Vec<String>> {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                // Receiver is gone once the deadline has passed
                let _ = tx.send(sweep(&catalog));
            })
            .map_err(|e| CatalogError::Unavailable(format!("failed to spawn indexer: {}", e)))?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CatalogError::IndexTimeout {
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(CatalogError::Unavailable(
                "indexer thread exited without a result".to_string(),
            )),
        }
    }
}

fn sweep(catalog: &Catalog) -> Result<Vec<String>> {
    let titles = catalog.titles()?;
    for title in &titles {
        debug!("Indexing: {}", title);
    }
    info!(count = titles.len(), "Indexed catalog");
    Ok(titles)
}
