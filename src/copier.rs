//! Fan-out replication of one item to many destinations.
//!
//! # Strategy
//!
//! 1. Read the whole item from the source into one immutable buffer
//! 2. Start a rayon pool with one thread per destination and spawn one
//!    write task per destination, each with its own cursor over the shared
//!    buffer
//! 3. Block on a single outcome channel until every task succeeded or the
//!    first one failed
//!
//! The first failure cancels the shared scope and is returned as is. Tasks
//! that already passed their cancellation check keep running and their
//! outcomes are dropped, so after a failed copy any subset of the other
//! destinations may hold the new content.
//!
//! Every copy gets its own pool, so a write still running after an earlier
//! failure never delays the writes of the next copy.

use crate::capability::{Destination, Source};
use crate::error::{Error, Result};
use crate::scope::CancelScope;
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::sync::mpsc;

#[cfg(feature = "progress")]
use crate::progress::ProgressCallback;

/// Replicates items from one [`Source`] to a fixed set of [`Destination`]s.
///
/// # Example
///
/// ```no_run
/// use fancopy::{CancelScope, Copier, Destination, LocalDestination, LocalSource, Source};
/// use std::sync::Arc;
///
/// let scope = CancelScope::new();
/// let source = LocalSource::open(&scope, "local:///data/in")?;
/// let mirrors: Vec<Arc<dyn Destination>> = vec![
///     Arc::new(LocalDestination::open(&scope, "local:///mnt/a")?),
///     Arc::new(LocalDestination::open(&scope, "local:///mnt/b")?),
/// ];
///
/// let copier = Copier::new(Box::new(source), mirrors)?;
/// copier.copy(&scope, "reports/2024.csv")?;
/// # Ok::<(), fancopy::Error>(())
/// ```
pub struct Copier {
    source: Box<dyn Source>,
    destinations: Vec<Arc<dyn Destination>>,
    #[cfg(feature = "progress")]
    progress: Option<ProgressCallback>,
}

impl std::fmt::Debug for Copier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Copier")
            .field("destinations", &self.destinations.len())
            .finish_non_exhaustive()
    }
}

impl Copier {
    /// Create a copier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDestinations`] if `destinations` is empty.
    pub fn new(source: Box<dyn Source>, destinations: Vec<Arc<dyn Destination>>) -> Result<Self> {
        if destinations.is_empty() {
            return Err(Error::NoDestinations);
        }
        Ok(Self {
            source,
            destinations,
            #[cfg(feature = "progress")]
            progress: None,
        })
    }

    /// Report `(completed, total)` after each destination succeeds.
    #[cfg(feature = "progress")]
    #[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Number of configured destinations.
    #[must_use]
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Replicate the item at `uri` to every destination.
    ///
    /// Returns once all destinations succeeded, or as soon as one failed.
    /// Writes to all destinations run at the same time.
    ///
    /// # Errors
    ///
    /// - Any error from the source, before any destination is touched
    /// - The first error reported by a destination, unchanged
    /// - [`Error::Cancelled`] if `scope` was cancelled before a write began
    /// - [`Error::WorkerPool`] if the write threads could not be started
    pub fn copy(&self, scope: &CancelScope, uri: &str) -> Result<()> {
        let content = self.read_all(scope, uri)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            uri,
            bytes = content.len(),
            destinations = self.destinations.len(),
            "read item, dispatching writes"
        );

        let total = self.destinations.len();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(total)
            .thread_name(|i| format!("fancopy-writer-{i}"))
            .build()?;

        let scope = scope.child();
        let (tx, rx) = mpsc::channel::<(usize, Result<()>)>();

        for (index, destination) in self.destinations.iter().enumerate() {
            let destination = Arc::clone(destination);
            let mut cursor = Cursor::new(Arc::clone(&content));
            let scope = scope.clone();
            let uri = uri.to_owned();
            let tx = tx.clone();

            pool.spawn(move || {
                let outcome = scope
                    .check()
                    .and_then(|()| destination.write(&scope, &uri, &mut cursor));
                // The receiver is gone once an earlier failure was returned.
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let mut remaining = total;
        while remaining > 0 {
            match rx.recv() {
                Ok((_index, Ok(()))) => {
                    remaining -= 1;

                    #[cfg(feature = "tracing")]
                    tracing::debug!(uri, destination = _index, remaining, "destination done");

                    #[cfg(feature = "progress")]
                    if let Some(ref progress) = self.progress {
                        progress(total - remaining, total);
                    }
                }
                Ok((_index, Err(e))) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(uri, destination = _index, error = %e, "destination failed, cancelling the rest");

                    scope.cancel();
                    return Err(e);
                }
                Err(mpsc::RecvError) => return Err(Error::WorkerLost),
            }
        }

        Ok(())
    }

    fn read_all(&self, scope: &CancelScope, uri: &str) -> Result<Arc<[u8]>> {
        let mut reader = self.source.read(scope, uri)?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(|source| Error::Read {
            uri: uri.to_owned(),
            source,
        })?;
        Ok(buf.into())
    }
}
