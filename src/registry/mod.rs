//! User-approved domains, persisted under one storage namespace.
//!
//! The [`TrustRegistry`] loads its sequence once and then serves membership
//! checks from memory, so gate evaluation never waits on storage. Writes go
//! through a single-writer actor backed by an [`mpsc`] channel. Persistence
//! is best-effort: failures are logged and never reach navigation.

pub mod writer;

use std::sync::{Arc, RwLock};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::gate::domain::Domain;
use crate::storage::KeyValueStore;

use self::writer::WriteOp;

/// Feature key the registry is stored under, before namespacing.
pub const TRUSTED_KEY: &str = "trusted-external-link";

/// Writer channel capacity. Remember is at most once per confirmed
/// navigation, so this is far beyond normal load.
const WRITER_CHANNEL_CAPACITY: usize = 64;

/// Persistent, ordered set of domains the user chose to trust.
pub struct TrustRegistry {
    /// Namespaced storage key.
    key: String,
    /// In-memory sequence, the source of truth for reads.
    domains: RwLock<Vec<String>>,
    /// Set when the initial load failed; persistence is skipped so a
    /// partial snapshot never replaces stored data.
    degraded: bool,
    /// Single-writer actor; absent when no runtime was available at load.
    writer: Option<Writer>,
}

/// Handle to the running writer actor.
struct Writer {
    tx: mpsc::Sender<WriteOp>,
    handle: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for TrustRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustRegistry")
            .field("key", &self.key)
            .field("degraded", &self.degraded)
            .finish_non_exhaustive()
    }
}

impl TrustRegistry {
    /// Load the registry stored under `key` and spawn its writer actor.
    ///
    /// Never fails: if storage is unreachable or the stored value is
    /// malformed, the registry starts empty and in degraded mode. Outside a
    /// Tokio runtime the writer cannot be spawned, so the loaded domains are
    /// served read-only and the registry is degraded as well.
    pub async fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (domains, mut degraded) = match store.get(&key).await {
            Ok(Some(stored)) => (sanitize(stored), false),
            Ok(None) => (Vec::new(), false),
            Err(err) => {
                warn!(key, error = %err, "trust registry unavailable; treating all domains as untrusted");
                (Vec::new(), true)
            }
        };

        let writer = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let (tx, rx) = mpsc::channel(WRITER_CHANNEL_CAPACITY);
                let handle = runtime.spawn(writer::run_writer(store, rx));
                Some(Writer { tx, handle })
            }
            Err(err) => {
                warn!(key, error = %err, "no async runtime; trust registry will not persist");
                degraded = true;
                None
            }
        };

        info!(key, entries = domains.len(), degraded, "trust registry loaded");

        Self {
            key,
            domains: RwLock::new(domains),
            degraded,
            writer,
        }
    }

    /// Check whether `domain` was previously remembered (case-insensitive).
    pub fn is_trusted(&self, domain: &str) -> bool {
        let Some(domain) = Domain::parse(domain) else {
            return false;
        };
        match self.domains.read() {
            Ok(list) => list.iter().any(|d| d == domain.as_str()),
            Err(_) => false,
        }
    }

    /// Remember `domain` as trusted.
    ///
    /// Idempotent. Persistence happens asynchronously through the writer
    /// actor; failures are logged and dropped.
    pub fn remember(&self, domain: &str) {
        let Some(domain) = Domain::parse(domain) else {
            return;
        };

        // Enqueue under the write lock so snapshots reach the writer in the
        // same order the list was mutated.
        let mut list = match self.domains.write() {
            Ok(list) => list,
            Err(e) => {
                warn!(domain = %domain, error = %e, "trust registry lock poisoned");
                return;
            }
        };
        if list.iter().any(|d| d == domain.as_str()) {
            debug!(domain = %domain, "domain already trusted");
            return;
        }
        list.push(domain.to_string());

        let Some(writer) = self.writer.as_ref().filter(|_| !self.degraded) else {
            drop(list);
            warn!(domain = %domain, "trust registry degraded; remembered for this session only");
            return;
        };

        let op = WriteOp::Store {
            key: self.key.clone(),
            domains: list.clone(),
        };
        let queued = writer.tx.try_send(op);
        drop(list);

        match queued {
            Ok(()) => info!(domain = %domain, "domain remembered as trusted"),
            Err(e) => warn!(domain = %domain, error = %e, "failed to queue trusted domain write"),
        }
    }

    /// Ordered snapshot of remembered domains.
    pub fn domains(&self) -> Vec<String> {
        self.domains
            .read()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// The namespaced storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `true` if the initial load failed and writes are skipped.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Wait until every write queued so far has been applied to storage.
    pub async fn flush(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        let (ack_tx, ack_rx) = oneshot::channel();
        if writer.tx.send(WriteOp::Flush(ack_tx)).await.is_err() {
            warn!("trust registry writer closed before flush");
            return;
        }
        let _ = ack_rx.await;
    }

    /// Gracefully shut down the writer actor.
    ///
    /// Drops the sender channel and awaits the writer task to drain.
    pub async fn shutdown(self) {
        let Some(Writer { tx, handle }) = self.writer else {
            return;
        };
        drop(tx);
        let _ = handle.await;
        info!("trust registry shut down");
    }
}

/// Normalize a stored sequence: lowercase, drop blanks and duplicates,
/// keep first-occurrence order.
fn sanitize(stored: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(stored.len());
    for raw in stored {
        if let Some(domain) = Domain::parse(&raw) {
            let domain = domain.into_string();
            if !out.contains(&domain) {
                out.push(domain);
            }
        }
    }
    out
}
