//! Single-writer actor for serialized trust registry persistence.
//!
//! The registry enqueues a full snapshot of its domain sequence while it
//! still holds the list's write lock, so queue order matches mutation
//! order. Snapshots are applied in that order. Unless a snapshot was dropped
//! on a full queue, the last committed write is the latest in-memory state.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{error, trace};

use crate::storage::KeyValueStore;

/// Operations that can be sent to the write actor.
#[derive(Debug)]
pub enum WriteOp {
    /// Replace the stored sequence for a namespace.
    Store {
        /// Namespace key.
        key: String,
        /// Full ordered domain sequence.
        domains: Vec<String>,
    },

    /// Acknowledge once every earlier operation has been applied.
    Flush(oneshot::Sender<()>),
}

/// Run the single-writer actor loop.
///
/// Processes [`WriteOp`] messages until the sender half is dropped.
pub async fn run_writer(store: Arc<dyn KeyValueStore>, mut rx: mpsc::Receiver<WriteOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            WriteOp::Store { key, domains } => match store.set(&key, &domains).await {
                Ok(()) => trace!(key, entries = domains.len(), "trusted domains persisted"),
                Err(err) => error!(key, error = %err, "trusted domain write failed"),
            },
            WriteOp::Flush(ack) => {
                // Receiver may have given up waiting.
                let _ = ack.send(());
            }
        }
    }
    trace!("trust registry writer stopped");
}
