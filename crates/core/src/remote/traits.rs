use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::errors::CoreError;

/// A stored document: top-level field name → JSON value.
pub type Document = Map<String, Value>;

/// One observation of a document. `None` means the document does not exist.
pub type Snapshot = Option<Document>;

/// Live feed of snapshots for one document, produced by [`DocumentStore::listen`].
///
/// Delivers the current snapshot first, then one snapshot per observed change.
/// Rapid successive writes may be coalesced into a single snapshot. Dropping
/// the listener stops the background feed.
pub struct Listener {
    events: mpsc::UnboundedReceiver<Result<Snapshot, CoreError>>,
    feed: Option<JoinHandle<()>>,
}

impl Listener {
    pub fn new(
        events: mpsc::UnboundedReceiver<Result<Snapshot, CoreError>>,
        feed: Option<JoinHandle<()>>,
    ) -> Self {
        Self { events, feed }
    }

    /// Next snapshot, or `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<Result<Snapshot, CoreError>> {
        self.events.recv().await
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.abort();
        }
    }
}

/// Per-user document storage with change notification.
///
/// Implemented by the in-process [`InMemoryDocumentStore`](super::memory::InMemoryDocumentStore)
/// and the Firestore REST client. Everything above this trait is backend-agnostic.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Read a document.
    async fn get(&self, doc_id: &str) -> Result<Snapshot, CoreError>;

    /// Create or fully replace a document.
    async fn set(&self, doc_id: &str, document: Document) -> Result<(), CoreError>;

    /// Write only the given top-level fields; other fields are left untouched.
    /// Creates the document if it does not exist.
    async fn merge(&self, doc_id: &str, fields: Document) -> Result<(), CoreError>;

    /// Start observing a document. Must be called inside a tokio runtime.
    fn listen(&self, doc_id: &str) -> Result<Listener, CoreError>;
}

/// Handle of the current tokio runtime, or a `Sync` error outside of one.
pub(crate) fn runtime() -> Result<tokio::runtime::Handle, CoreError> {
    tokio::runtime::Handle::try_current()
        .map_err(|_| CoreError::Sync("document listeners need a tokio runtime".into()))
}
