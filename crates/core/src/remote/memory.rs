use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::errors::CoreError;

use super::traits::{runtime, Document, DocumentStore, Listener, Snapshot};

/// Shared in-process document store with push notifications.
///
/// Clones share the same documents, so two sessions built on clones of one
/// store observe each other's writes the way two devices do against a real
/// backend.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<Mutex<HashMap<String, watch::Sender<Snapshot>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender for `doc_id`, created (empty) on first use.
    fn channel(&self, doc_id: &str) -> watch::Sender<Snapshot> {
        let mut documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        documents
            .entry(doc_id.to_string())
            .or_insert_with(|| watch::channel(None).0)
            .clone()
    }

    /// Current document, read synchronously.
    #[must_use]
    pub fn peek(&self, doc_id: &str) -> Snapshot {
        self.channel(doc_id).borrow().clone()
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("InMemoryDocumentStore")
            .field("documents", &count)
            .finish()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn get(&self, doc_id: &str) -> Result<Snapshot, CoreError> {
        Ok(self.peek(doc_id))
    }

    async fn set(&self, doc_id: &str, document: Document) -> Result<(), CoreError> {
        self.channel(doc_id).send_replace(Some(document));
        Ok(())
    }

    async fn merge(&self, doc_id: &str, fields: Document) -> Result<(), CoreError> {
        self.channel(doc_id).send_modify(|current| {
            let doc = current.get_or_insert_with(Document::new);
            for (key, value) in fields {
                doc.insert(key, value);
            }
        });
        Ok(())
    }

    fn listen(&self, doc_id: &str) -> Result<Listener, CoreError> {
        let handle = runtime()?;
        let mut changes = self.channel(doc_id).subscribe();
        let (tx, rx) = mpsc::unbounded_channel();

        let feed = handle.spawn(async move {
            let initial = changes.borrow_and_update().clone();
            if tx.send(Ok(initial)).is_err() {
                return;
            }
            while changes.changed().await.is_ok() {
                let snapshot = changes.borrow_and_update().clone();
                if tx.send(Ok(snapshot)).is_err() {
                    break;
                }
            }
        });

        Ok(Listener::new(rx, Some(feed)))
    }
}
