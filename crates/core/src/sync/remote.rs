use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::errors::CoreError;
use crate::models::state::FinanceState;
use crate::remote::traits::{runtime, Document, DocumentStore};

/// Keeps the session in step with the user's remote document.
///
/// Writes go out as merges; the session learns about them (and about writes
/// from other devices) only through its subscription.
#[derive(Clone)]
pub struct RemoteSyncAdapter {
    store: Arc<dyn DocumentStore>,
}

impl RemoteSyncAdapter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Observe the user's document, calling `on_change` with the decoded state
    /// on the initial load and after every change.
    ///
    /// A missing document is initialized once with seed data; the resulting
    /// write then arrives through the subscription like any other change. A
    /// failed seed write is retried on the next absent snapshot.
    /// Listener errors are logged and the subscription keeps running.
    pub fn subscribe<F>(&self, user_id: &str, on_change: F) -> Result<Subscription, CoreError>
    where
        F: Fn(FinanceState) + Send + 'static,
    {
        let handle = runtime()?;
        let mut listener = self.store.listen(user_id)?;
        let store = Arc::clone(&self.store);
        let user_id = user_id.to_string();

        let task = handle.spawn(async move {
            let mut seeded = false;
            while let Some(event) = listener.next().await {
                match event {
                    Ok(Some(doc)) => on_change(FinanceState::from_document(&doc)),
                    Ok(None) if !seeded => {
                        seeded = true;
                        log::info!("no document for user {user_id}, writing seed data");
                        if let Err(e) = seed_document(store.as_ref(), &user_id).await {
                            log::error!("seeding document for user {user_id} failed: {e}");
                            seeded = false;
                        }
                    }
                    Ok(None) => log::debug!("document for user {user_id} still absent"),
                    Err(e) => log::error!("subscription error for user {user_id}: {e}"),
                }
            }
            log::debug!("subscription feed for user {user_id} ended");
        });

        Ok(Subscription { task: Some(task) })
    }

    /// Write only `fields` into the user's document.
    ///
    /// Failures are logged here and returned; the UI path is free to ignore them.
    pub async fn merge(&self, user_id: &str, fields: Document) -> Result<(), CoreError> {
        let names: Vec<String> = fields.keys().cloned().collect();
        match self.store.merge(user_id, fields).await {
            Ok(()) => {
                log::debug!("merged {names:?} for user {user_id}");
                Ok(())
            }
            Err(e) => {
                log::error!("merge of {names:?} for user {user_id} failed: {e}");
                Err(e)
            }
        }
    }
}

async fn seed_document(store: &dyn DocumentStore, user_id: &str) -> Result<(), CoreError> {
    let doc = FinanceState::seed().to_document()?;
    store.set(user_id, doc).await
}

impl std::fmt::Debug for RemoteSyncAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSyncAdapter")
            .field("store", &self.store.name())
            .finish()
    }
}

/// Live subscription to a user document. Dropping it also unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}
