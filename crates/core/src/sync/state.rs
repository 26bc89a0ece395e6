use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::watch;

use crate::errors::CoreError;
use crate::models::state::{FieldUpdate, FinanceState};

struct Inner {
    state: FinanceState,
    /// Bumped by [`StateStore::reset`]; snapshots tagged with an older
    /// generation belong to a finished session and are dropped.
    generation: u64,
    /// Whether the current session has seen its first full snapshot.
    loaded: bool,
}

/// In-memory snapshot of the signed-in user's collections.
///
/// Cloning yields another handle to the same snapshot. Every write bumps a
/// revision number that observers can await through [`StateStore::watch`].
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<RwLock<Inner>>,
    revision: Arc<watch::Sender<u64>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state: FinanceState::default(),
                generation: 0,
                loaded: false,
            })),
            revision: Arc::new(watch::channel(0).0),
        }
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> FinanceState {
        self.read(FinanceState::clone)
    }

    /// Run `f` against the current snapshot without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&FinanceState) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard.state)
    }

    /// Replace the whole snapshot and mark it loaded.
    pub fn replace(&self, state: FinanceState) {
        {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.state = state;
            inner.loaded = true;
        }
        self.bump();
    }

    /// Replace the snapshot only while `generation` is still current.
    ///
    /// Returns `false` (leaving the state alone) when a [`reset`](Self::reset)
    /// happened since the generation was handed out.
    pub fn replace_if_current(&self, generation: u64, state: FinanceState) -> bool {
        {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            if inner.generation != generation {
                return false;
            }
            inner.state = state;
            inner.loaded = true;
        }
        self.bump();
        true
    }

    /// Start a new generation with empty, not-yet-loaded collections.
    /// Returns the new generation.
    pub fn reset(&self) -> u64 {
        let generation = {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            inner.generation += 1;
            inner.state = FinanceState::default();
            inner.loaded = false;
            inner.generation
        };
        self.bump();
        generation
    }

    /// Replace one collection.
    pub fn apply(&self, update: FieldUpdate) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .apply(update);
        self.bump();
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
    }

    /// Wait up to `limit` for the first snapshot of the current generation.
    pub async fn wait_loaded(&self, limit: Duration) -> Result<(), CoreError> {
        let mut rx = self.watch();
        let result = match tokio::time::timeout(limit, rx.wait_for(|_| self.is_loaded())).await {
            Ok(Ok(_)) => Ok(()),
            _ => Err(CoreError::Sync("user data has not been loaded yet".into())),
        };
        result
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that wakes on every write.
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("StateStore")
            .field("accounts", &inner.state.accounts.len())
            .field("transactions", &inner.state.transactions.len())
            .field("budgets", &inner.state.budgets.len())
            .field("dreams", &inner.state.dreams.len())
            .field("generation", &inner.generation)
            .field("loaded", &inner.loaded)
            .field("revision", &self.revision())
            .finish()
    }
}
