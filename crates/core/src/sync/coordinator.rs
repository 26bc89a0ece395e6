use crate::errors::CoreError;
use crate::models::state::FieldUpdate;
use crate::remote::traits::Document;
use crate::storage::local::LocalAdapter;

use super::remote::RemoteSyncAdapter;
use super::selector::SyncMode;
use super::state::StateStore;

/// Where a session's writes go.
#[derive(Debug, Clone)]
pub enum SyncTarget {
    /// Merge into the user's remote document; state refreshes via the subscription.
    Remote {
        adapter: RemoteSyncAdapter,
        user_id: String,
    },
    /// Save to device storage and update state directly.
    Local { adapter: LocalAdapter },
}

/// The single funnel for every create/update/delete of a session.
///
/// In remote mode the in-memory state is left alone after a write and stays
/// stale until the subscription delivers the new snapshot. In local mode the
/// state is updated synchronously, since nothing else will notify it.
#[derive(Debug, Clone)]
pub struct MutationCoordinator {
    target: SyncTarget,
    state: StateStore,
}

impl MutationCoordinator {
    pub fn new(target: SyncTarget, state: StateStore) -> Self {
        Self { target, state }
    }

    pub fn mode(&self) -> SyncMode {
        match self.target {
            SyncTarget::Remote { .. } => SyncMode::Remote,
            SyncTarget::Local { .. } => SyncMode::Local,
        }
    }

    /// Replace one field with a new value in the active backend.
    pub async fn apply_change(&self, update: FieldUpdate) -> Result<(), CoreError> {
        self.apply_changes(vec![update]).await
    }

    /// Replace several fields as one logical change.
    ///
    /// Remote mode sends a single merge carrying every field, so the fields
    /// land together or not at all. Local mode saves each field in order and
    /// applies it to the in-memory state even when its save fails; the first
    /// save error is returned after all fields were attempted.
    pub async fn apply_changes(&self, updates: Vec<FieldUpdate>) -> Result<(), CoreError> {
        if updates.is_empty() {
            return Ok(());
        }
        match &self.target {
            SyncTarget::Remote { adapter, user_id } => {
                let mut fields = Document::new();
                for update in &updates {
                    fields.insert(update.field().as_str().to_string(), update.to_json()?);
                }
                adapter.merge(user_id, fields).await
            }
            SyncTarget::Local { adapter } => {
                let mut first_error = None;
                for update in updates {
                    let field = update.field();
                    let saved = match update.to_json() {
                        Ok(value) => adapter.save(field.as_str(), &value),
                        Err(e) => Err(e),
                    };
                    if let Err(e) = saved {
                        log::error!("saving '{field}' locally failed: {e}");
                        first_error.get_or_insert(e);
                    }
                    self.state.apply(update);
                }
                first_error.map_or(Ok(()), Err)
            }
        }
    }
}
