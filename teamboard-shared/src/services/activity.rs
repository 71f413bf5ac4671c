/// Activity recorder.
///
/// Writes the audit entry that follows every successful mutation. A failed
/// write is logged and swallowed: the mutation it describes has already
/// happened and stays in effect.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use super::ServiceResult;
use crate::models::activity_log::{ActivityAction, ActivityLogEntry, ActivityRecord, EntityType, NewActivity};
use crate::store::Store;

#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn Store>,
}

impl ActivityRecorder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Appends one entry; the entity type follows from the action
    ///
    /// Returns `None` when the store rejected the write.
    pub async fn record(
        &self,
        user_id: Uuid,
        action: ActivityAction,
        entity_id: Uuid,
        description: impl Into<String>,
    ) -> Option<ActivityLogEntry> {
        let entry = NewActivity {
            user_id,
            action: action.as_str().to_string(),
            entity_type: action.entity_type(),
            entity_id,
            description: description.into(),
        };

        match self.store.append_activity(entry).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!(
                    %user_id,
                    %entity_id,
                    action = action.as_str(),
                    error = %e,
                    "Failed to record activity"
                );
                None
            }
        }
    }

    /// Every entry, newest first
    pub async fn list_all(&self) -> ServiceResult<Vec<ActivityRecord>> {
        let entries = self.store.list_activity().await?;
        self.with_users(entries).await
    }

    /// One entity's entries, newest first
    pub async fn list_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> ServiceResult<Vec<ActivityRecord>> {
        let entries = self.store.list_activity_for(entity_type, entity_id).await?;
        self.with_users(entries).await
    }

    async fn with_users(&self, entries: Vec<ActivityLogEntry>) -> ServiceResult<Vec<ActivityRecord>> {
        let mut ids: Vec<Uuid> = entries.iter().map(|e| e.user_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<Uuid, _> = self
            .store
            .find_users(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| ActivityRecord {
                user: users.get(&entry.user_id).cloned(),
                entry,
            })
            .collect())
    }
}
