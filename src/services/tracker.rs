// SPDX-License-Identifier: MIT

//! Interaction tracker - the counter core.
//!
//! Maintains exactly one `UserWord` record per (user, word) pair and
//! exposes the event operations on it. Every mutation is a Firestore
//! transaction on the composite-ID document; within this instance the
//! transactions for one pair are additionally serialized by a per-pair
//! mutex, so concurrent first-time events cannot race two creations and
//! no increment is lost.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{UserWord, Word};
use dashmap::DashMap;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Per-pair mutex map, shared across all tracker clones in this instance.
pub type PairLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Interaction record joined with its word's catalog entry.
#[derive(Debug, Serialize)]
pub struct TrackedWord {
    /// Composite record ID (usable with the admin update/delete endpoints)
    pub id: String,
    #[serde(flatten)]
    pub interaction: UserWord,
    /// Catalog entry; None when the reference dangles
    pub word: Option<Word>,
}

/// Partial fields for the administrative update flow.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionPatch {
    pub encountered_count: Option<u32>,
    pub checked_count: Option<u32>,
    pub marked_for_review: Option<bool>,
}

/// Tracker service over the document store.
#[derive(Clone)]
pub struct InteractionTracker {
    db: FirestoreDb,
    pair_locks: PairLocks,
    /// When true, encounter/check/review verify that the referenced user
    /// and word exist before writing.
    strict_references: bool,
}

impl InteractionTracker {
    pub fn new(db: FirestoreDb, pair_locks: PairLocks, strict_references: bool) -> Self {
        Self {
            db,
            pair_locks,
            strict_references,
        }
    }

    /// Record one encounter event for a pair.
    pub async fn record_encounter(
        &self,
        user_id: &str,
        word_id: &str,
    ) -> Result<UserWord, AppError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.mutate(user_id, word_id, move |record| record.apply_encounter(&now))
            .await
    }

    /// Record one meaning-check event for a pair.
    pub async fn record_check(&self, user_id: &str, word_id: &str) -> Result<UserWord, AppError> {
        self.mutate(user_id, word_id, |record| record.apply_check())
            .await
    }

    /// Flip the review flag for a pair.
    pub async fn toggle_review(&self, user_id: &str, word_id: &str) -> Result<UserWord, AppError> {
        self.mutate(user_id, word_id, |record| record.toggle_review())
            .await
    }

    /// Combined entry point: one encounter plus an optional explicit
    /// review-flag overwrite.
    pub async fn upsert_interaction(
        &self,
        user_id: &str,
        word_id: &str,
        marked_for_review: Option<bool>,
    ) -> Result<UserWord, AppError> {
        let now = chrono::Utc::now().to_rfc3339();
        self.mutate(user_id, word_id, move |record| {
            record.apply_upsert(marked_for_review, &now)
        })
        .await
    }

    /// All interaction records for a user, each joined with its word's
    /// catalog entry. An empty list is a valid outcome.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<TrackedWord>, AppError> {
        let interactions = self.db.list_interactions(user_id).await?;

        let db = self.db.clone();
        stream::iter(interactions)
            .map(|interaction| {
                let db = db.clone();
                async move {
                    let word = db.get_word(&interaction.word_id).await?;
                    Ok::<_, AppError>(TrackedWord {
                        id: UserWord::record_id(&interaction.user_id, &interaction.word_id),
                        interaction,
                        word,
                    })
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<TrackedWord, AppError>>>()
            .await
            .into_iter()
            .collect()
    }

    /// Administrative partial update by record ID. An ID that does not
    /// parse as a composite pair ID cannot name a record, so it is
    /// NotFound without a store round trip.
    pub async fn update(&self, record_id: &str, patch: InteractionPatch) -> Result<UserWord, AppError> {
        if UserWord::parse_record_id(record_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Interaction {} not found",
                record_id
            )));
        }

        let lock = self.pair_lock(record_id);
        let guard = lock.lock().await;
        let result = self.apply_patch(record_id, patch).await;
        drop(guard);
        drop(lock);
        self.release_pair_lock(record_id);
        result
    }

    /// Administrative delete by record ID.
    pub async fn delete(&self, record_id: &str) -> Result<(), AppError> {
        if UserWord::parse_record_id(record_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Interaction {} not found",
                record_id
            )));
        }

        let lock = self.pair_lock(record_id);
        let guard = lock.lock().await;
        let result = async {
            if self.db.get_interaction(record_id).await?.is_none() {
                return Err(AppError::NotFound(format!(
                    "Interaction {} not found",
                    record_id
                )));
            }
            self.db.delete_interaction(record_id).await
        }
        .await;
        drop(guard);
        drop(lock);
        self.release_pair_lock(record_id);
        result
    }

    async fn apply_patch(
        &self,
        record_id: &str,
        patch: InteractionPatch,
    ) -> Result<UserWord, AppError> {
        let mut record = self
            .db
            .get_interaction(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Interaction {} not found", record_id)))?;

        if let Some(encountered) = patch.encountered_count {
            record.encountered_count = encountered;
        }
        if let Some(checked) = patch.checked_count {
            record.checked_count = checked;
        }
        if let Some(flag) = patch.marked_for_review {
            record.marked_for_review = flag;
        }

        self.db.set_interaction(record_id, &record).await?;
        Ok(record)
    }

    /// Find-or-create the pair record and apply one event to it, holding
    /// the per-pair lock across the transaction.
    async fn mutate<F>(&self, user_id: &str, word_id: &str, mutate: F) -> Result<UserWord, AppError>
    where
        F: Fn(&mut UserWord),
    {
        if self.strict_references {
            self.check_references(user_id, word_id).await?;
        }

        let record_id = UserWord::record_id(user_id, word_id);
        let lock = self.pair_lock(&record_id);
        let guard = lock.lock().await;
        let result = self.db.mutate_interaction(user_id, word_id, mutate).await;
        drop(guard);
        drop(lock);
        self.release_pair_lock(&record_id);
        result
    }

    fn pair_lock(&self, record_id: &str) -> Arc<Mutex<()>> {
        self.pair_locks
            .entry(record_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Shed the map entry once no task holds or awaits the lock. The
    /// strong-count check runs under the shard lock, so a concurrent
    /// `pair_lock` clone keeps the entry alive.
    fn release_pair_lock(&self, record_id: &str) {
        self.pair_locks
            .remove_if(record_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    async fn check_references(&self, user_id: &str, word_id: &str) -> Result<(), AppError> {
        if self.db.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        if self.db.get_word(word_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Word {} not found", word_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UID: &str = "f3b9c2d4-0000-4000-8000-0123456789ab";

    fn offline_tracker() -> (InteractionTracker, PairLocks) {
        let locks: PairLocks = Arc::new(DashMap::new());
        let tracker = InteractionTracker::new(FirestoreDb::new_mock(), locks.clone(), false);
        (tracker, locks)
    }

    #[tokio::test]
    async fn test_pair_lock_entry_shed_when_idle() {
        let (tracker, locks) = offline_tracker();

        // Offline database: the mutation fails, but the lock entry must
        // still be released afterwards.
        let result = tracker.record_encounter(UID, "bonjour").await;
        assert!(result.is_err());
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_record_id() {
        let (tracker, locks) = offline_tracker();

        let err = tracker
            .update("not-a-composite", InteractionPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        // Rejected before any lock entry was created.
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_rejects_malformed_record_id() {
        let (tracker, locks) = offline_tracker();

        let err = tracker.delete("garbage").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_well_formed_id_reaches_store() {
        let (tracker, locks) = offline_tracker();

        // Well-formed composite ID passes the shape check and fails on
        // the offline store instead.
        let record_id = UserWord::record_id(UID, "bonjour");
        let err = tracker.delete(&record_id).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(locks.is_empty());
    }
}
