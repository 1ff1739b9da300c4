// SPDX-License-Identifier: MIT

//! Word catalog - lookup and lazy synthesis.
//!
//! Resolves a surface form to a catalog entry, case-insensitively. The
//! translation path falls back to the definition oracle on a miss and
//! persists the synthesized entry; the plain lookup path never
//! synthesizes.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{Meaning, Word};
use crate::services::oracle::DefinitionOracle;
use crate::services::tracker::InteractionTracker;

/// Result of a plain catalog lookup, with the best-effort check-count
/// side effect's outcome attached.
pub struct CatalogLookup {
    pub word: Word,
    /// Set when the dependent record_check call failed; the lookup itself
    /// still succeeded.
    pub check_warning: Option<String>,
}

/// Catalog service over the document store and the oracle.
#[derive(Clone)]
pub struct WordCatalog {
    db: FirestoreDb,
    oracle: DefinitionOracle,
    tracker: InteractionTracker,
}

impl WordCatalog {
    pub fn new(db: FirestoreDb, oracle: DefinitionOracle, tracker: InteractionTracker) -> Self {
        Self {
            db,
            oracle,
            tracker,
        }
    }

    /// Read-only lookup by surface form (case-insensitive exact match).
    ///
    /// When `user_id` is supplied, a check event is recorded for the pair
    /// as a best-effort side effect: a failure there is logged and
    /// surfaced as a warning, never as a lookup failure.
    pub async fn lookup(
        &self,
        surface: &str,
        user_id: Option<&str>,
    ) -> Result<CatalogLookup, AppError> {
        let key = Word::surface_key(surface);
        let word = self
            .db
            .get_word(&key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Word '{}' not found", surface)))?;

        let mut check_warning = None;
        if let Some(user_id) = user_id {
            if let Err(e) = self.tracker.record_check(user_id, &key).await {
                tracing::warn!(
                    user_id,
                    word_key = %key,
                    error = %e,
                    "Failed to record check for word lookup"
                );
                check_warning = Some(format!("check count not updated: {}", e));
            }
        }

        Ok(CatalogLookup {
            word,
            check_warning,
        })
    }

    /// Resolve a surface form, synthesizing a new entry from the oracle on
    /// a catalog miss.
    ///
    /// Returns the entry and whether this call created it. A lost creation
    /// race is treated as "entry now exists": the pre-existing entry is
    /// returned instead of failing the request.
    pub async fn fetch_or_synthesize(&self, surface: &str) -> Result<(Word, bool), AppError> {
        let key = Word::surface_key(surface);

        if let Some(existing) = self.db.get_word(&key).await? {
            return Ok((existing, false));
        }

        let payload = self.oracle.define_word(surface).await?;

        let word = Word {
            word: surface.trim().to_string(),
            word_key: key.clone(),
            meanings: payload
                .meanings
                .into_iter()
                .map(|m| Meaning {
                    definition: m.definition,
                    usage_example: m.usage_example,
                })
                .collect(),
            grammar_notes: payload.grammar_notes,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let (stored, created) = self.db.create_word_if_absent(&word).await?;
        if created {
            tracing::info!(word_key = %key, "Synthesized new catalog entry from oracle");
        } else {
            tracing::debug!(word_key = %key, "Lost creation race; returning existing entry");
        }

        Ok((stored, created))
    }
}
