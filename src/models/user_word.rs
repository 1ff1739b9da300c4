// SPDX-License-Identifier: MIT

//! Per-user word interaction record.
//!
//! Exactly one document exists per (user, word) pair. The document ID is
//! the composite `{user_id}_{word_key}`, so concurrent first-time events
//! converge on the same document instead of racing two inserts.
//!
//! All counter mutations are pure methods on the struct; the database
//! layer wraps them in a Firestore transaction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Interaction counters for one (user, word) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWord {
    /// Owning user (UUID string)
    pub user_id: String,
    /// Referenced word (lowercase surface key)
    pub word_id: String,
    /// Times the user has seen this word in content
    #[serde(default)]
    pub encountered_count: u32,
    /// Times the user has looked up the meaning
    #[serde(default)]
    pub checked_count: u32,
    /// Whether the user flagged the word for review
    #[serde(default)]
    pub marked_for_review: bool,
    /// Last encounter timestamp (ISO 8601)
    pub last_encountered_at: String,
}

impl UserWord {
    /// Fresh record with zeroed counters, ready for the first event.
    pub fn new(user_id: &str, word_id: &str, now: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            word_id: word_id.to_string(),
            encountered_count: 0,
            checked_count: 0,
            marked_for_review: false,
            last_encountered_at: now.to_string(),
        }
    }

    /// Composite document ID for a pair. The word key is url-encoded so the
    /// ID stays a valid Firestore document name for any surface form.
    pub fn record_id(user_id: &str, word_id: &str) -> String {
        format!("{}_{}", user_id, urlencoding::encode(word_id))
    }

    /// Split a composite record ID back into (user_id, word_id).
    ///
    /// The user portion is a fixed-width UUID, so the `_` after it is the
    /// separator regardless of what the word key contains.
    pub fn parse_record_id(id: &str) -> Option<(String, String)> {
        const UUID_LEN: usize = 36;
        if id.len() <= UUID_LEN + 1 {
            return None;
        }
        let (user_part, rest) = id.split_at(UUID_LEN);
        Uuid::parse_str(user_part).ok()?;
        let word_part = rest.strip_prefix('_')?;
        if word_part.is_empty() {
            return None;
        }
        let word = urlencoding::decode(word_part).ok()?;
        Some((user_part.to_string(), word.into_owned()))
    }

    /// Apply one encounter event: bump the counter and refresh the
    /// last-encountered timestamp.
    pub fn apply_encounter(&mut self, now: &str) {
        self.encountered_count = self.encountered_count.saturating_add(1);
        self.last_encountered_at = now.to_string();
    }

    /// Apply one meaning-check event. Does not touch the encounter
    /// timestamp.
    pub fn apply_check(&mut self) {
        self.checked_count = self.checked_count.saturating_add(1);
    }

    /// Flip the review flag.
    pub fn toggle_review(&mut self) {
        self.marked_for_review = !self.marked_for_review;
    }

    /// Combined upsert event: one encounter plus an optional explicit
    /// review-flag overwrite. Equivalent to `apply_encounter` followed by
    /// setting the flag when supplied.
    pub fn apply_upsert(&mut self, marked_for_review: Option<bool>, now: &str) {
        self.apply_encounter(now);
        if let Some(flag) = marked_for_review {
            self.marked_for_review = flag;
        }
    }
}
