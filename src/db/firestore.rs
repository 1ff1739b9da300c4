// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles, goals, article reference lists)
//! - Words (canonical dictionary entries, keyed by surface form)
//! - UserWords (interaction counters, keyed by `{user_id}_{word_key}`)
//! - Articles and Feedback

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Article, Feedback, User, UserWord, Word};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;
// Transaction attempts for contended interaction counters.
const MAX_TXN_ATTEMPTS: usize = 3;

/// Document ID for a word: url-encoded lowercase surface key.
fn word_doc_id(word_key: &str) -> String {
    urlencoding::encode(word_key).into_owned()
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email (unique across users).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user and all interaction records that reference them.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        // 1. Delete all interaction records for the user
        let interactions = self.list_interactions(user_id).await?;
        let count = interactions.len();
        self.batch_delete(&interactions, collections::USER_WORDS, |record: &UserWord| {
            UserWord::record_id(&record.user_id, &record.word_id)
        })
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted interaction records");

        // 2. Delete the user profile
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        deleted_count += 1;

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }

    // ─── Word Operations ─────────────────────────────────────────

    /// Get a word by its lowercase surface key (single point read).
    pub async fn get_word(&self, word_key: &str) -> Result<Option<Word>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORDS)
            .obj()
            .one(&word_doc_id(word_key))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all words.
    pub async fn list_words(&self) -> Result<Vec<Word>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORDS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or overwrite a word entry.
    pub async fn upsert_word(&self, word: &Word) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WORDS)
            .document_id(&word_doc_id(&word.word_key))
            .object(word)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Insert a word only if no entry exists for its surface key.
    ///
    /// Returns the stored word and `true` if this call created it, or the
    /// pre-existing entry and `false` if another writer got there first.
    /// The read and write run in one transaction so two concurrent misses
    /// for the same unseen word converge on a single entry.
    pub async fn create_word_if_absent(&self, word: &Word) -> Result<(Word, bool), AppError> {
        let doc_id = word_doc_id(&word.word_key);
        let mut last_err = None;

        for _attempt in 0..MAX_TXN_ATTEMPTS {
            let mut transaction = self
                .get_client()?
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            let existing: Option<Word> = self
                .get_client()?
                .fluent()
                .select()
                .by_id_in(collections::WORDS)
                .obj()
                .one(&doc_id)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            if let Some(found) = existing {
                let _ = transaction.rollback().await;
                return Ok((found, false));
            }

            self.get_client()?
                .fluent()
                .update()
                .in_col(collections::WORDS)
                .document_id(&doc_id)
                .object(word)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add word to transaction: {}", e))
                })?;

            match transaction.commit().await {
                Ok(_) => return Ok((word.clone(), true)),
                Err(e) => {
                    tracing::debug!(word_key = %word.word_key, error = %e, "Word insert conflict, retrying");
                    last_err = Some(e);
                }
            }
        }

        Err(AppError::Database(format!(
            "Word insert transaction failed: {}",
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Delete a word by surface key.
    pub async fn delete_word(&self, word_key: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WORDS)
            .document_id(&word_doc_id(word_key))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── UserWord Operations ─────────────────────────────────────

    /// Get an interaction record by composite ID.
    pub async fn get_interaction(&self, record_id: &str) -> Result<Option<UserWord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_WORDS)
            .obj()
            .one(record_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All interaction records for one user.
    pub async fn list_interactions(&self, user_id: &str) -> Result<Vec<UserWord>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USER_WORDS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically find-or-create the interaction record for a pair and
    /// apply `mutate` to it.
    ///
    /// The read and write run in one Firestore transaction on the composite
    /// document, with a bounded conflict-retry loop, so the persisted state
    /// reflects every applied event even under concurrent writers.
    pub async fn mutate_interaction<F>(
        &self,
        user_id: &str,
        word_id: &str,
        mutate: F,
    ) -> Result<UserWord, AppError>
    where
        F: Fn(&mut UserWord),
    {
        let record_id = UserWord::record_id(user_id, word_id);
        let mut last_err = None;

        for _attempt in 0..MAX_TXN_ATTEMPTS {
            let mut transaction = self
                .get_client()?
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            let existing: Option<UserWord> = self
                .get_client()?
                .fluent()
                .select()
                .by_id_in(collections::USER_WORDS)
                .obj()
                .one(&record_id)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            let now = chrono::Utc::now().to_rfc3339();
            let mut record = existing.unwrap_or_else(|| UserWord::new(user_id, word_id, &now));
            mutate(&mut record);

            self.get_client()?
                .fluent()
                .update()
                .in_col(collections::USER_WORDS)
                .document_id(&record_id)
                .object(&record)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add interaction to transaction: {}", e))
                })?;

            match transaction.commit().await {
                Ok(_) => return Ok(record),
                Err(e) => {
                    tracing::debug!(
                        record_id = %record_id,
                        error = %e,
                        "Interaction transaction conflict, retrying"
                    );
                    last_err = Some(e);
                }
            }
        }

        Err(AppError::Database(format!(
            "Interaction transaction failed after {} attempts: {}",
            MAX_TXN_ATTEMPTS,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Overwrite an interaction record (admin correction flow).
    pub async fn set_interaction(
        &self,
        record_id: &str,
        record: &UserWord,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USER_WORDS)
            .document_id(record_id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an interaction record by composite ID.
    pub async fn delete_interaction(&self, record_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USER_WORDS)
            .document_id(record_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Article Operations ──────────────────────────────────────

    /// Get an article by ID.
    pub async fn get_article(&self, article_id: &str) -> Result<Option<Article>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ARTICLES)
            .obj()
            .one(article_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List articles, optionally filtered by difficulty level.
    ///
    /// Tag-intersection filtering happens in memory at the route layer;
    /// article lists are small.
    pub async fn list_articles(
        &self,
        difficulty_level: Option<&str>,
    ) -> Result<Vec<Article>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ARTICLES);

        let query = if let Some(level) = difficulty_level {
            let level = level.to_string();
            query.filter(move |q| q.field("difficulty_level").eq(level.clone()))
        } else {
            query
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update an article.
    pub async fn upsert_article(&self, article: &Article) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ARTICLES)
            .document_id(&article.id)
            .object(article)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an article by ID.
    pub async fn delete_article(&self, article_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ARTICLES)
            .document_id(article_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Feedback Operations ─────────────────────────────────────

    /// Get a feedback entry by ID.
    pub async fn get_feedback(&self, feedback_id: &str) -> Result<Option<Feedback>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FEEDBACK)
            .obj()
            .one(feedback_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all feedback entries.
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FEEDBACK)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a feedback entry.
    pub async fn upsert_feedback(&self, feedback: &Feedback) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FEEDBACK)
            .document_id(&feedback.id)
            .object(feedback)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a feedback entry by ID.
    pub async fn delete_feedback(&self, feedback_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FEEDBACK)
            .document_id(feedback_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }
}
