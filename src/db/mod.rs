//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const WORDS: &str = "words";
    /// Interaction counters, keyed by `{user_id}_{word_key}`
    pub const USER_WORDS: &str = "user_words";
    pub const ARTICLES: &str = "articles";
    pub const FEEDBACK: &str = "feedback";
}
