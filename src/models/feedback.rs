//! User feedback model.

use serde::{Deserialize, Serialize};

/// Free-form feedback entry stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// Document ID (UUID v4)
    pub id: String,
    /// Submitting user; None for anonymous feedback
    pub user_id: Option<String>,
    /// Feedback text
    pub feedback_text: String,
    /// Optional rating, 1-5
    pub rating: Option<u8>,
    /// When submitted (ISO 8601)
    pub created_at: String,
}
