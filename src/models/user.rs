//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Learner proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    /// Parse from the wire string. Levels are validated as strings at the
    /// request boundary, so this only sees known values in practice.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Beginner" => Some(Self::Beginner),
            "Intermediate" => Some(Self::Intermediate),
            "Advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Daily learning goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoals {
    /// Words to interact with per day
    pub words_per_day: u32,
    /// Articles to read per day
    pub articles_per_day: u32,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            words_per_day: 10,
            articles_per_day: 1,
        }
    }
}

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID (UUID v4)
    pub id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address (unique across users)
    pub email: String,
    /// Argon2id password hash (PHC string)
    pub password_hash: String,
    /// Proficiency level
    pub proficiency_level: ProficiencyLevel,
    /// Language being learned
    pub learning_language: String,
    /// Daily goals
    #[serde(default)]
    pub goals: DailyGoals,
    /// Consecutive days of activity
    #[serde(default)]
    pub streak_days: u32,
    /// Article IDs the user has read
    #[serde(default)]
    pub read_articles: Vec<String>,
    /// Article IDs the user has uploaded
    #[serde(default)]
    pub uploaded_articles: Vec<String>,
    /// Current refresh token, if a session is active
    pub refresh_token: Option<String>,
    /// When the account was created (ISO 8601)
    pub created_at: String,
    /// Last profile update (ISO 8601)
    pub updated_at: String,
}
