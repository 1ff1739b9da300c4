//! Article model for storage and API.

use serde::{Deserialize, Serialize};

/// Uploader tag used for curator-authored sample articles.
pub const CURATOR_TAG: &str = "curator";

/// Whether an article is a curated sample or user-submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleType {
    Sample,
    Custom,
}

impl ArticleType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sample" => Some(Self::Sample),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Article stored in Firestore.
///
/// Created in two phases: metadata first (content empty), then content is
/// attached by the matching uploader-class endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Document ID (UUID v4)
    pub id: String,
    /// Title
    pub title: String,
    /// Body text; empty until the phase-2 upload
    #[serde(default)]
    pub content: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Difficulty level ("Beginner" | "Intermediate" | "Advanced")
    pub difficulty_level: String,
    /// sample or custom
    pub article_type: ArticleType,
    /// Owning user; required when article_type is custom
    pub user_id: Option<String>,
    /// "curator" or a user ID
    pub uploaded_by: String,
    /// When the metadata was created (ISO 8601)
    pub created_at: String,
}

impl Article {
    /// Whether this article was authored by the curator.
    pub fn is_curator_authored(&self) -> bool {
        self.uploaded_by == CURATOR_TAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(uploaded_by: &str) -> Article {
        Article {
            id: "a8f0c2d4-0000-4000-8000-0123456789ab".to_string(),
            title: "Une histoire".to_string(),
            content: String::new(),
            tags: vec![],
            difficulty_level: "Beginner".to_string(),
            article_type: ArticleType::Sample,
            user_id: None,
            uploaded_by: uploaded_by.to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_curator_authorship_by_tag() {
        assert!(article(CURATOR_TAG).is_curator_authored());
        assert!(!article("f3b9c2d4-0000-4000-8000-0123456789ab").is_curator_authored());
        // Exact match only.
        assert!(!article("Curator").is_curator_authored());
    }

    #[test]
    fn test_article_type_parse() {
        assert_eq!(ArticleType::parse("sample"), Some(ArticleType::Sample));
        assert_eq!(ArticleType::parse("custom"), Some(ArticleType::Custom));
        assert_eq!(ArticleType::parse("blog"), None);
    }
}
