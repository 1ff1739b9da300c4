// SPDX-License-Identifier: MIT

//! Progress aggregator.
//!
//! Pure read/reduce over User + UserWord: no stored state of its own,
//! recomputed on every call. The goal arithmetic lives in free functions
//! that take "today" as an argument so it stays deterministic under test.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{DailyGoals, User, UserWord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Word-side progress numbers.
#[derive(Debug, Serialize)]
pub struct WordProgress {
    /// Distinct words the user has interacted with
    pub words_interacted: u32,
    /// Words encountered today (UTC)
    pub words_today: u32,
    /// Words currently flagged for review
    pub marked_for_review: u32,
    /// Sum of encounter counters
    pub total_encounters: u32,
    /// Sum of check counters
    pub total_checks: u32,
    pub words_per_day: u32,
    pub words_remaining_today: u32,
    pub word_goal_completed: bool,
}

/// Article-side progress numbers.
#[derive(Debug, Serialize)]
pub struct ArticleProgress {
    pub articles_read: u32,
    pub articles_uploaded: u32,
    pub articles_per_day: u32,
    pub articles_remaining_today: u32,
    pub article_goal_completed: bool,
}

/// Combined summary for the top-level progress endpoint.
#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub user_id: String,
    pub streak_days: u32,
    pub words: WordProgress,
    pub articles: ArticleProgress,
}

/// Reduce interaction records into word-side progress.
pub fn word_progress(goals: &DailyGoals, interactions: &[UserWord], today: NaiveDate) -> WordProgress {
    let words_today = interactions
        .iter()
        .filter(|record| encountered_on(record, today))
        .count() as u32;

    WordProgress {
        words_interacted: interactions.len() as u32,
        words_today,
        marked_for_review: interactions.iter().filter(|r| r.marked_for_review).count() as u32,
        total_encounters: interactions.iter().map(|r| r.encountered_count).sum(),
        total_checks: interactions.iter().map(|r| r.checked_count).sum(),
        words_per_day: goals.words_per_day,
        words_remaining_today: goals.words_per_day.saturating_sub(words_today),
        word_goal_completed: words_today >= goals.words_per_day,
    }
}

/// Reduce the user's article reference lists into article-side progress.
pub fn article_progress(goals: &DailyGoals, user: &User) -> ArticleProgress {
    let articles_read = user.read_articles.len() as u32;

    ArticleProgress {
        articles_read,
        articles_uploaded: user.uploaded_articles.len() as u32,
        articles_per_day: goals.articles_per_day,
        articles_remaining_today: goals.articles_per_day.saturating_sub(articles_read),
        article_goal_completed: articles_read >= goals.articles_per_day,
    }
}

fn encountered_on(record: &UserWord, day: NaiveDate) -> bool {
    DateTime::parse_from_rfc3339(&record.last_encountered_at)
        .map(|dt| dt.with_timezone(&Utc).date_naive() == day)
        .unwrap_or(false)
}

/// Progress service over the document store.
#[derive(Clone)]
pub struct ProgressService {
    db: FirestoreDb,
}

impl ProgressService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Full summary for a user. Unknown user is NotFound.
    pub async fn summary(&self, user_id: &str) -> Result<ProgressSummary, AppError> {
        let user = self.require_user(user_id).await?;
        let interactions = self.db.list_interactions(user_id).await?;
        let today = Utc::now().date_naive();

        Ok(ProgressSummary {
            user_id: user.id.clone(),
            streak_days: user.streak_days,
            words: word_progress(&user.goals, &interactions, today),
            articles: article_progress(&user.goals, &user),
        })
    }

    /// Word-side detail.
    pub async fn word_detail(&self, user_id: &str) -> Result<WordProgress, AppError> {
        let user = self.require_user(user_id).await?;
        let interactions = self.db.list_interactions(user_id).await?;
        Ok(word_progress(
            &user.goals,
            &interactions,
            Utc::now().date_naive(),
        ))
    }

    /// Article-side detail.
    pub async fn article_detail(&self, user_id: &str) -> Result<ArticleProgress, AppError> {
        let user = self.require_user(user_id).await?;
        Ok(article_progress(&user.goals, &user))
    }

    async fn require_user(&self, user_id: &str) -> Result<User, AppError> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProficiencyLevel;

    fn goals(words: u32, articles: u32) -> DailyGoals {
        DailyGoals {
            words_per_day: words,
            articles_per_day: articles,
        }
    }

    fn make_user(read: usize, uploaded: usize) -> User {
        User {
            id: "f3b9c2d4-0000-4000-8000-0123456789ab".to_string(),
            first_name: "Test".to_string(),
            last_name: "Learner".to_string(),
            email: "learner@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            proficiency_level: ProficiencyLevel::Beginner,
            learning_language: "French".to_string(),
            goals: goals(10, 1),
            streak_days: 3,
            read_articles: (0..read).map(|i| format!("article-{}", i)).collect(),
            uploaded_articles: (0..uploaded).map(|i| format!("upload-{}", i)).collect(),
            refresh_token: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn make_interaction(encountered: u32, checked: u32, review: bool, at: &str) -> UserWord {
        UserWord {
            user_id: "f3b9c2d4-0000-4000-8000-0123456789ab".to_string(),
            word_id: "bonjour".to_string(),
            encountered_count: encountered,
            checked_count: checked,
            marked_for_review: review,
            last_encountered_at: at.to_string(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_article_goal_not_met() {
        let user = make_user(0, 0);
        let progress = article_progress(&goals(10, 1), &user);

        assert_eq!(progress.articles_remaining_today, 1);
        assert!(!progress.article_goal_completed);
    }

    #[test]
    fn test_article_goal_met_after_one_read() {
        let user = make_user(1, 0);
        let progress = article_progress(&goals(10, 1), &user);

        assert_eq!(progress.articles_read, 1);
        assert_eq!(progress.articles_remaining_today, 0);
        assert!(progress.article_goal_completed);
    }

    #[test]
    fn test_remaining_never_negative() {
        let user = make_user(5, 2);
        let progress = article_progress(&goals(10, 1), &user);

        assert_eq!(progress.articles_remaining_today, 0);
        assert!(progress.article_goal_completed);
    }

    #[test]
    fn test_word_progress_counts_today_only() {
        let interactions = vec![
            make_interaction(3, 1, true, "2024-03-01T08:00:00Z"),
            make_interaction(1, 0, false, "2024-03-01T22:30:00Z"),
            make_interaction(7, 2, false, "2024-02-28T10:00:00Z"),
        ];

        let progress = word_progress(&goals(2, 1), &interactions, day("2024-03-01"));

        assert_eq!(progress.words_interacted, 3);
        assert_eq!(progress.words_today, 2);
        assert_eq!(progress.marked_for_review, 1);
        assert_eq!(progress.total_encounters, 11);
        assert_eq!(progress.total_checks, 3);
        assert_eq!(progress.words_remaining_today, 0);
        assert!(progress.word_goal_completed);
    }

    #[test]
    fn test_word_progress_empty_is_valid() {
        let progress = word_progress(&goals(10, 1), &[], day("2024-03-01"));

        assert_eq!(progress.words_interacted, 0);
        assert_eq!(progress.words_remaining_today, 10);
        assert!(!progress.word_goal_completed);
    }

    #[test]
    fn test_unparsable_timestamp_not_counted_today() {
        let interactions = vec![make_interaction(1, 0, false, "not-a-date")];
        let progress = word_progress(&goals(1, 1), &interactions, day("2024-03-01"));

        assert_eq!(progress.words_today, 0);
        assert_eq!(progress.words_interacted, 1);
    }
}
