// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod article;
pub mod feedback;
pub mod user;
pub mod user_word;
pub mod word;

pub use article::{Article, ArticleType, CURATOR_TAG};
pub use feedback::Feedback;
pub use user::{DailyGoals, ProficiencyLevel, User};
pub use user_word::UserWord;
pub use word::{Meaning, Word};
