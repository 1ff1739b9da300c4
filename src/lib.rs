// SPDX-License-Identifier: MIT

//! Lingua-Track: language-learning backend API
//!
//! This crate provides the backend API for tracking a learner's word
//! interactions, serving the word catalog (with oracle-backed definition
//! synthesis), articles, feedback and progress summaries.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

use config::Config;
use db::FirestoreDb;
use services::{InteractionTracker, ProgressService, WordCatalog};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub tracker: InteractionTracker,
    pub catalog: WordCatalog,
    pub progress: ProgressService,
}
