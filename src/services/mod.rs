// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod catalog;
pub mod oracle;
pub mod progress;
pub mod tracker;

pub use catalog::{CatalogLookup, WordCatalog};
pub use oracle::DefinitionOracle;
pub use progress::ProgressService;
pub use tracker::{InteractionPatch, InteractionTracker, PairLocks, TrackedWord};
