//! Download module for content collection.
//!
//! This module provides:
//! - The per-run aggregate and its records
//! - The fetch deadline
//! - Post and highlight collection
//! - Run orchestration (fetch, then persist)

pub mod deadline;
pub mod highlights;
pub mod pipeline;
pub mod posts;
pub mod run;
pub mod state;

pub use deadline::Deadline;
pub use highlights::collect_highlights;
pub use pipeline::{fetch_profile, FetchOptions, FetchOutcome, FetchReport};
pub use posts::collect_posts;
pub use run::{archive_profile, RunPhase, RunReport};
pub use state::{Aggregate, HighlightRecord, PostRecord, ProfileInfo};
