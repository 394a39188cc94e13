//! Whole-run orchestration: fetch, then always persist.

use indicatif::ProgressBar;

use crate::api::ProfileFetcher;
use crate::config::Config;
use crate::download::pipeline::{fetch_profile, FetchOptions, FetchOutcome};
use crate::download::state::Aggregate;
use crate::error::Result;
use crate::fs::persist::{persist_aggregate, PersistReport};

/// Phases of a run.
///
/// `Init → Fetching → {Completed | TimedOut | Failed} → Persisted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Fetching,
    Completed,
    TimedOut,
    Failed,
    Persisted,
}

impl From<&FetchOutcome> for RunPhase {
    fn from(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Completed => RunPhase::Completed,
            FetchOutcome::TimedOut(_) => RunPhase::TimedOut,
            FetchOutcome::Failed(_) => RunPhase::Failed,
        }
    }
}

/// Result of a full run.
#[derive(Debug)]
pub struct RunReport {
    pub aggregate: Aggregate,
    pub outcome: FetchOutcome,
    /// The persistence pass, or why it could not write the profile folder.
    pub persisted: Result<PersistReport>,
    /// Phases passed through, in order.
    pub phases: Vec<RunPhase>,
}

impl RunReport {
    /// Whether the aggregate reached disk.
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Archive the configured profile.
///
/// The fetch outcome never prevents persistence. Output goes to the profile
/// folder named after the configured username. Only invalid options fail the
/// call; a persistence failure is reported in [`RunReport::persisted`] next to
/// the aggregate.
pub async fn archive_profile<F: ProfileFetcher + ?Sized>(
    fetcher: &F,
    config: &Config,
    progress: &ProgressBar,
) -> Result<RunReport> {
    let mut phases = vec![RunPhase::Init];

    let options = FetchOptions::from_config(config)?;
    let profile_dir = config.profile_directory()?;

    phases.push(RunPhase::Fetching);
    let report = fetch_profile(fetcher, &config.username, &options, progress).await;
    phases.push(RunPhase::from(&report.outcome));

    match &report.outcome {
        FetchOutcome::Completed => tracing::debug!("Fetch completed"),
        FetchOutcome::TimedOut(limit) => {
            tracing::debug!("Fetch stopped after {}s", limit.as_secs())
        }
        FetchOutcome::Failed(e) => tracing::debug!("Fetch failed: {}", e),
    }

    let persisted = persist_aggregate(&report.aggregate, &profile_dir, &options.staging_dir);
    match &persisted {
        Ok(_) => phases.push(RunPhase::Persisted),
        Err(e) => tracing::error!("Failed to save {}: {}", profile_dir.display(), e),
    }

    Ok(RunReport {
        aggregate: report.aggregate,
        outcome: report.outcome,
        persisted,
        phases,
    })
}
