//! Deadline-bounded fetch of one profile.

use std::path::PathBuf;
use std::time::Duration;

use indicatif::ProgressBar;

use crate::api::ProfileFetcher;
use crate::config::Config;
use crate::download::deadline::Deadline;
use crate::download::highlights::collect_highlights;
use crate::download::posts::collect_posts;
use crate::download::state::Aggregate;
use crate::error::{Error, Result};
use crate::fs::paths::ensure_dir;

/// Inputs of the fetch stage.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub staging_dir: PathBuf,
    pub include_highlights: bool,
}

impl FetchOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            timeout: config.timeout(),
            staging_dir: config.staging_directory()?,
            include_highlights: config.download_highlights,
        })
    }
}

/// How the fetch stage ended.
#[derive(Debug)]
pub enum FetchOutcome {
    Completed,
    TimedOut(Duration),
    Failed(Error),
}

impl FetchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FetchOutcome::Completed)
    }
}

impl std::fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchOutcome::Completed => write!(f, "completed"),
            FetchOutcome::TimedOut(_) => write!(f, "timed out"),
            FetchOutcome::Failed(_) => write!(f, "failed"),
        }
    }
}

/// The aggregate as it stood when fetching stopped, and why it stopped.
#[derive(Debug)]
pub struct FetchReport {
    pub aggregate: Aggregate,
    pub outcome: FetchOutcome,
}

/// Fetch profile metadata, posts and (optionally) highlights.
///
/// Never fails: errors and timeouts are reported in the outcome next to
/// whatever was collected before them.
pub async fn fetch_profile<F: ProfileFetcher + ?Sized>(
    fetcher: &F,
    username: &str,
    options: &FetchOptions,
    progress: &ProgressBar,
) -> FetchReport {
    let deadline = Deadline::after(options.timeout);
    let mut aggregate = Aggregate::placeholder(username);

    let outcome = match collect(fetcher, username, &mut aggregate, options, &deadline, progress)
        .await
    {
        Ok(()) => FetchOutcome::Completed,
        Err(Error::TimedOut(_)) => FetchOutcome::TimedOut(deadline.limit()),
        Err(e) => FetchOutcome::Failed(e),
    };

    tracing::debug!(
        "Fetch {} with {} posts and {} highlights",
        outcome,
        aggregate.post_count(),
        aggregate.highlight_count()
    );

    FetchReport { aggregate, outcome }
}

async fn collect<F: ProfileFetcher + ?Sized>(
    fetcher: &F,
    username: &str,
    aggregate: &mut Aggregate,
    options: &FetchOptions,
    deadline: &Deadline,
    progress: &ProgressBar,
) -> Result<()> {
    ensure_dir(&options.staging_dir)?;

    let profile = deadline.guard(fetcher.profile(username)).await??;
    aggregate.set_profile_info(profile.info.clone());

    collect_posts(
        fetcher,
        &profile,
        aggregate,
        &options.staging_dir,
        deadline,
        progress,
    )
    .await?;

    if options.include_highlights {
        collect_highlights(fetcher, &profile, aggregate, &options.staging_dir, deadline).await?;
    }

    Ok(())
}
