//! Highlight collection.

use std::path::Path;

use crate::api::{Profile, ProfileFetcher};
use crate::download::deadline::Deadline;
use crate::download::posts::staged_asset_name;
use crate::download::state::{Aggregate, HighlightRecord};
use crate::error::{Error, Result};
use crate::fs::naming::highlight_asset_stem;
use crate::media::MediaKind;

/// Download image items of every highlight reel.
///
/// A login requirement skips highlights entirely and is not an error.
pub async fn collect_highlights<F: ProfileFetcher + ?Sized>(
    fetcher: &F,
    profile: &Profile,
    aggregate: &mut Aggregate,
    staging_dir: &Path,
    deadline: &Deadline,
) -> Result<()> {
    tracing::info!("Downloading highlights from {}", profile.info.username);

    let highlights = match deadline.guard(fetcher.highlights(profile)).await? {
        Ok(highlights) => highlights,
        Err(Error::LoginRequired(_)) => {
            tracing::warn!("Login required for highlights. Skipping highlights download.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for highlight in highlights {
        for item in highlight.items {
            deadline.check()?;

            if !MediaKind::from_typename(&item.typename).is_supported() {
                continue;
            }

            let filename = highlight_asset_stem(item.date_utc);
            let staged = deadline
                .guard(fetcher.download_pic(&item.url, &staging_dir.join(&filename), item.date_utc))
                .await??;

            aggregate.push_highlight(HighlightRecord {
                highlight_title: highlight.title.clone(),
                caption: item.caption,
                date: item.date_local,
                date_utc: item.date_utc,
                filename,
                asset: staged_asset_name(&staged)?,
            });
        }
    }

    tracing::info!(
        "Highlights download complete: {} items",
        aggregate.highlight_count()
    );

    Ok(())
}
