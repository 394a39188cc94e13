//! Post collection.

use std::path::Path;

use futures::StreamExt;
use indicatif::ProgressBar;

use crate::api::{Profile, ProfileFetcher};
use crate::download::deadline::Deadline;
use crate::download::state::{Aggregate, PostRecord};
use crate::error::{Error, Result};
use crate::fs::naming::asset_stem;
use crate::media::MediaKind;

/// Walk the post listing and download every supported image.
///
/// Records are appended to `aggregate` as soon as their asset is staged, so
/// an error or timeout part-way keeps everything before it.
pub async fn collect_posts<F: ProfileFetcher + ?Sized>(
    fetcher: &F,
    profile: &Profile,
    aggregate: &mut Aggregate,
    staging_dir: &Path,
    deadline: &Deadline,
    progress: &ProgressBar,
) -> Result<()> {
    tracing::info!("Downloading posts from {}", profile.info.username);

    let mut posts = fetcher.posts(profile);
    let mut skipped = 0u64;

    loop {
        deadline.check()?;

        let Some(entry) = deadline.guard(posts.next()).await? else {
            break;
        };
        let entry = entry?;

        let kind = MediaKind::from_typename(&entry.typename);
        if !kind.is_supported() {
            tracing::debug!("Skipping {} post {}", kind, entry.shortcode);
            skipped += 1;
            continue;
        }

        if aggregate.contains_post(&entry.shortcode) {
            tracing::warn!("Skipping repeated post {}", entry.shortcode);
            continue;
        }

        let filename = asset_stem(entry.date_utc);
        let staged = deadline
            .guard(fetcher.download_pic(&entry.url, &staging_dir.join(&filename), entry.date_utc))
            .await??;

        aggregate.push_post(PostRecord {
            shortcode: entry.shortcode,
            caption: entry.caption,
            date: entry.date_local,
            date_utc: entry.date_utc,
            likes: entry.likes,
            filename,
            asset: staged_asset_name(&staged)?,
        });

        progress.inc(1);
        progress.set_message(format!("{} posts collected", aggregate.post_count()));
    }

    tracing::info!(
        "Posts download complete: {} images ({} other posts skipped)",
        aggregate.post_count(),
        skipped
    );

    Ok(())
}

/// File name of a staged asset, checking it is really there.
pub(crate) fn staged_asset_name(staged: &Path) -> Result<String> {
    if !staged.is_file() {
        return Err(Error::Download(format!(
            "Downloaded file missing: {}",
            staged.display()
        )));
    }

    staged
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidFilename(format!("{}", staged.display())))
}
