//! Writing a collected aggregate to disk.
//!
//! Layout of the profile directory:
//!
//! ```text
//! <save_directory>/<username>/
//!   instagram_data.json
//!   profile_info.json
//!   posts/<shortcode>/{<asset>, post_data.json, caption.txt}
//!   highlights/<title>/{<assets>, highlight_data.json, caption.txt}
//! ```
//!
//! Per-item problems are logged and counted; only failing to create the
//! profile folder or to write `instagram_data.json` aborts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::download::state::{Aggregate, HighlightRecord, PostRecord};
use crate::error::{Error, Result};
use crate::fs::paths::{
    ensure_dir, highlight_dir, move_file, post_dir, write_file, HIGHLIGHTS_DIR, POSTS_DIR,
};
use crate::fs::sweep::{remove_if_empty, sweep_stray_assets};

pub const DATA_FILE: &str = "instagram_data.json";
pub const PROFILE_INFO_FILE: &str = "profile_info.json";
pub const POST_DATA_FILE: &str = "post_data.json";
pub const HIGHLIGHT_DATA_FILE: &str = "highlight_data.json";
pub const CAPTION_FILE: &str = "caption.txt";

/// What a persistence pass did.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub profile_dir: PathBuf,
    pub posts_written: usize,
    pub highlights_written: usize,
    pub assets_moved: usize,
    pub assets_missing: usize,
    pub strays_swept: usize,
    pub failures: usize,
}

/// Materialize `aggregate` into `profile_dir`, pulling assets from `staging_dir`.
///
/// The folder is chosen by the caller from the configured username, which
/// may differ in case from the one the service reports.
pub fn persist_aggregate(
    aggregate: &Aggregate,
    profile_dir: &Path,
    staging_dir: &Path,
) -> Result<PersistReport> {
    let profile_dir = profile_dir.to_path_buf();
    ensure_dir(&profile_dir)?;
    ensure_dir(&profile_dir.join(POSTS_DIR))?;
    ensure_dir(&profile_dir.join(HIGHLIGHTS_DIR))?;

    let mut report = PersistReport {
        profile_dir: profile_dir.clone(),
        ..Default::default()
    };

    // Assets swept by an earlier pass sit in the profile folder
    let sources = [staging_dir, profile_dir.as_path()];

    for post in &aggregate.posts {
        match persist_post(post, &profile_dir, &sources, &mut report) {
            Ok(()) => report.posts_written += 1,
            Err(e) => {
                tracing::warn!("Failed to save post {}: {}", post.shortcode, e);
                report.failures += 1;
            }
        }
    }

    for (title, items) in group_by_title(&aggregate.highlights) {
        match persist_highlight(title, &items, &profile_dir, &sources, &mut report) {
            Ok(()) => report.highlights_written += items.len(),
            Err(e) => {
                tracing::warn!("Failed to save highlight '{}': {}", title, e);
                report.failures += items.len();
            }
        }
    }

    write_json(&profile_dir.join(DATA_FILE), aggregate)?;
    if let Err(e) = write_json(&profile_dir.join(PROFILE_INFO_FILE), &aggregate.profile_info) {
        tracing::warn!("Failed to save profile info: {}", e);
        report.failures += 1;
    }

    match sweep_stray_assets(staging_dir, &profile_dir) {
        Ok(count) => report.strays_swept = count,
        Err(e) => {
            tracing::warn!("Failed to sweep {}: {}", staging_dir.display(), e);
            report.failures += 1;
        }
    }

    if staging_dir.starts_with(&profile_dir) {
        if let Err(e) = remove_if_empty(staging_dir) {
            tracing::debug!("Could not remove {}: {}", staging_dir.display(), e);
        }
    }

    tracing::info!(
        "Saved {} posts and {} highlights to {}",
        report.posts_written,
        report.highlights_written,
        profile_dir.display()
    );

    Ok(report)
}

fn persist_post(
    post: &PostRecord,
    profile_dir: &Path,
    sources: &[&Path],
    report: &mut PersistReport,
) -> Result<()> {
    let dir = post_dir(profile_dir, &post.shortcode)?;
    ensure_dir(&dir)?;

    relocate_asset(&post.asset, sources, &dir, report)?;
    write_json(&dir.join(POST_DATA_FILE), post)?;
    write_caption(&dir, post.caption.as_deref())?;

    Ok(())
}

fn persist_highlight(
    title: &str,
    items: &[&HighlightRecord],
    profile_dir: &Path,
    sources: &[&Path],
    report: &mut PersistReport,
) -> Result<()> {
    let dir = highlight_dir(profile_dir, title)?;
    ensure_dir(&dir)?;

    for item in items {
        relocate_asset(&item.asset, sources, &dir, report)?;
    }
    write_json(&dir.join(HIGHLIGHT_DATA_FILE), items)?;

    let captions: Vec<&str> = items
        .iter()
        .filter_map(|item| item.caption.as_deref())
        .filter(|c| !c.is_empty())
        .collect();
    let caption = captions.join("\n\n");
    write_caption(&dir, Some(caption.as_str()))?;

    Ok(())
}

/// Move an asset into `dest_dir` from the first source that has it.
fn relocate_asset(
    asset: &str,
    sources: &[&Path],
    dest_dir: &Path,
    report: &mut PersistReport,
) -> Result<()> {
    if Path::new(asset).file_name().and_then(|n| n.to_str()) != Some(asset) {
        return Err(Error::InvalidFilename(format!(
            "Asset name is not a plain file name: '{}'",
            asset
        )));
    }

    let target = dest_dir.join(asset);

    for source in sources {
        let candidate = source.join(asset);
        if candidate.is_file() {
            move_file(&candidate, &target)?;
            report.assets_moved += 1;
            return Ok(());
        }
    }

    if !target.is_file() {
        tracing::warn!("Asset {} not found, skipping", asset);
        report.assets_missing += 1;
    }

    Ok(())
}

/// Write the caption file, or remove a stale one when there is no caption.
fn write_caption(dir: &Path, caption: Option<&str>) -> Result<()> {
    let path = dir.join(CAPTION_FILE);
    match caption.filter(|c| !c.is_empty()) {
        Some(text) => write_file(&path, text),
        None => {
            if path.is_file() {
                fs::remove_file(&path)?;
            }
            Ok(())
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    write_file(path, content)
}

/// Group highlight items by title, in first-seen order.
fn group_by_title(records: &[HighlightRecord]) -> Vec<(&str, Vec<&HighlightRecord>)> {
    let mut groups: Vec<(&str, Vec<&HighlightRecord>)> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|(title, _)| *title == record.highlight_title)
        {
            Some((_, items)) => items.push(record),
            None => groups.push((record.highlight_title.as_str(), vec![record])),
        }
    }
    groups
}
