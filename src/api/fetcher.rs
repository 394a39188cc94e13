//! Profile fetcher abstraction.
//!
//! The pipeline only talks to this trait; [`crate::api::InstagramClient`] is
//! the network implementation and tests plug in scripted fakes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use futures::stream::BoxStream;

use crate::download::state::ProfileInfo;
use crate::error::Result;

/// A resolved profile.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Numeric account ID used for paging queries.
    pub id: String,
    pub info: ProfileInfo,
    /// First page of posts, when the profile query already carried it.
    pub first_page: Option<PostPage>,
}

/// One page of the post listing.
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub entries: Vec<PostEntry>,
    /// Cursor for the next page; `None` on the last page.
    pub next_cursor: Option<String>,
}

/// A post as yielded by the listing.
#[derive(Debug, Clone)]
pub struct PostEntry {
    pub typename: String,
    pub shortcode: String,
    pub caption: Option<String>,
    pub date_local: DateTime<FixedOffset>,
    pub date_utc: DateTime<Utc>,
    pub likes: u64,
    pub url: String,
}

/// A highlight reel and its items.
#[derive(Debug, Clone)]
pub struct Highlight {
    pub title: String,
    pub items: Vec<StoryEntry>,
}

/// A single item inside a highlight reel.
#[derive(Debug, Clone)]
pub struct StoryEntry {
    pub typename: String,
    pub caption: Option<String>,
    pub date_local: DateTime<FixedOffset>,
    pub date_utc: DateTime<Utc>,
    pub url: String,
}

/// Source of profile data and assets.
///
/// Operations that need a logged-in session fail with
/// [`crate::Error::LoginRequired`].
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Resolve a profile by username.
    async fn profile(&self, username: &str) -> Result<Profile>;

    /// Lazily list the profile's posts, newest first.
    fn posts<'a>(&'a self, profile: &'a Profile) -> BoxStream<'a, Result<PostEntry>>;

    /// List the profile's highlight reels with their items.
    async fn highlights(&self, profile: &Profile) -> Result<Vec<Highlight>>;

    /// Download an image to `target` plus an extension, stamping `mtime`.
    ///
    /// Returns the path of the written file.
    async fn download_pic(&self, url: &str, target: &Path, mtime: DateTime<Utc>)
        -> Result<PathBuf>;
}
