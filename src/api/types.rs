//! API response type definitions.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;

use crate::api::fetcher::{PostEntry, PostPage, StoryEntry};
use crate::download::state::ProfileInfo;
use crate::error::{Error, Result};

/// Generic response wrapper shared by the web and GraphQL endpoints.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub require_login: bool,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, mapping failure envelopes to errors.
    pub fn into_data(self, what: &str) -> Result<T> {
        let message = self.message.unwrap_or_default();
        if self.require_login
            || message.contains("login")
            || message.contains("checkpoint_required")
        {
            return Err(Error::LoginRequired(what.to_string()));
        }

        if self.status.as_deref().is_some_and(|s| s != "ok") {
            return Err(Error::Api(format!(
                "Failed to get {}: {}",
                what,
                if message.is_empty() { "status fail" } else { &message }
            )));
        }

        self.data
            .ok_or_else(|| Error::Api(format!("Failed to get {}: empty response", what)))
    }
}

/// `{"user": ...}` payload.
#[derive(Debug, Deserialize)]
pub struct UserData<T> {
    pub user: Option<T>,
}

/// Profile returned by `web_profile_info`.
#[derive(Debug, Deserialize)]
pub struct WebProfileUser {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    #[serde(default)]
    pub edge_followed_by: Count,
    #[serde(default)]
    pub edge_follow: Count,
    pub edge_owner_to_timeline_media: Option<MediaConnection>,
}

impl WebProfileUser {
    pub fn profile_info(&self) -> ProfileInfo {
        ProfileInfo {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            biography: self.biography.clone(),
            followers: Some(self.edge_followed_by.count),
            followees: Some(self.edge_follow.count),
            mediacount: self
                .edge_owner_to_timeline_media
                .as_ref()
                .map(|m| m.count),
        }
    }
}

/// Paging query payload.
#[derive(Debug, Deserialize)]
pub struct TimelineUser {
    pub edge_owner_to_timeline_media: MediaConnection,
}

/// Counter object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Count {
    #[serde(default)]
    pub count: u64,
}

/// Generic GraphQL edge list.
#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

/// GraphQL edge.
#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// Timeline media listing.
#[derive(Debug, Deserialize)]
pub struct MediaConnection {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<MediaNode>>,
}

impl MediaConnection {
    /// Convert into a page of entries.
    pub fn into_page(self) -> Result<PostPage> {
        let next_cursor = if self.page_info.has_next_page {
            self.page_info.end_cursor
        } else {
            None
        };

        let entries = self
            .edges
            .into_iter()
            .map(|edge| edge.node.into_entry())
            .collect::<Result<Vec<_>>>()?;

        Ok(PostPage {
            entries,
            next_cursor,
        })
    }
}

/// Paging information.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Caption node.
#[derive(Debug, Deserialize)]
pub struct CaptionNode {
    pub text: String,
}

/// A timeline post.
#[derive(Debug, Deserialize)]
pub struct MediaNode {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub shortcode: String,
    pub display_url: String,
    pub taken_at_timestamp: i64,
    #[serde(default)]
    pub edge_media_to_caption: Connection<CaptionNode>,
    pub edge_liked_by: Option<Count>,
    pub edge_media_preview_like: Option<Count>,
}

impl MediaNode {
    pub fn into_entry(self) -> Result<PostEntry> {
        let date_utc = timestamp_to_utc(self.taken_at_timestamp)?;
        let likes = self
            .edge_liked_by
            .or(self.edge_media_preview_like)
            .map(|c| c.count)
            .unwrap_or(0);

        Ok(PostEntry {
            typename: self.typename,
            shortcode: self.shortcode,
            caption: first_caption(self.edge_media_to_caption),
            date_local: date_utc.with_timezone(&Local).fixed_offset(),
            date_utc,
            likes,
            url: self.display_url,
        })
    }
}

/// Highlight reel listing payload.
#[derive(Debug, Deserialize)]
pub struct HighlightReelsUser {
    #[serde(default)]
    pub edge_highlight_reels: Connection<HighlightReelNode>,
}

/// A highlight reel header.
#[derive(Debug, Deserialize)]
pub struct HighlightReelNode {
    pub id: String,
    pub title: String,
}

/// Reel items payload.
#[derive(Debug, Deserialize)]
pub struct ReelsMediaData {
    #[serde(default)]
    pub reels_media: Vec<ReelMedia>,
}

/// Items of one reel.
#[derive(Debug, Deserialize)]
pub struct ReelMedia {
    pub id: String,
    #[serde(default)]
    pub items: Vec<StoryItemNode>,
}

/// A story item inside a reel.
#[derive(Debug, Deserialize)]
pub struct StoryItemNode {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub display_url: String,
    pub taken_at_timestamp: i64,
    #[serde(default)]
    pub edge_media_to_caption: Connection<CaptionNode>,
}

impl StoryItemNode {
    pub fn into_entry(self) -> Result<StoryEntry> {
        let date_utc = timestamp_to_utc(self.taken_at_timestamp)?;
        Ok(StoryEntry {
            typename: self.typename,
            caption: first_caption(self.edge_media_to_caption),
            date_local: date_utc.with_timezone(&Local).fixed_offset(),
            date_utc,
            url: self.display_url,
        })
    }
}

fn first_caption(captions: Connection<CaptionNode>) -> Option<String> {
    captions.edges.into_iter().next().map(|edge| edge.node.text)
}

fn timestamp_to_utc(seconds: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| Error::Api(format!("Invalid timestamp: {}", seconds)))
}
