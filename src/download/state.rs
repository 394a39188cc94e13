//! Collected records and the per-run aggregate.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Profile metadata snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followees: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mediacount: Option<u64>,
}

impl ProfileInfo {
    /// Stand-in used until the profile query succeeds.
    pub fn placeholder(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }
}

/// One downloaded post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub shortcode: String,
    pub caption: Option<String>,
    /// Local time of the post.
    pub date: DateTime<FixedOffset>,
    pub date_utc: DateTime<Utc>,
    pub likes: u64,
    /// Asset stem, `YYYY-MM-DD_HH-MM-SS_UTC`.
    pub filename: String,
    /// Staged asset file name (stem plus extension).
    pub asset: String,
}

/// One downloaded highlight item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRecord {
    pub highlight_title: String,
    pub caption: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub date_utc: DateTime<Utc>,
    pub filename: String,
    pub asset: String,
}

/// Everything collected for one profile in one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggregate {
    pub profile_info: ProfileInfo,
    #[serde(default)]
    pub posts: Vec<PostRecord>,
    #[serde(default)]
    pub highlights: Vec<HighlightRecord>,
    #[serde(skip)]
    shortcodes: HashSet<String>,
}

impl Aggregate {
    /// Create an empty aggregate for a resolved profile.
    pub fn new(profile_info: ProfileInfo) -> Self {
        Self {
            profile_info,
            ..Default::default()
        }
    }

    /// Create an aggregate holding only the username.
    pub fn placeholder(username: &str) -> Self {
        Self::new(ProfileInfo::placeholder(username))
    }

    /// Replace the profile snapshot, keeping collected records.
    pub fn set_profile_info(&mut self, profile_info: ProfileInfo) {
        self.profile_info = profile_info;
    }

    /// Check if a shortcode has already been collected.
    pub fn contains_post(&self, shortcode: &str) -> bool {
        self.shortcodes.contains(shortcode)
    }

    /// Append a post. Returns `false` (and drops it) for a repeated shortcode.
    pub fn push_post(&mut self, record: PostRecord) -> bool {
        if !self.shortcodes.insert(record.shortcode.clone()) {
            return false;
        }
        self.posts.push(record);
        true
    }

    /// Append a highlight item.
    pub fn push_highlight(&mut self, record: HighlightRecord) {
        self.highlights.push(record);
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn highlight_count(&self) -> usize {
        self.highlights.len()
    }

    pub fn username(&self) -> &str {
        &self.profile_info.username
    }
}
