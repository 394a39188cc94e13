//! Scripted `ProfileFetcher` for pipeline tests.

#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use tokio::time::sleep;

use instagram_archiver::api::{Highlight, PostEntry, Profile, ProfileFetcher, StoryEntry};
use instagram_archiver::download::ProfileInfo;
use instagram_archiver::fs::naming::partial_download_name;
use instagram_archiver::{Config, Error, Result};

pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, hour, minute, second)
        .unwrap()
}

pub fn post(shortcode: &str, date_utc: DateTime<Utc>, caption: Option<&str>) -> PostEntry {
    PostEntry {
        typename: "GraphImage".to_string(),
        shortcode: shortcode.to_string(),
        caption: caption.map(str::to_string),
        date_local: date_utc.fixed_offset(),
        date_utc,
        likes: 7,
        url: format!("https://cdn.example.com/{}.jpg", shortcode),
    }
}

pub fn video(shortcode: &str, date_utc: DateTime<Utc>) -> PostEntry {
    PostEntry {
        typename: "GraphVideo".to_string(),
        ..post(shortcode, date_utc, None)
    }
}

pub fn story(date_utc: DateTime<Utc>, caption: Option<&str>) -> StoryEntry {
    StoryEntry {
        typename: "GraphStoryImage".to_string(),
        caption: caption.map(str::to_string),
        date_local: date_utc.fixed_offset(),
        date_utc,
        url: format!("https://cdn.example.com/story/{}.jpg", date_utc.timestamp()),
    }
}

/// Configuration writing under `base`, with a separate staging folder.
pub fn config_for(username: &str, base: &Path, timeout: u64) -> Config {
    Config {
        username: username.to_string(),
        save_directory: Some(base.to_path_buf()),
        staging_directory: Some(base.join("staging")),
        timeout,
        ..Default::default()
    }
}

pub enum HighlightScript {
    LoginRequired,
    Reels(Vec<Highlight>),
}

pub struct FakeFetcher {
    username: String,
    reported_username: Option<String>,
    posts: Vec<PostEntry>,
    delay: Duration,
    download_delay: Duration,
    fail_after: Option<usize>,
    highlights: HighlightScript,
    downloads: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            reported_username: None,
            posts: Vec::new(),
            delay: Duration::ZERO,
            download_delay: Duration::ZERO,
            fail_after: None,
            highlights: HighlightScript::Reels(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_posts(mut self, posts: Vec<PostEntry>) -> Self {
        self.posts = posts;
        self
    }

    /// Sleep this long before yielding each post.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Report the profile under a different spelling of the username.
    pub fn reporting_username(mut self, username: &str) -> Self {
        self.reported_username = Some(username.to_string());
        self
    }

    /// Hold each download's partial file open this long before renaming it.
    pub fn with_download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = delay;
        self
    }

    /// Yield an error in place of the post at `index`.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_after = Some(index);
        self
    }

    pub fn with_highlights(mut self, highlights: HighlightScript) -> Self {
        self.highlights = highlights;
        self
    }

    /// URLs passed to `download_pic`, in call order.
    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileFetcher for FakeFetcher {
    async fn profile(&self, username: &str) -> Result<Profile> {
        if !username.eq_ignore_ascii_case(&self.username) {
            return Err(Error::ProfileNotFound(username.to_string()));
        }

        Ok(Profile {
            id: "1234".to_string(),
            info: ProfileInfo {
                username: self
                    .reported_username
                    .clone()
                    .unwrap_or_else(|| self.username.clone()),
                full_name: Some("Test User".to_string()),
                mediacount: Some(self.posts.len() as u64),
                ..Default::default()
            },
            first_page: None,
        })
    }

    fn posts<'a>(&'a self, _profile: &'a Profile) -> BoxStream<'a, Result<PostEntry>> {
        stream::unfold(0usize, move |index| async move {
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            if self.fail_after == Some(index) {
                return Some((Err(Error::Api("connection reset".to_string())), usize::MAX));
            }
            let entry = self.posts.get(index)?.clone();
            Some((Ok(entry), index + 1))
        })
        .boxed()
    }

    async fn highlights(&self, _profile: &Profile) -> Result<Vec<Highlight>> {
        match &self.highlights {
            HighlightScript::LoginRequired => Err(Error::LoginRequired("highlights".to_string())),
            HighlightScript::Reels(reels) => Ok(reels.clone()),
        }
    }

    async fn download_pic(
        &self,
        url: &str,
        target: &Path,
        _mtime: DateTime<Utc>,
    ) -> Result<PathBuf> {
        self.downloads.lock().unwrap().push(url.to_string());

        let mut name = OsString::from(target.as_os_str());
        name.push(".jpg");
        let path = PathBuf::from(name);

        if self.download_delay.is_zero() {
            std::fs::write(&path, url.as_bytes())?;
            return Ok(path);
        }

        let stem = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFilename(format!("{}", target.display())))?;
        let partial = target.with_file_name(partial_download_name(stem));
        std::fs::write(&partial, url.as_bytes())?;
        sleep(self.download_delay).await;
        std::fs::rename(&partial, &path)?;
        Ok(path)
    }
}
