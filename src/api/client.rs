//! Instagram public web API client.

use std::collections::VecDeque;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use rand::Rng;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;
use url::Url;

use crate::api::fetcher::{Highlight, PostEntry, PostPage, Profile, ProfileFetcher};
use crate::api::types::*;
use crate::error::{Error, Result};
use crate::fs::naming::{image_extension, partial_download_name};

/// Instagram web base URL.
const API_BASE: &str = "https://www.instagram.com";

/// Application ID the web frontend sends with API calls.
const IG_APP_ID: &str = "936619743392459";

/// GraphQL query for a page of profile posts.
const POSTS_QUERY_HASH: &str = "003056d32c2554def87228bc3fd9668a";

/// GraphQL query listing highlight reels.
const HIGHLIGHT_REELS_QUERY_HASH: &str = "7c16654f22c819fb63d1183034a5162f";

/// GraphQL query fetching highlight reel items.
const REEL_ITEMS_QUERY_HASH: &str = "45246d3fe16ccc6577e0bd297a5db1ab";

/// Posts requested per page.
const PAGE_SIZE: u32 = 12;

/// Instagram API client for public profiles.
pub struct InstagramClient {
    client: Client,
    base: Url,
    page_delay_ms: Range<u64>,
}

/// Pagination state for the post stream.
struct PostCursor {
    buffer: VecDeque<PostEntry>,
    next: Option<String>,
    started: bool,
}

impl InstagramClient {
    /// Create a client against the live service.
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_base_url(user_agent, API_BASE)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(user_agent: &str, base: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base: Url::parse(base)?,
            page_delay_ms: 400..750,
        })
    }

    /// Set the random delay range between page requests.
    pub fn with_page_delay(mut self, range_ms: Range<u64>) -> Self {
        self.page_delay_ms = range_ms;
        self
    }

    fn page_delay(&self) -> Duration {
        if self.page_delay_ms.is_empty() {
            return Duration::ZERO;
        }
        let delay_ms = rand::thread_rng().gen_range(self.page_delay_ms.clone());
        Duration::from_millis(delay_ms)
    }

    /// Make a GET request and map status codes to errors.
    async fn get(&self, url: Url, what: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("x-ig-app-id", IG_APP_ID)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        // Anonymous requests to gated endpoints get bounced to the login page
        if response.url().path().starts_with("/accounts/login") {
            return Err(Error::LoginRequired(what.to_string()));
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::LoginRequired(what.to_string()))
            }
            s if s.is_success() => Ok(response),
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Api(format!(
                    "Failed to get {}: HTTP {} - {}",
                    what,
                    s,
                    truncate(&body, 200)
                )))
            }
        }
    }

    /// GET a JSON envelope and unwrap its payload.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        let response = self.get(url, what).await?;
        let text = response.text().await?;
        tracing::debug!("{} response length: {} bytes", what, text.len());

        let api_response: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse {}: {} - Response: {}",
                what,
                e,
                truncate(&text, 500)
            ))
        })?;

        api_response.into_data(what)
    }

    fn graphql_url(&self, query_hash: &str, variables: &serde_json::Value) -> Result<Url> {
        let mut url = self.base.join("/graphql/query/")?;
        url.query_pairs_mut()
            .append_pair("query_hash", query_hash)
            .append_pair("variables", &variables.to_string());
        Ok(url)
    }

    /// Fetch one page of posts after `cursor`.
    async fn fetch_post_page(&self, profile_id: &str, cursor: Option<&str>) -> Result<PostPage> {
        let mut variables = serde_json::json!({ "id": profile_id, "first": PAGE_SIZE });
        if let Some(cursor) = cursor {
            variables["after"] = serde_json::Value::from(cursor);
        }

        let url = self.graphql_url(POSTS_QUERY_HASH, &variables)?;
        let data: UserData<TimelineUser> = self.get_json(url, "posts").await?;
        let user = data
            .user
            .ok_or_else(|| Error::Api("Posts response has no user".into()))?;

        user.edge_owner_to_timeline_media.into_page()
    }

    /// Pop the next buffered post, fetching pages as needed.
    async fn next_post(
        &self,
        profile_id: &str,
        mut cursor: PostCursor,
    ) -> Result<Option<(PostEntry, PostCursor)>> {
        loop {
            if let Some(entry) = cursor.buffer.pop_front() {
                return Ok(Some((entry, cursor)));
            }

            if cursor.started && cursor.next.is_none() {
                return Ok(None);
            }

            if cursor.started {
                // Rate limiting delay between pages
                sleep(self.page_delay()).await;
            }

            let page = self
                .fetch_post_page(profile_id, cursor.next.as_deref())
                .await?;
            cursor.started = true;

            if page.entries.is_empty() {
                tracing::debug!("Empty post page, stopping");
                return Ok(None);
            }

            cursor.buffer.extend(page.entries);
            cursor.next = page.next_cursor;
        }
    }
}

#[async_trait]
impl ProfileFetcher for InstagramClient {
    async fn profile(&self, username: &str) -> Result<Profile> {
        let mut url = self.base.join("/api/v1/users/web_profile_info/")?;
        url.query_pairs_mut().append_pair("username", username);

        let data: UserData<WebProfileUser> = match self.get_json(url, "profile").await {
            Err(Error::Api(msg)) if msg.contains("HTTP 404") => {
                return Err(Error::ProfileNotFound(username.to_string()))
            }
            other => other?,
        };
        let user = data
            .user
            .ok_or_else(|| Error::ProfileNotFound(username.to_string()))?;

        let info = user.profile_info();
        let first_page = user
            .edge_owner_to_timeline_media
            .map(MediaConnection::into_page)
            .transpose()?;

        Ok(Profile {
            id: user.id,
            info,
            first_page,
        })
    }

    fn posts<'a>(&'a self, profile: &'a Profile) -> BoxStream<'a, Result<PostEntry>> {
        let initial = match &profile.first_page {
            Some(page) => PostCursor {
                buffer: page.entries.iter().cloned().collect(),
                next: page.next_cursor.clone(),
                started: true,
            },
            None => PostCursor {
                buffer: VecDeque::new(),
                next: None,
                started: false,
            },
        };

        stream::try_unfold(initial, move |cursor| async move {
            self.next_post(&profile.id, cursor).await
        })
        .boxed()
    }

    async fn highlights(&self, profile: &Profile) -> Result<Vec<Highlight>> {
        let variables = serde_json::json!({
            "user_id": profile.id,
            "include_chaining": false,
            "include_reel": false,
            "include_suggested_users": false,
            "include_logged_out_extras": false,
            "include_highlight_reels": true,
        });
        let url = self.graphql_url(HIGHLIGHT_REELS_QUERY_HASH, &variables)?;
        let data: UserData<HighlightReelsUser> = self.get_json(url, "highlights").await?;

        let reels: Vec<HighlightReelNode> = data
            .user
            .map(|u| {
                u.edge_highlight_reels
                    .edges
                    .into_iter()
                    .map(|e| e.node)
                    .collect()
            })
            .unwrap_or_default();

        let mut highlights = Vec::with_capacity(reels.len());
        for reel in reels {
            sleep(self.page_delay()).await;

            let variables = serde_json::json!({
                "reel_ids": [],
                "tag_names": [],
                "location_ids": [],
                "highlight_reel_ids": [reel.id],
                "precomposed_overlay": false,
            });
            let url = self.graphql_url(REEL_ITEMS_QUERY_HASH, &variables)?;
            let media: ReelsMediaData = self.get_json(url, "highlight items").await?;

            let items = media
                .reels_media
                .into_iter()
                .filter(|m| m.id.trim_start_matches("highlight:") == reel.id)
                .flat_map(|m| m.items)
                .map(StoryItemNode::into_entry)
                .collect::<Result<Vec<_>>>()?;

            highlights.push(Highlight {
                title: reel.title,
                items,
            });
        }

        Ok(highlights)
    }

    async fn download_pic(
        &self,
        url: &str,
        target: &Path,
        mtime: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Download(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let extension = image_extension(url, content_type.as_deref());

        let stem = target
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFilename(format!("{}", target.display())))?;
        let parent = target.parent().unwrap_or(Path::new("."));
        let output_path = parent.join(format!("{}.{}", stem, extension));
        let partial_path = parent.join(partial_download_name(stem));

        // Stream to a temporary file, then rename into place
        let mut file = File::create(&partial_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        file.into_std().await.set_modified(SystemTime::from(mtime))?;
        fs::rename(&partial_path, &output_path).await?;

        tracing::debug!("Downloaded: {}", output_path.display());
        Ok(output_path)
    }
}

/// Shorten a response body for error messages.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
