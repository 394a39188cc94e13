//! Instagram Archiver - save the public posts of an Instagram profile to disk
//!
//! This library fetches a public profile's image posts within a wall-clock
//! limit and writes them, with captions and metadata, into a per-profile
//! folder. Whatever was collected before a timeout or error is still saved.
//!
//! # Features
//!
//! - Timeout-bounded, streaming post collection
//! - Optional story highlights (skipped when login is required)
//! - Per-post folders with the image, `post_data.json` and `caption.txt`
//! - A profile-level `instagram_data.json` aggregate
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use indicatif::ProgressBar;
//! use instagram_archiver::{archive_profile, Config, InstagramClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("Configurations/public_profile.yml"))?;
//!     let client = InstagramClient::new(&config.user_agent)?;
//!
//!     let report = archive_profile(&client, &config, &ProgressBar::hidden()).await?;
//!     println!("{} posts saved", report.aggregate.post_count());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{InstagramClient, ProfileFetcher};
pub use config::{validate_config, Config};
pub use download::{archive_profile, fetch_profile, Aggregate, FetchOutcome, RunReport};
pub use error::{Error, Result};
pub use media::MediaKind;
