//! Instagram API module.
//!
//! This module provides:
//! - The `ProfileFetcher` trait the pipeline is written against
//! - HTTP client for the public Instagram web API
//! - API response types

pub mod client;
pub mod fetcher;
pub mod types;

pub use client::InstagramClient;
pub use fetcher::{Highlight, PostEntry, PostPage, Profile, ProfileFetcher, StoryEntry};
