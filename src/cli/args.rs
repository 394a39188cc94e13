//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Public Instagram profile archiver CLI.
#[derive(Parser, Debug)]
#[command(
    name = "instagram-archiver",
    version,
    about = "Archive the public posts of an Instagram profile",
    long_about = "Fetches a public Instagram profile's image posts (and optionally highlights) \
                  within a time limit and saves them, with their captions and metadata, to disk.\n\n\
                  Whatever was collected before a timeout or error is still saved."
)]
pub struct Args {
    /// Path to the configuration file (YAML, or TOML with a .toml extension).
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// The configuration path, falling back to the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}
