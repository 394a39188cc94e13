//! Path and directory management.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_path_component;

/// Folder holding one subfolder per post.
pub const POSTS_DIR: &str = "posts";

/// Folder holding one subfolder per highlight title.
pub const HIGHLIGHTS_DIR: &str = "highlights";

/// Get the profile folder path (with path traversal protection).
pub fn profile_dir(base_dir: &Path, username: &str) -> Result<PathBuf> {
    Ok(base_dir.join(sanitize_path_component(username)?))
}

/// Get the folder for a single post.
pub fn post_dir(profile_dir: &Path, shortcode: &str) -> Result<PathBuf> {
    Ok(profile_dir
        .join(POSTS_DIR)
        .join(sanitize_path_component(shortcode)?))
}

/// Get the folder for a highlight title.
pub fn highlight_dir(profile_dir: &Path, title: &str) -> Result<PathBuf> {
    Ok(profile_dir
        .join(HIGHLIGHTS_DIR)
        .join(sanitize_path_component(title)?))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|source| Error::Persist {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Move a file, falling back to copy-and-delete across filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).map_err(|source| Error::Persist {
        path: to.to_path_buf(),
        source,
    })?;
    fs::remove_file(from)?;
    Ok(())
}

/// Write a file, attaching the path to any error.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, contents).map_err(|source| Error::Persist {
        path: path.to_path_buf(),
        source,
    })
}
