//! Filename generation and manipulation.

use std::path::Path;

use chrono::{DateTime, Utc};
use mime_guess::mime;

use crate::error::{Error, Result};

/// Prefix for highlight asset names.
const HIGHLIGHT_PREFIX: &str = "highlight_";

/// Prefix and suffix of in-flight download files.
const PARTIAL_PREFIX: &str = ".ig-";
const PARTIAL_SUFFIX: &str = ".part";

/// Asset stem for a post: `YYYY-MM-DD_HH-MM-SS_UTC`.
pub fn asset_stem(date_utc: DateTime<Utc>) -> String {
    format!("{}_UTC", date_utc.format("%Y-%m-%d_%H-%M-%S"))
}

/// Asset stem for a highlight item: `highlight_YYYY-MM-DD_HH-MM-SS_UTC`.
pub fn highlight_asset_stem(date_utc: DateTime<Utc>) -> String {
    format!("{}{}", HIGHLIGHT_PREFIX, asset_stem(date_utc))
}

/// Sanitize a path component (shortcode, profile name, highlight title).
///
/// Separators and characters invalid on common filesystems become `_`.
/// Names that would resolve to `.` or `..` are rejected.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    // Sanitize problematic characters (replace with underscore)
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim();

    // Reject empty or whitespace-only names
    if trimmed.is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    if trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    Ok(trimmed.to_string())
}

/// Pick the file extension for a downloaded image.
///
/// Prefers the extension in the URL path, then the response content type,
/// and falls back to `jpg`.
pub fn image_extension(url: &str, content_type: Option<&str>) -> String {
    let from_url = url::Url::parse(url).ok().and_then(|u| {
        Path::new(u.path())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    });

    if let Some(ext) = from_url {
        let is_image = mime_guess::from_ext(&ext)
            .first()
            .map(|m| m.type_() == mime::IMAGE)
            .unwrap_or(false);
        if is_image {
            return ext;
        }
    }

    if let Some(content_type) = content_type {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        if let Some(ext) = mime_guess::get_mime_extensions_str(essence)
            .and_then(preferred_extension)
        {
            return ext.to_string();
        }
    }

    "jpg".to_string()
}

fn preferred_extension(exts: &'static [&'static str]) -> Option<&'static str> {
    exts.iter()
        .copied()
        .find(|e| *e == "jpg")
        .or_else(|| exts.first().copied())
}

/// Whether a path names an image asset (by extension).
pub fn is_image_asset(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}

/// Name of the temporary file a download is streamed into.
pub fn partial_download_name(stem: &str) -> String {
    format!(
        "{}{}.{}{}",
        PARTIAL_PREFIX,
        stem,
        uuid::Uuid::new_v4(),
        PARTIAL_SUFFIX
    )
}

/// Whether a file name is a leftover temporary download.
pub fn is_partial_download(name: &str) -> bool {
    name.starts_with(PARTIAL_PREFIX) && name.ends_with(PARTIAL_SUFFIX)
}
