//! Staging directory cleanup.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::fs::naming::{is_image_asset, is_partial_download};
use crate::fs::paths::{ensure_dir, move_file};

/// Move stray image assets from `staging_dir` into `dest_dir`.
///
/// Leftover partial downloads are deleted. Returns how many assets moved.
pub fn sweep_stray_assets(staging_dir: &Path, dest_dir: &Path) -> Result<usize> {
    if !staging_dir.is_dir() {
        return Ok(0);
    }

    if same_dir(staging_dir, dest_dir) {
        return Ok(0);
    }

    let mut moved = 0;
    for entry in fs::read_dir(staging_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();

        if is_partial_download(&name) {
            tracing::debug!("Removing partial download {}", path.display());
            fs::remove_file(&path)?;
            continue;
        }

        if !is_image_asset(&path) {
            continue;
        }

        ensure_dir(dest_dir)?;
        let target = dest_dir.join(&*name);
        move_file(&path, &target)?;
        tracing::debug!("Moved stray asset {} to {}", name, dest_dir.display());
        moved += 1;
    }

    Ok(moved)
}

/// Remove the staging directory if nothing is left in it.
pub fn remove_if_empty(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    if fs::read_dir(dir)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_moves_images_only() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        let dest = dir.path().join("alice");
        fs::create_dir_all(&staging).unwrap();

        fs::write(staging.join("2024-01-01_00-00-00_UTC.jpg"), b"img").unwrap();
        fs::write(staging.join("notes.txt"), b"keep").unwrap();
        fs::write(staging.join(".ig-2024-01-01_00-00-01_UTC.abc.part"), b"half").unwrap();

        let moved = sweep_stray_assets(&staging, &dest).unwrap();
        assert_eq!(moved, 1);
        assert!(dest.join("2024-01-01_00-00-00_UTC.jpg").is_file());
        assert!(staging.join("notes.txt").is_file());
        assert!(!staging.join(".ig-2024-01-01_00-00-01_UTC.abc.part").exists());

        // Second sweep has nothing left to do
        assert_eq!(sweep_stray_assets(&staging, &dest).unwrap(), 0);
    }

    #[test]
    fn test_sweep_missing_staging_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let moved = sweep_stray_assets(&dir.path().join("absent"), dir.path()).unwrap();
        assert_eq!(moved, 0);
    }

    #[test]
    fn test_sweep_into_itself_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"img").unwrap();
        assert_eq!(sweep_stray_assets(dir.path(), dir.path()).unwrap(), 0);
        assert!(dir.path().join("a.jpg").is_file());
    }

    #[test]
    fn test_remove_if_empty() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join(".staging");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("x.txt"), b"x").unwrap();

        assert!(!remove_if_empty(&staging).unwrap());
        fs::remove_file(staging.join("x.txt")).unwrap();
        assert!(remove_if_empty(&staging).unwrap());
        assert!(!staging.exists());
    }
}
