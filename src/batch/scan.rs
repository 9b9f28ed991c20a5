use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::batch::error::{BatchError, Result};

/// Extensions picked up by [`find_images`]. Matching is case-sensitive.
pub const SUPPORTED_EXTENSIONS: [&str; 7] =
    ["jpg", "jpeg", "png", "tif", "tiff", "bmp", "webp"];

/// Picked up only when the `avif` feature compiles a decoder in.
pub const AVIF_EXTENSION: &str = "avif";

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS.contains(&ext)
                || (cfg!(feature = "avif") && ext == AVIF_EXTENSION)
        })
}

/// Recursively collects supported image files under `root`.
///
/// Results are canonical paths in file-name order. Entries that cannot be
/// canonicalised are skipped; an unreadable directory aborts the scan.
pub fn find_images<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut images = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| BatchError::ScanError(e.to_string()))?;
        if entry.file_type().is_dir() || !is_supported(entry.path()) {
            continue;
        }

        match std::fs::canonicalize(entry.path()) {
            Ok(path) => images.push(path),
            Err(e) => warn!(path = %entry.path().display(), "Skipping entry: {}", e),
        }
    }

    debug!(root = %root.display(), found = images.len(), "Scan complete");
    Ok(images)
}
