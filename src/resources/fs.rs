//! Filesystem helpers for the overlay step.
use std::path::Path;

use anyhow::{Context as _, Result};

/// Recursively copy a directory tree, returning the number of files copied.
///
/// Existing files at the destination are overwritten; files present only at
/// the destination are preserved. Directory symlinks in the source are
/// followed and materialised rather than copied as links.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    let mut copied = 0;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Whether a directory exists and contains no entries.
///
/// A missing path is *not* considered empty; callers distinguish absent from
/// empty-but-present.
pub fn is_empty_dir(path: &Path) -> bool {
    path.is_dir()
        && std::fs::read_dir(path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
}
