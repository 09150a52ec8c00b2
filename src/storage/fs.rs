//! Module to scan music directories in the file system

use walkdir::WalkDir;

use std::path::{Path, PathBuf};

/// Audio file extensions the scanner will pick up.
const MUSIC_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a"];

pub fn is_music_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MUSIC_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collects all music files under the given root.
///
/// Unreadable entries are skipped with a warning; only the reachable part of
/// the tree is returned.
pub fn collect_music_files(root: &Path, follow_symlinks: bool) -> Vec<PathBuf> {
    let root_str = root.to_string_lossy().to_string();

    WalkDir::new(root)
        .follow_links(follow_symlinks)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("error while scanning dir {root_str}, skipping an entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| is_music_file(p))
        .collect()
}
