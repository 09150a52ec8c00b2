//! Tag extraction for scanned audio files.
//!
//! Treated as an opaque collaborator by the rest of the crate: extraction
//! either succeeds or quietly falls back to placeholder metadata, so a
//! corrupt file never aborts a library scan.

use std::path::Path;

use lofty::prelude::*;
use lofty::tag::ItemKey;

use crate::domain::track::TrackMeta;

/// Reads artist/album/duration tags from `path`.
///
/// Unreadable or untagged files yield the placeholder metadata; individual
/// missing tags fall back per-field.
pub fn extract(path: &Path) -> TrackMeta {
    let mut meta = TrackMeta::default();

    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            log::debug!(
                "failed to read tags from {}: {e}",
                path.to_string_lossy()
            );
            return meta;
        }
    };

    meta.duration = tagged.properties().duration().as_secs_f64();

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
            let v = v.trim();
            if !v.is_empty() {
                meta.artist = v.to_string();
            }
        }
        if let Some(v) = tag.get_string(&ItemKey::AlbumTitle) {
            let v = v.trim();
            if !v.is_empty() {
                meta.album = v.to_string();
            }
        }
    }

    meta
}
