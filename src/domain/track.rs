/// Placeholder shown when a file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Placeholder shown when a file carries no album tag.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// A catalogued music track. Identity is the unique filesystem path;
/// the numeric id is assigned by the catalog on ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: i64,
    pub path: String,
    pub filename: String,
    pub artist: String,
    pub album: String,
    /// Duration in seconds, 0.0 when metadata extraction failed.
    pub duration: f64,
}

/// A track candidate produced by the scanner, not yet assigned an id.
#[derive(Debug, Clone)]
pub struct NewTrack {
    pub path: String,
    pub filename: String,
    pub meta: TrackMeta,
}

/// Tag metadata extracted from an audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMeta {
    pub artist: String,
    pub album: String,
    pub duration: f64,
}

impl Default for TrackMeta {
    fn default() -> Self {
        Self {
            artist: UNKNOWN_ARTIST.to_string(),
            album: UNKNOWN_ALBUM.to_string(),
            duration: 0.0,
        }
    }
}
