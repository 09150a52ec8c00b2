use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::domain::track::Track;

/// In-memory ordered playback queue with a current-track cursor.
///
/// Distinct from any persisted named playlist; replaced wholesale whenever a
/// new track set is supplied and never written back to the catalog.
/// Invariant: if non-empty, `current < tracks.len()`.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: usize,
}

impl Playlist {
    /// Replaces the playlist content, resetting the cursor to the start.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks, current: 0 }
    }

    pub fn from_single(track: Track) -> Self {
        Self::from_tracks(vec![track])
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    /// Moves the cursor by `step` with wraparound. Guarded no-op when the
    /// playlist is empty.
    pub fn advance(&mut self, step: isize) {
        if self.tracks.is_empty() {
            return;
        }
        let len = self.tracks.len() as isize;
        self.current = (self.current as isize + step).rem_euclid(len) as usize;
    }

    /// Randomly permutes the playlist in place. The cursor keeps its numeric
    /// position, so it usually ends up on a different track afterwards
    /// (matching the behavior users of the original shell player expect).
    /// No-op on an empty playlist.
    pub fn shuffle(&mut self) {
        self.tracks.shuffle(&mut thread_rng());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: i64) -> Track {
        Track {
            id,
            path: format!("/music/{id}.mp3"),
            filename: format!("{id}.mp3"),
            artist: "X".to_string(),
            album: "Y".to_string(),
            duration: 1.0,
        }
    }

    #[test]
    fn from_tracks_resets_cursor() {
        let mut playlist = Playlist::from_tracks(vec![track(1), track(2)]);
        playlist.advance(1);
        assert_eq!(playlist.current_index(), 1);

        playlist = Playlist::from_tracks(vec![track(3)]);
        assert_eq!(playlist.current_index(), 0);
        assert_eq!(playlist.current().unwrap().id, 3);
    }

    #[test]
    fn advance_wraps_around_both_ends() {
        let mut playlist = Playlist::from_tracks(vec![track(1), track(2), track(3)]);

        playlist.advance(1);
        playlist.advance(1);
        assert_eq!(playlist.current_index(), 2);

        // forward off the end wraps to the start
        playlist.advance(1);
        assert_eq!(playlist.current_index(), 0);

        // backward off the start wraps to the end
        playlist.advance(-1);
        assert_eq!(playlist.current_index(), 2);
    }

    #[test]
    fn advance_on_empty_playlist_is_a_noop() {
        let mut playlist = Playlist::default();

        playlist.advance(1);
        playlist.advance(-1);

        assert!(playlist.is_empty());
        assert_eq!(playlist.current_index(), 0);
        assert!(playlist.current().is_none());
    }

    #[test]
    fn shuffle_keeps_tracks_and_cursor_position() {
        let mut playlist = Playlist::from_tracks((1..=20).map(track).collect());
        playlist.advance(5);

        playlist.shuffle();

        assert_eq!(playlist.len(), 20);
        assert_eq!(playlist.current_index(), 5);
    }

    #[test]
    fn shuffle_preserves_track_set() {
        let mut playlist = Playlist::from_tracks((1..=20).map(track).collect());
        playlist.shuffle();

        let mut ids: Vec<i64> = (0..playlist.len())
            .map(|_| {
                let id = playlist.current().unwrap().id;
                playlist.advance(1);
                id
            })
            .collect();
        ids.sort_unstable();

        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_on_empty_playlist_is_a_noop() {
        let mut playlist = Playlist::default();
        playlist.shuffle();
        assert!(playlist.is_empty());
    }
}
