use crate::{
    domain::track::Track,
    player::{
        playlist::Playlist,
        process::{PlayerBackend, PlayerError, PlayerHandle},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Stopped,
    Playing,
    Paused,
}

/// Result of a play request that did not fail at the process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// The playlist was empty, nothing was started.
    NothingToPlay,
}

/// Playback state machine wrapping a single external player process.
///
/// Owns the active playlist and the process handle. Invariant: a handle is
/// held if and only if the status is Playing or Paused. One session exists
/// per running instance; it is passed explicitly to command handlers.
pub struct Session {
    backend: Box<dyn PlayerBackend>,
    playlist: Playlist,
    status: Status,
    handle: Option<Box<dyn PlayerHandle>>,
}

impl Session {
    pub fn new(backend: Box<dyn PlayerBackend>) -> Self {
        Self {
            backend,
            playlist: Playlist::default(),
            status: Status::Stopped,
            handle: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current()
    }

    /// Starts playback of the current track, replacing the playlist first
    /// when `tracks` is supplied.
    ///
    /// Any running process is stopped before the new one is spawned, so at
    /// most one player process exists at a time. A spawn failure is returned
    /// to the caller and leaves the session Stopped with no handle.
    pub fn play(&mut self, tracks: Option<Vec<Track>>) -> Result<PlayOutcome, PlayerError> {
        if let Some(tracks) = tracks {
            self.playlist = Playlist::from_tracks(tracks);
        }

        self.stop()?;

        let Some(track) = self.playlist.current() else {
            return Ok(PlayOutcome::NothingToPlay);
        };
        let path = track.path.clone();

        match self.backend.spawn(&path) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.status = Status::Playing;
                Ok(PlayOutcome::Started)
            }
            Err(e) => {
                self.handle = None;
                self.status = Status::Stopped;
                Err(e)
            }
        }
    }

    /// Suspends the player. Returns whether a transition happened; pausing
    /// while not playing is a no-op.
    pub fn pause(&mut self) -> Result<bool, PlayerError> {
        match (self.status, self.handle.as_mut()) {
            (Status::Playing, Some(handle)) => {
                handle.suspend()?;
                self.status = Status::Paused;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Continues a paused player. No-op unless currently Paused.
    pub fn resume(&mut self) -> Result<bool, PlayerError> {
        match (self.status, self.handle.as_mut()) {
            (Status::Paused, Some(handle)) => {
                handle.resume()?;
                self.status = Status::Playing;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Stops playback and reaps the player process. Idempotent; the session
    /// ends up Stopped with no handle even if shutdown reports an error.
    pub fn stop(&mut self) -> Result<(), PlayerError> {
        let result = match self.handle.take() {
            Some(mut handle) => handle.shutdown(),
            None => Ok(()),
        };
        self.status = Status::Stopped;
        result
    }

    /// Advances to the next track and restarts playback.
    pub fn next(&mut self) -> Result<PlayOutcome, PlayerError> {
        self.playlist.advance(1);
        self.play(None)
    }

    /// Steps back to the previous track and restarts playback.
    pub fn previous(&mut self) -> Result<PlayOutcome, PlayerError> {
        self.playlist.advance(-1);
        self.play(None)
    }

    /// Shuffles the active playlist. Returns whether there was anything to
    /// shuffle. Playback of the running track is unaffected.
    pub fn shuffle_playlist(&mut self) -> bool {
        if self.playlist.is_empty() {
            return false;
        }
        self.playlist.shuffle();
        true
    }
}
