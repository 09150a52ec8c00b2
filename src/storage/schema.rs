use rusqlite::Connection;

pub mod tables {
    pub const TRACKS: &str = "tracks";
    pub const PLAYLISTS: &str = "playlists";
    pub const PLAYLIST_TRACKS: &str = "playlist_tracks";

    pub const ALL_TABLES: &[&str] = &[TRACKS, PLAYLISTS, PLAYLIST_TRACKS];
}

pub mod columns {
    pub const ID: &str = "id";
    pub const PATH: &str = "path";
    pub const FILENAME: &str = "filename";
    pub const ARTIST: &str = "artist";
    pub const ALBUM: &str = "album";
    pub const DURATION: &str = "duration";
}

pub use columns::*;
pub use tables::*;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tracks (
    id INTEGER PRIMARY KEY,
    path TEXT UNIQUE NOT NULL,
    filename TEXT NOT NULL,
    artist TEXT NOT NULL,
    album TEXT NOT NULL,
    duration REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS playlists (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS playlist_tracks (
    playlist_id INTEGER NOT NULL REFERENCES playlists(id),
    track_id INTEGER NOT NULL REFERENCES tracks(id)
);
"#;

pub fn init(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)
}
