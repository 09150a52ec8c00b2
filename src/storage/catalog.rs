use std::{path::Path, str::FromStr};

use rusqlite::{Connection, Row, params};
use thiserror::Error;

use crate::{
    config,
    domain::track::{NewTrack, Track},
    metadata,
    storage::{
        db,
        error::StorageError,
        fs,
        schema::{columns::*, tables::*},
    },
};

/// Sort column for catalog queries, validated at the type level.
///
/// SQL text only ever comes from the enum-to-column mapping below; a
/// user-supplied column name that does not parse never reaches the query
/// builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Filename,
    Artist,
    Album,
    Duration,
}

impl SortColumn {
    fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Id => ID,
            SortColumn::Filename => FILENAME,
            SortColumn::Artist => ARTIST,
            SortColumn::Album => ALBUM,
            SortColumn::Duration => DURATION,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown sort column: {0}")]
pub struct InvalidSortColumn(String);

impl FromStr for SortColumn {
    type Err = InvalidSortColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortColumn::Id),
            "filename" => Ok(SortColumn::Filename),
            "artist" => Ok(SortColumn::Artist),
            "album" => Ok(SortColumn::Album),
            "duration" => Ok(SortColumn::Duration),
            other => Err(InvalidSortColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown sort order: {0}")]
pub struct InvalidSortOrder(String);

impl FromStr for SortOrder {
    type Err = InvalidSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(InvalidSortOrder(other.to_string())),
        }
    }
}

/// Parameters of a catalog listing.
#[derive(Debug, Clone)]
pub struct TrackQuery {
    /// Case-insensitive substring matched against filename, artist or album.
    pub search: Option<String>,
    pub order_by: SortColumn,
    pub sort: SortOrder,
    pub limit: u32,
    pub offset: u32,
}

impl Default for TrackQuery {
    fn default() -> Self {
        Self {
            search: None,
            order_by: SortColumn::Filename,
            sort: SortOrder::Ascending,
            limit: 50,
            offset: 0,
        }
    }
}

/// Persistent track catalog backed by SQLite.
pub struct Catalog {
    pub(crate) db: Connection,
}

fn row_to_track(row: &Row<'_>) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get(0)?,
        path: row.get(1)?,
        filename: row.get(2)?,
        artist: row.get(3)?,
        album: row.get(4)?,
        duration: row.get(5)?,
    })
}

impl Catalog {
    /// Opens the database connection and initializes the schema.
    pub fn new(db_config: &config::Database) -> Result<Self, StorageError> {
        let db = db::open(db_config)?;
        Ok(Self::from_existing_conn(db))
    }

    pub fn from_existing_conn(db: Connection) -> Self {
        Self { db }
    }

    /// Inserts a track unless one with the same path already exists.
    ///
    /// Returns whether a new row was created. Keyed on the unique path
    /// column, so re-ingesting the same tree is a no-op.
    pub fn ingest(&mut self, track: &NewTrack) -> Result<bool, StorageError> {
        let changed = self.db.execute(
            &format!(
                "INSERT OR IGNORE INTO {TRACKS} ({PATH}, {FILENAME}, {ARTIST}, {ALBUM}, {DURATION})
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ),
            params![
                track.path,
                track.filename,
                track.meta.artist,
                track.meta.album,
                track.meta.duration
            ],
        )?;
        Ok(changed > 0)
    }

    /// Whether a track with this exact path is already catalogued.
    pub fn contains_path(&self, path: &str) -> Result<bool, StorageError> {
        let count: i64 = self.db.query_row(
            &format!("SELECT COUNT(*) FROM {TRACKS} WHERE {PATH} = ?1"),
            params![path],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Retrieves tracks with searching, sorting and offset/limit pagination.
    pub fn query(&self, q: &TrackQuery) -> Result<Vec<Track>, StorageError> {
        let select = format!(
            "SELECT {ID}, {PATH}, {FILENAME}, {ARTIST}, {ALBUM}, {DURATION} FROM {TRACKS}"
        );
        let order = format!(" ORDER BY {} {}", q.order_by.as_sql(), q.sort.as_sql());

        let tracks = match &q.search {
            Some(term) => {
                let sql = format!(
                    "{select} WHERE {FILENAME} LIKE ?1 OR {ARTIST} LIKE ?1 OR {ALBUM} LIKE ?1\
                     {order} LIMIT ?2 OFFSET ?3"
                );
                let mut stmt = self.db.prepare(&sql)?;
                let pattern = format!("%{term}%");
                stmt.query_map(params![pattern, q.limit, q.offset], row_to_track)?
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("{select}{order} LIMIT ?1 OFFSET ?2");
                let mut stmt = self.db.prepare(&sql)?;
                stmt.query_map(params![q.limit, q.offset], row_to_track)?
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(tracks)
    }

    /// Walks the music tree and ingests every supported file not yet
    /// catalogued. Returns the number of newly added tracks.
    ///
    /// Already-indexed paths are skipped before tag extraction is attempted;
    /// files whose tags cannot be read are ingested with placeholder
    /// metadata.
    pub fn scan_library(
        &mut self,
        root: &Path,
        follow_symlinks: bool,
    ) -> Result<usize, StorageError> {
        let mut added = 0;

        for path in fs::collect_music_files(root, follow_symlinks) {
            let path_str = path.to_string_lossy().to_string();
            if self.contains_path(&path_str)? {
                continue;
            }

            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path_str.clone());
            let meta = metadata::extract(&path);

            if self.ingest(&NewTrack {
                path: path_str,
                filename,
                meta,
            })? {
                added += 1;
            }
        }

        Ok(added)
    }
}
