use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use rusqlite::Connection;

use crate::{
    config::Database,
    storage::{error::StorageError, schema},
};

/// Directory under the user's home holding the library database.
const DATA_DIR: &str = ".mtsp";
const DB_FILE: &str = "library.db";

fn open_in_memory() -> Result<Connection, rusqlite::Error> {
    Connection::open_in_memory()
}

fn open_from_file(path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Connection::open(path)?)
}

/// Default per-user database location, `~/.mtsp/library.db`.
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or(anyhow!("could not determine home directory"))?;
    Ok(home.join(DATA_DIR).join(DB_FILE))
}

pub fn open(config: &Database) -> Result<Connection, StorageError> {
    let db = if config.in_memory {
        open_in_memory()?
    } else {
        let path = match &config.path {
            Some(p) => p.clone(),
            None => default_db_path()
                .with_context(|| "failed to resolve database location")
                .map_err(StorageError::Internal)?,
        };
        open_from_file(&path)?
    };
    schema::init(&db)?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Database,
        storage::{db::open, schema},
    };

    #[test]
    fn open_in_memory_db_initializes_schema() {
        let db = open(&Database {
            in_memory: true,
            path: None,
        })
        .unwrap();

        let mut stmt = db
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();

        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        for table in schema::tables::ALL_TABLES {
            assert!(tables.contains(&table.to_string()));
        }
    }

    #[test]
    fn open_on_disk_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("library.db");

        let _db = open(&Database {
            in_memory: false,
            path: Some(path.clone()),
        })
        .unwrap();

        assert!(path.exists());
    }
}
