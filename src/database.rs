use log::{debug, info, warn};
use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::{Path, PathBuf};

use crate::error::RelocateError;

/// Default file name of the Nightingale/Songbird main library database.
pub const LIBRARY_DB_FILENAME: &str = "main@library.songbirdnest.com.db";

/// Sole owner of the library database connection.
///
/// Opened once per session and released through [`Database::close`]. All
/// writes go through a single [`Transaction`] obtained from
/// [`Database::begin`].
pub struct Database {
    conn: Connection,
    db_path: PathBuf,
}

impl Database {
    pub fn open(path_arg: &str) -> Result<Self, RelocateError> {
        let db_path = Self::validate_db_path(path_arg)?;

        // Never create: a mistyped path must not leave an empty database behind
        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        info!("Database opened at: {}", db_path.display());

        Ok(Database { conn, db_path })
    }

    fn validate_db_path(path_arg: &str) -> Result<PathBuf, RelocateError> {
        let path = Path::new(path_arg);

        if path_arg.is_empty() || !path.is_file() {
            return Err(RelocateError::MissingDatabaseFile(path_arg.to_owned()));
        }

        // Canonicalize using Dunce (de-UNC) to strip the "UNC" (e.g., \\?\C) on Windows
        let canonical_path = dunce::canonicalize(path)?;

        Ok(canonical_path)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Starts the one transaction that every update of the session joins.
    /// Dropping the transaction without committing rolls it back.
    pub fn begin(&mut self) -> Result<Transaction<'_>, RelocateError> {
        debug!("Beginning transaction on {}", self.db_path.display());
        Ok(self.conn.transaction()?)
    }

    /// Closes the connection. Consumes the database so it can only happen once.
    pub fn close(self) -> Result<(), RelocateError> {
        let db_path = self.db_path;
        self.conn.close().map_err(|(_conn, err)| {
            warn!("Failed to close database {}: {}", db_path.display(), err);
            RelocateError::DatabaseError(err)
        })?;

        info!("Database closed: {}", db_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_items::tests::seed_media_items;
    use std::fs;
    use tempfile::TempDir;

    fn library_in(dir: &TempDir) -> PathBuf {
        let path = dir.path().join(LIBRARY_DB_FILENAME);
        let conn = Connection::open(&path).unwrap();
        seed_media_items(&conn, &[Some("C:/music/a.mp3")]);
        path
    }

    #[test]
    fn test_open_existing_library() {
        let dir = TempDir::new().unwrap();
        let path = library_in(&dir);

        let db = Database::open(path.to_str().unwrap()).unwrap();
        assert_eq!(db.db_path(), dunce::canonicalize(&path).unwrap().as_path());
        db.close().unwrap();
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.db");

        let result = Database::open(path.to_str().unwrap());
        assert!(matches!(result, Err(RelocateError::MissingDatabaseFile(_))));
        assert!(!path.exists(), "Opening must not create the file");
    }

    #[test]
    fn test_open_directory_is_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Database::open(dir.path().to_str().unwrap());
        assert!(matches!(result, Err(RelocateError::MissingDatabaseFile(_))));
    }

    #[test]
    fn test_open_empty_path() {
        let result = Database::open("");
        assert!(matches!(result, Err(RelocateError::MissingDatabaseFile(_))));
    }

    #[test]
    fn test_not_a_database_surfaces_on_first_query() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "this is not an sqlite database, just some text padding it out").unwrap();

        // SQLite defers header validation until the first statement
        let result = Database::open(path.to_str().unwrap()).and_then(|db| {
            db.conn()
                .query_row("SELECT COUNT(*) FROM media_items", [], |row| row.get::<_, i64>(0))
                .map_err(RelocateError::from)
        });
        assert!(matches!(result, Err(RelocateError::DatabaseError(_))));
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let dir = TempDir::new().unwrap();
        let path = library_in(&dir);

        let mut db = Database::open(path.to_str().unwrap()).unwrap();
        {
            let tx = db.begin().unwrap();
            tx.execute("UPDATE media_items SET content_url = 'X'", []).unwrap();
        }
        let url: String = db
            .conn()
            .query_row("SELECT content_url FROM media_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(url, "C:/music/a.mp3");
        db.close().unwrap();
    }
}
