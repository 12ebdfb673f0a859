/*!
 * Read-only SQLite access.
 *
 * The database is only ever queried: it is opened without write or create
 * permission, and queries run on tokio's blocking pool so the runtime thread
 * is never held by SQLite.
 */

use anyhow::{anyhow, Context, Result};
use log::info;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared handle on a database opened read-only
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Database file
    db_path: PathBuf,
    /// Connection guarded for use from the blocking pool
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open an existing database file; a missing file is an error
    pub fn open_read_only<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Database file this handle reads from
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` with the connection on the current thread
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| anyhow!("Database lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run `f` with the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.clone();
        tokio::task::spawn_blocking(move || handle.execute(f))
            .await
            .context("Database task panicked")?
    }
}
