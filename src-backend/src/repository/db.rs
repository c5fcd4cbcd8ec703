//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::DomainError;

/// Shared handle to the (possibly not yet opened) connection
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    pub conn: SharedConnection,
    pub db_path: PathBuf,
}

impl DbState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
            db_path,
        }
    }

    pub fn connection(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    pub async fn is_ready(&self) -> bool {
        self.conn.lock().await.is_some()
    }
}

pub(crate) fn not_initialized() -> DomainError {
    DomainError::Internal("Database not initialized".to_string())
}

/// Open the database at `db_path` (":memory:" for a private in-memory db)
/// and bring its schema up to date.
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()
    } else {
        Connection::open(db_path)
    }
    .map_err(|e| format!("Failed to open db: {}", e))?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| format!("Failed to enable foreign keys: {}", e))?;

    run_migrations(&conn)?;

    let state = DbState::new(db_path.to_path_buf());
    *state.conn.lock().await = Some(conn);
    log::info!("database ready at {}", db_path.display());

    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(mut rows) = stmt.query([]) else {
        return false;
    };
    while let Ok(Some(row)) = rows.next() {
        if let Ok(name) = row.get::<_, String>(1) {
            if name == column {
                return true;
            }
        }
    }
    false
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS memberships (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            holder_name TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT 'member'
        );

        CREATE TABLE IF NOT EXISTS containers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            owner_id INTEGER NOT NULL REFERENCES memberships(id),
            name TEXT NOT NULL,
            color TEXT,
            details TEXT,
            updated_at INTEGER
        );

        CREATE TABLE IF NOT EXISTS equipment (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id INTEGER NOT NULL,
            owner_id INTEGER NOT NULL REFERENCES memberships(id),
            container_id INTEGER REFERENCES containers(id) ON DELETE SET NULL,
            name TEXT NOT NULL,
            color TEXT,
            details TEXT,
            updated_at INTEGER
        );",
    )
    .map_err(|e| e.to_string())?;

    // Images arrived after the first release
    if !column_exists(conn, "equipment", "image") {
        conn.execute("ALTER TABLE equipment ADD COLUMN image TEXT", [])
            .map_err(|e| format!("Failed to add image: {}", e))?;
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_containers_org ON containers(organization_id);
        CREATE INDEX IF NOT EXISTS idx_equipment_org ON equipment(organization_id);
        CREATE INDEX IF NOT EXISTS idx_equipment_container ON equipment(container_id);",
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_repeatable() {
        let state = init_db(Path::new(":memory:")).await.unwrap();
        let guard = state.conn.lock().await;
        let conn = guard.as_ref().unwrap();
        run_migrations(conn).unwrap();
        assert!(column_exists(conn, "equipment", "image"));
        assert!(!column_exists(conn, "equipment", "missing"));
    }

    #[tokio::test]
    async fn test_on_disk_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gear.db");
        let state = init_db(&path).await.unwrap();
        assert!(state.is_ready().await);
        assert!(path.exists());
    }
}
