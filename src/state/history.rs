use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::data::AnalysisRecord;
use crate::error::{Result, ScanError};

/// Key the whole history is stored under
const HISTORY_KEY: &str = "analysis_history";

/// The HistoryStore keeps past analyses in a SQLite key-value table.
///
/// The entire list is one JSON value under a fixed key. It is read once on
/// open and rewritten in full on every append or clear.
pub struct HistoryStore {
    conn: Connection,
    db_path: Option<PathBuf>,
    records: Vec<AnalysisRecord>,
}

impl HistoryStore {
    /// Open (or create) the store at `path` and load the history
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ScanError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        tracing::info!("📁 History database at: {}", path.display());

        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// A store that lives for this session only
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, None)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;

        let mut store = HistoryStore {
            conn,
            db_path,
            records: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Re-read the stored history.
    ///
    /// No stored value means no history. A value that doesn't parse is
    /// logged and also treated as no history.
    pub fn load(&mut self) -> Result<&[AnalysisRecord]> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [HISTORY_KEY],
                |row| row.get(0),
            )
            .optional()?;

        self.records = match raw {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("⚠️  Stored history is unreadable, starting empty: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(&self.records)
    }

    /// Add one record to the end and rewrite the stored value
    pub fn append(&mut self, record: AnalysisRecord) -> Result<()> {
        self.records.push(record);
        self.persist()
    }

    /// Delete the stored value, then drop every record.
    ///
    /// On failure the in-memory list is left as it was, matching disk.
    pub fn clear(&mut self) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", [HISTORY_KEY])?;
        self.records.clear();
        Ok(())
    }

    pub fn records(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&AnalysisRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the path to the database file, if on disk
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![HISTORY_KEY, json],
        )?;
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("db_path", &self.db_path)
            .field("records", &self.records.len())
            .finish()
    }
}
