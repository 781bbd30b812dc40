//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - The saved roster, custom categories and settings
//!
//! Callers treat storage as best-effort: a failed write is logged, never fatal.

use crate::app::settings::Settings;
use crate::game::catalog::Category;
use crate::game::{Player, PlayerColor, PlayerId, PALETTE};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta, roster, custom_categories, settings
const SCHEMA_VERSION: u32 = 1;

/// File name of the database inside the data directory.
pub const DB_FILE: &str = "impostor.db";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),
    #[error("invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
}

/// The main storage handle.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database in the OS-standard data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/impostor/` or `~/.local/share/impostor/`
    /// - macOS: `~/Library/Application Support/impostor/`
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&Self::data_dir()?)
    }

    /// Open or create the database inside `dir`, creating the directory.
    pub fn open_at(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(StorageError::CreateDirFailed)?;
        let conn = Connection::open(dir.join(DB_FILE))?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open a throwaway in-memory database (tests and `--no-save`).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "impostor")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    // === Roster ===

    /// Saved players in roster order.
    pub fn load_roster(&self) -> Result<Vec<Player>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM roster ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut players = Vec::new();
        for (position, row) in rows.enumerate() {
            let (id, name, color) = row?;
            // Unknown hex codes fall back to the palette slot of the position
            let color = PlayerColor::from_hex(&color).unwrap_or(PALETTE[position % PALETTE.len()]);
            players.push(Player::new(PlayerId::new(id), name, color));
        }
        Ok(players)
    }

    /// Replace the saved roster, keeping the given order.
    pub fn save_roster(&mut self, players: &[Player]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM roster", [])?;
        for (position, player) in players.iter().enumerate() {
            tx.execute(
                "INSERT INTO roster (position, id, name, color) VALUES (?1, ?2, ?3, ?4)",
                params![
                    position as i64,
                    player.id.as_str(),
                    &player.name,
                    player.color.hex()
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // === Custom categories ===

    /// Saved custom categories in creation order.
    pub fn load_custom_categories(&self) -> Result<Vec<Category>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, words_json FROM custom_categories ORDER BY created_at, rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut categories = Vec::new();
        for row in rows {
            let (id, name, words_json) = row?;
            let words: Vec<String> = serde_json::from_str(&words_json)?;
            categories.push(Category { id, name, words });
        }
        Ok(categories)
    }

    /// Insert a custom category, or update it if the id already exists.
    pub fn save_custom_category(&self, category: &Category) -> Result<(), StorageError> {
        let words_json = serde_json::to_string(&category.words)?;
        self.conn.execute(
            "INSERT INTO custom_categories (id, name, words_json, created_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, words_json = excluded.words_json",
            params![&category.id, &category.name, words_json, now_millis()],
        )?;
        Ok(())
    }

    /// Delete a custom category. Returns whether a row was removed.
    pub fn remove_custom_category(&self, id: &str) -> Result<bool, StorageError> {
        let removed = self
            .conn
            .execute("DELETE FROM custom_categories WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    // === Settings ===

    /// Saved settings, or the defaults if none were ever saved.
    pub fn load_settings(&self) -> Result<Settings, StorageError> {
        let payload: Option<String> = self
            .conn
            .query_row("SELECT payload_json FROM settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match payload {
            Some(json) => Ok(serde_json::from_str::<Settings>(&json)?.sanitized()),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let payload = serde_json::to_string(settings)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (id, payload_json) VALUES (1, ?1)",
            params![payload],
        )?;
        Ok(())
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database was written by a newer build
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        Ok(version.unwrap_or(0))
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version and creation time
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Saved roster, one row per player in seating order
            CREATE TABLE IF NOT EXISTS roster (
                position INTEGER PRIMARY KEY,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                color TEXT NOT NULL
            );

            -- User-defined categories; words stored as a JSON array
            CREATE TABLE IF NOT EXISTS custom_categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                words_json TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Single-row settings blob
            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                payload_json TEXT NOT NULL
            );
            "#,
        )?;

        self.conn.execute("DELETE FROM meta", [])?;
        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
