// SQLite store - same state as the JSON document, plus an append-only
// log of when each decision was first saved.

use super::{DurableState, StateStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One saved decision from the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// "merge" or "section"
    pub kind: String,

    /// Raw name (merge) or canonical item (section)
    pub subject: String,

    /// Canonical item (merge) or section name (section)
    pub target: String,

    pub recorded_at: DateTime<Utc>,
}

pub struct SqliteStateStore {
    conn: Connection,
    label: String,
}

impl SqliteStateStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open state database: {}", path.display()))?;
        Self::with_connection(conn, path.display().to_string())
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, label: String) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStateStore { conn, label })
    }

    /// Full audit log, oldest first
    pub fn decisions(&self) -> Result<Vec<Decision>> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, subject, target, recorded_at FROM decisions ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            let recorded_at: String = row.get(3)?;
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, recorded_at))
        })?;

        let mut decisions = Vec::new();
        for row in rows {
            let (kind, subject, target, recorded_at): (String, String, String, String) = row?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
                .with_context(|| format!("Bad timestamp in decision log: {}", recorded_at))?
                .with_timezone(&Utc);
            decisions.push(Decision {
                kind,
                subject,
                target,
                recorded_at,
            });
        }

        Ok(decisions)
    }
}

fn setup_database(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sections (
            position INTEGER NOT NULL,
            name TEXT PRIMARY KEY
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS section_items (
            section TEXT NOT NULL REFERENCES sections(name),
            position INTEGER NOT NULL,
            item TEXT PRIMARY KEY
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS equivalence (
            position INTEGER NOT NULL,
            raw_name TEXT PRIMARY KEY,
            canonical TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS decisions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            subject TEXT NOT NULL,
            target TEXT NOT NULL,
            recorded_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> Result<DurableState> {
        let mut state = DurableState::new();

        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sections ORDER BY position")?;
        let sections: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;

        let mut stmt = self
            .conn
            .prepare("SELECT item FROM section_items WHERE section = ?1 ORDER BY position")?;
        for section in &sections {
            let items: Vec<String> = stmt
                .query_map(params![section], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            state.items_per_section.insert_section(section, items);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT raw_name, canonical FROM equivalence ORDER BY position")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        for row in rows {
            let (raw, canonical): (String, String) = row?;
            state.equivalence.insert(raw, canonical);
        }

        debug!(
            sections = sections.len(),
            merges = state.equivalence.len(),
            "loaded state from sqlite"
        );

        Ok(state)
    }

    fn save(&self, state: &DurableState) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();

        let known_merges: HashSet<(String, String)> = {
            let mut stmt = tx.prepare("SELECT raw_name, canonical FROM equivalence")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let pairs = rows.collect::<rusqlite::Result<HashSet<_>>>()?;
            pairs
        };
        let known_items: HashSet<(String, String)> = {
            let mut stmt = tx.prepare("SELECT item, section FROM section_items")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let pairs = rows.collect::<rusqlite::Result<HashSet<_>>>()?;
            pairs
        };

        tx.execute("DELETE FROM section_items", [])?;
        tx.execute("DELETE FROM sections", [])?;
        tx.execute("DELETE FROM equivalence", [])?;

        for (section_pos, (section, items)) in state.items_per_section.iter().enumerate() {
            tx.execute(
                "INSERT INTO sections (position, name) VALUES (?1, ?2)",
                params![section_pos as i64, section],
            )?;

            for (pos, item) in items.iter().enumerate() {
                tx.execute(
                    "INSERT INTO section_items (section, position, item) VALUES (?1, ?2, ?3)",
                    params![section, pos as i64, item],
                )?;

                if !known_items.contains(&(item.clone(), section.to_string())) {
                    tx.execute(
                        "INSERT INTO decisions (kind, subject, target, recorded_at)
                         VALUES ('section', ?1, ?2, ?3)",
                        params![item, section, now],
                    )?;
                }
            }
        }

        for (pos, (raw, canonical)) in state.equivalence.iter().enumerate() {
            tx.execute(
                "INSERT INTO equivalence (position, raw_name, canonical) VALUES (?1, ?2, ?3)",
                params![pos as i64, raw, canonical],
            )?;

            if !known_merges.contains(&(raw.clone(), canonical.clone())) {
                tx.execute(
                    "INSERT INTO decisions (kind, subject, target, recorded_at)
                     VALUES ('merge', ?1, ?2, ?3)",
                    params![raw, canonical, now],
                )?;
            }
        }

        tx.commit().context("Failed to commit state")?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> DurableState {
        let mut state = DurableState::new();
        state.items_per_section.assign("Gemüse", "Tomaten");
        state.items_per_section.assign("Gemüse", "Gurke");
        state.items_per_section.assign("Getränke", "Wasser");
        state.equivalence.insert("Tomate".to_string(), "Tomaten".to_string());
        state
    }

    #[test]
    fn test_empty_database_loads_empty() {
        let store = SqliteStateStore::open_in_memory().unwrap();
        assert_eq!(store.load().unwrap(), DurableState::new());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let store = SqliteStateStore::open_in_memory().unwrap();
        let state = sample_state();

        store.save(&state).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);

        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_empty_section_survives() {
        let store = SqliteStateStore::open_in_memory().unwrap();
        let state: DurableState =
            serde_json::from_str(r#"{"items_per_section": {"Leer": []}}"#).unwrap();

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_decisions_logged_once() {
        let store = SqliteStateStore::open_in_memory().unwrap();
        let mut state = sample_state();

        store.save(&state).unwrap();
        store.save(&state).unwrap();

        // 3 section entries + 1 merge, not repeated by the second save
        let decisions = store.decisions().unwrap();
        assert_eq!(decisions.len(), 4);
        assert_eq!(decisions.iter().filter(|d| d.kind == "merge").count(), 1);

        state.equivalence.insert("Gurken".to_string(), "Gurke".to_string());
        store.save(&state).unwrap();

        let decisions = store.decisions().unwrap();
        assert_eq!(decisions.len(), 5);
        let last = decisions.last().unwrap();
        assert_eq!(last.subject, "Gurken");
        assert_eq!(last.target, "Gurke");
    }

    #[test]
    fn test_file_backed_store_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("einkauf.sqlite");

        SqliteStateStore::open(&path).unwrap().save(&sample_state()).unwrap();
        let reopened = SqliteStateStore::open(&path).unwrap();

        assert_eq!(reopened.load().unwrap(), sample_state());
    }
}
