// JSON document store (the default "einkauf.db")

use super::{DurableState, StateStore};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<DurableState> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved state, starting empty");
                return Ok(DurableState::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read state file: {}", self.path.display()))
            }
        };

        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }

    // Plain overwrite, no temp file + rename
    fn save(&self, state: &DurableState) -> Result<()> {
        let json = serde_json::to_string(state).context("Failed to serialize state")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> DurableState {
        let mut state = DurableState::new();
        state.items_per_section.assign("Gemüse", "Tomaten");
        state.items_per_section.assign("Gemüse", "Gurke");
        state.items_per_section.assign("Milchprodukte", "Milch");
        state.equivalence.insert("Tomate".to_string(), "Tomaten".to_string());
        state.equivalence.insert("Gurken".to_string(), "Gurke".to_string());
        state
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("einkauf.db"));

        let state = store.load().unwrap();
        assert_eq!(state, DurableState::new());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("einkauf.db"));
        let state = sample_state();

        store.save(&state).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);

        // Saving what was loaded changes nothing
        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap(), state);

        let order: Vec<&String> = loaded.equivalence.keys().collect();
        assert_eq!(order, ["Tomate", "Gurken"]);
    }

    #[test]
    fn test_reads_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("einkauf.db");
        fs::write(
            &path,
            r#"{"items_per_section": {"Brot": ["Toast"]}, "equivalence": {}}"#,
        )
        .unwrap();

        let state = JsonStateStore::new(&path).load().unwrap();
        assert_eq!(state.items_per_section.section_of("Toast"), Some("Brot"));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("einkauf.db");
        fs::write(&path, "not json").unwrap();

        let err = JsonStateStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse state file"));
    }
}
