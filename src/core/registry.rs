use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};

use crate::models::error::Error;
use crate::utils::json::Json;

/// File name of the game's mod catalog, kept directly under the game
/// directory.
pub const REGISTRY_FILE_NAME: &str = "mods_registry.json";

/// The persisted mod catalog: one JSON object mapping UUID keys to untyped
/// record objects. Records stay untyped so fields written by other tools
/// survive a merge untouched.
#[derive(Debug)]
pub struct Registry {
    path: Utf8PathBuf,
    records: Map<String, Value>,
}

impl Registry {
    /// Reads the catalog from disk. An absent file is an empty catalog.
    pub fn load(path: &Utf8Path) -> Result<Self, Error> {
        let records = if path.exists() {
            Json::read(path)?
        } else {
            Map::new()
        };

        Ok(Self {
            path: path.to_owned(),
            records,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finds the record registered for a mod's external id, with its key.
    pub fn find_by_steam_id(&self, steam_id: &str) -> Option<(&String, &Value)> {
        self.records
            .iter()
            .find(|(_, record)| record.get("steamId").and_then(Value::as_str) == Some(steam_id))
    }

    /// Replaces or inserts a single record, leaving every other key alone.
    pub fn upsert(&mut self, id: String, record: Map<String, Value>) {
        self.records.insert(id, Value::Object(record));
    }

    /// Rewrites the whole document; the catalog is never patched in place.
    pub fn persist(&self) -> Result<(), Error> {
        tracing::debug!(path = %self.path, records = self.records.len(), "persisting mod registry");
        Json::write(&self.path, &self.records)
    }
}
