use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::errors::StateError;

/// Last-seen entry identifier per newsletter name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedState {
    last_seen: BTreeMap<String, String>,
}

impl FeedState {
    /// Read the state file; a missing file is an empty state
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No state file at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    /// Replace the state file in one rename so a crash mid-write keeps the old file
    pub fn save(&self, path: &Path) -> Result<(), StateError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(path)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.last_seen.get(name).map(String::as_str)
    }

    pub fn record(&mut self, name: &str, id: &str) {
        self.last_seen.insert(name.to_string(), id.to_string());
    }
}
