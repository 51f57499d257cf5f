use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Flat scalar key/value settings, the shape the host store gives us: numeric
/// values under string keys, no nesting. Abstracted so the schedule store can
/// be tested against a mock.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore {
    /// `None` for an absent or non-numeric key. Absence is the normal state
    /// on first run, never an error.
    fn get(&self, key: &str) -> Result<Option<i64>>;

    fn put(&mut self, key: &str, value: i64) -> Result<()>;

    /// Removing an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// File-backed realization of [SettingsStore]: one JSON object of numbers at
/// `<app-dir>/settings.json`, read fully on open and rewritten on every put.
/// The file is small enough that synchronous whole-file writes are fine.
pub struct JsonSettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonSettingsStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = read_values(&path)?;
        Ok(Self { path, values })
    }

    fn write_out(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

fn read_values(path: &Path) -> Result<Map<String, Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str::<Map<String, Value>>(&text) {
        Ok(values) => Ok(values),
        Err(e) => {
            // Might happen after a shutdown cut a write short. Every key then
            // falls back to its default, same as a first run.
            warn!("Settings file {:?} holds illegal json: {e}", path);
            Ok(Map::new())
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.values.get(key).and_then(Value::as_i64))
    }

    fn put(&mut self, key: &str, value: i64) -> Result<()> {
        self.values
            .insert(key.to_owned(), Value::Number(Number::from(value)));
        self.write_out()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_none() {
            return Ok(());
        }
        self.write_out()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{JsonSettingsStore, SettingsStore};

    #[test]
    fn missing_file_reads_as_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonSettingsStore::open(dir.path().join("settings.json"))?;
        assert_eq!(store.get("workStartTime")?, None);
        Ok(())
    }

    #[test]
    fn puts_survive_reopening() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");

        let mut store = JsonSettingsStore::open(path.clone())?;
        store.put("workStartTime", 1_734_000_000)?;
        store.put("workEndTime", 1_734_030_000)?;

        let reopened = JsonSettingsStore::open(path)?;
        assert_eq!(reopened.get("workStartTime")?, Some(1_734_000_000));
        assert_eq!(reopened.get("workEndTime")?, Some(1_734_030_000));
        Ok(())
    }

    #[test]
    fn corrupted_file_degrades_to_empty_and_stays_writable() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{\"workStartTime\": 17340")?;

        let mut store = JsonSettingsStore::open(path.clone())?;
        assert_eq!(store.get("workStartTime")?, None);

        store.put("workStartTime", 42)?;
        assert_eq!(JsonSettingsStore::open(path)?.get("workStartTime")?, Some(42));
        Ok(())
    }

    #[test]
    fn removed_keys_stay_gone_after_reopening() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");

        let mut store = JsonSettingsStore::open(path.clone())?;
        store.put("workStartTime", 1)?;
        store.remove("workStartTime")?;
        store.remove("neverWritten")?;

        assert_eq!(JsonSettingsStore::open(path)?.get("workStartTime")?, None);
        Ok(())
    }

    #[test]
    fn non_numeric_value_reads_as_absent() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"workStartTime": "nine"}"#)?;

        let store = JsonSettingsStore::open(path)?;
        assert_eq!(store.get("workStartTime")?, None);
        Ok(())
    }
}
