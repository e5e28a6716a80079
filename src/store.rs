//! Storage for the latest recognized menu per key (e.g. per kitchen).
//!
//! One JSON document per key, overwritten on each new recognition.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Menu;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid store key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// A recognized menu tagged with the ISO week it was recognized in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMenu {
    /// ISO 8601 calendar week (1-53).
    pub calendar_week: u32,
    pub language: String,
    pub menu: Menu,
    pub recognized_at: DateTime<Utc>,
}

impl WeeklyMenu {
    pub fn new(menu: Menu, language: &str, recognized_at: DateTime<Utc>) -> Self {
        Self {
            calendar_week: calendar_week(recognized_at.date_naive()),
            language: language.to_string(),
            menu,
            recognized_at,
        }
    }
}

pub fn calendar_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

pub trait MenuStore: Send + Sync {
    fn save(&self, key: &str, menu: &WeeklyMenu) -> Result<(), StoreError>;

    fn load(&self, key: &str) -> Result<Option<WeeklyMenu>, StoreError>;
}

// ═══════════════════════════════════════════════════════════
// JSON files
// ═══════════════════════════════════════════════════════════

/// `<dir>/<key>.json`, written atomically via a temp file + rename.
pub struct JsonFileMenuStore {
    dir: PathBuf,
}

impl JsonFileMenuStore {
    pub fn new(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

/// Keys become file names: letters, digits and `@._-` only.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

impl MenuStore for JsonFileMenuStore {
    fn save(&self, key: &str, menu: &WeeklyMenu) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let json = serde_json::to_vec_pretty(menu)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(key, path = %path.display(), week = menu.calendar_week, "Menu saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<WeeklyMenu>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// In-memory
// ═══════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MemoryMenuStore {
    menus: RwLock<HashMap<String, WeeklyMenu>>,
}

impl MemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MenuStore for MemoryMenuStore {
    fn save(&self, key: &str, menu: &WeeklyMenu) -> Result<(), StoreError> {
        validate_key(key)?;
        self.menus
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(key.to_string(), menu.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<WeeklyMenu>, StoreError> {
        validate_key(key)?;
        Ok(self
            .menus
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .get(key)
            .cloned())
    }
}
