// File: src/draft.rs
// Purpose: Persistent draft snapshots, one per form type

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::MedformsConfig;
use crate::form_data::FormData;

/// Flat field-name to value mapping persisted between page views.
///
/// The only entity that outlives a navigation. Keys are flat submitted
/// names, so dynamic-set entries appear as e.g. `medications[0][name]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot(BTreeMap<String, String>);

impl DraftSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_form(form: &FormData) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in form.entries() {
            snapshot.insert(name, value);
        }
        snapshot
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|v| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Local persistent store for drafts, keyed by a fixed string per form
/// type. Only one autosave writer is active per key in a page context.
///
/// Note: keys are shared across everyone using the same profile, not
/// scoped per logged-in user. Inherited behavior, kept as-is.
pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<DraftSnapshot>>;
    fn set(&self, key: &str, snapshot: &DraftSnapshot) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn exists(&self, key: &str) -> Result<bool>;
    fn name(&self) -> &'static str;
}

/// In-memory store. Fast, non-persistent; the test and preview backend.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<String, DraftSnapshot>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.drafts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DraftStore for MemoryDraftStore {
    fn get(&self, key: &str) -> Result<Option<DraftSnapshot>> {
        let drafts = self.drafts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(drafts.get(key).cloned())
    }

    fn set(&self, key: &str, snapshot: &DraftSnapshot) -> Result<()> {
        let mut drafts = self.drafts.write().unwrap_or_else(PoisonError::into_inner);
        drafts.insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut drafts = self.drafts.write().unwrap_or_else(PoisonError::into_inner);
        drafts.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let drafts = self.drafts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(drafts.contains_key(key))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Filesystem store: one JSON file per key under a configured directory.
/// Persistent across page views, the production backend.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("Failed to create draft directory")?;
        Ok(Self { dir })
    }

    /// Draft directory taken from the loaded configuration.
    pub fn from_config(config: &MedformsConfig) -> Result<Self> {
        Self::new(config.draft.dir.as_str())
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        // Sanitize key to make it filesystem-safe
        let safe_key = key.replace(['/', '\\', ':'], "_");
        self.dir.join(format!("{}.json", safe_key))
    }
}

impl DraftStore for FileDraftStore {
    fn get(&self, key: &str) -> Result<Option<DraftSnapshot>> {
        let path = self.key_to_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).context("Failed to read draft file")?;

        // A corrupt draft is "no draft", never a user-visible error
        match serde_json::from_str(&content) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) => {
                warn!(key = %key, error = %err, "discarding malformed draft");
                fs::remove_file(&path).ok();
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, snapshot: &DraftSnapshot) -> Result<()> {
        let path = self.key_to_path(key);
        let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize draft")?;
        fs::write(&path, json).context("Failed to write draft file")?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.key_to_path(key);
        if path.exists() {
            fs::remove_file(&path).context("Failed to delete draft file")?;
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.key_to_path(key).exists())
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}
