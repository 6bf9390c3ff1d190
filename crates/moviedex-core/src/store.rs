use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use moviedex_models::User;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Bumped whenever the shape of a persisted value changes incompatibly.
pub const SCHEMA_VERSION: u32 = 1;

/// Well-known preference keys. Each key is owned by exactly one state component.
pub mod keys {
    pub const THEME_MODE: &str = "theme_mode";
    pub const LAST_SEARCH_QUERY: &str = "last_search_query";
    pub const RECENT_SEARCHES: &str = "recent_searches";
    pub const LAST_SEARCHED: &str = "last_searched";
    pub const USER: &str = "user";
    pub const FAVORITES: &str = "favorites";
}

/// Key prefix isolating one identity's data from another's.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Device-wide preferences (theme, search history, signed-in identity)
    Global,
    /// Data kept while nobody is signed in
    Anonymous,
    User(String),
}

impl Namespace {
    pub fn for_identity(user: Option<&User>) -> Self {
        match user {
            Some(user) => Namespace::User(user.id.clone()),
            None => Namespace::Anonymous,
        }
    }

    /// Directory name on disk; user ids are percent-encoded so any id is a safe file name
    fn dir_name(&self) -> String {
        match self {
            Namespace::Global => "global".to_string(),
            Namespace::Anonymous => "anonymous".to_string(),
            Namespace::User(id) => format!("user-{}", urlencoding::encode(id)),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Global => f.write_str("global"),
            Namespace::Anonymous => f.write_str("anonymous"),
            Namespace::User(id) => write!(f, "user:{}", id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    saved_at: DateTime<Utc>,
    data: T,
}

type Slot = (Namespace, String);

/// Namespaced key-value store persisted as one JSON file per key.
///
/// The in-memory copy is the source of truth for the running session. Writes
/// hit disk synchronously but never fail the caller: if persisting fails the
/// value stays in memory and a warning is logged, so a later restart may lose
/// that change. Reads validate the stored envelope and treat anything
/// unexpected as absent.
pub struct PreferenceStore {
    root: PathBuf,
    memory: Mutex<HashMap<Slot, Option<serde_json::Value>>>,
}

impl PreferenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            memory: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, namespace: &Namespace, key: &str) -> PathBuf {
        self.root.join(namespace.dir_name()).join(format!("{}.json", key))
    }

    fn memory(&self) -> MutexGuard<'_, HashMap<Slot, Option<serde_json::Value>>> {
        self.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get<T: DeserializeOwned>(&self, namespace: &Namespace, key: &str) -> Option<T> {
        let slot = (namespace.clone(), key.to_string());

        let cached = self.memory().get(&slot).cloned();
        let value = match cached {
            Some(value) => value,
            None => {
                let loaded = self.read_from_disk(namespace, key);
                self.memory().insert(slot, loaded.clone());
                loaded
            }
        }?;

        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Preference {}/{} does not match its schema: {}. Using default.", namespace, key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, namespace: &Namespace, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize preference {}/{}: {}", namespace, key, e);
                return;
            }
        };

        self.memory()
            .insert((namespace.clone(), key.to_string()), Some(value.clone()));

        if let Err(e) = self.write_to_disk(namespace, key, value) {
            warn!(
                "Failed to persist preference {}/{}: {:#}. Keeping it in memory for this session.",
                namespace, key, e
            );
        }
    }

    pub fn remove(&self, namespace: &Namespace, key: &str) {
        self.memory().insert((namespace.clone(), key.to_string()), None);

        let path = self.path_for(namespace, key);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Failed to remove preference {}/{}: {}", namespace, key, e);
            }
        }
    }

    /// Drop every stored preference, in memory and on disk
    pub fn clear_all(&self) -> Result<()> {
        self.memory().clear();
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)
                .with_context(|| format!("Failed to clear preferences at {:?}", self.root))?;
            info!("Cleared preference store: {:?}", self.root);
        }
        Ok(())
    }

    fn read_from_disk(&self, namespace: &Namespace, key: &str) -> Option<serde_json::Value> {
        let path = self.path_for(namespace, key);
        if !path.exists() {
            debug!("Preference miss: {}/{} (file does not exist)", namespace, key);
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read preference {}/{}: {}", namespace, key, e);
                return None;
            }
        };

        match serde_json::from_str::<Envelope<serde_json::Value>>(&content) {
            Ok(envelope) if envelope.version == SCHEMA_VERSION => {
                debug!("Preference hit: {}/{} (saved {})", namespace, key, envelope.saved_at);
                Some(envelope.data)
            }
            Ok(envelope) => {
                warn!(
                    "Preference {}/{} has schema version {} (expected {}). Using default.",
                    namespace, key, envelope.version, SCHEMA_VERSION
                );
                None
            }
            Err(e) => {
                warn!("Preference {}/{} is corrupted: {}. Using default.", namespace, key, e);
                None
            }
        }
    }

    fn write_to_disk(&self, namespace: &Namespace, key: &str, data: serde_json::Value) -> Result<()> {
        let path = self.path_for(namespace, key);
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("Preference path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;

        let envelope = Envelope {
            version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            data,
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &path)?;

        debug!("Preference saved: {}/{}", namespace, key);
        Ok(())
    }
}
