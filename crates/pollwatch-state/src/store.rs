//! Alert state storage.

use std::path::PathBuf;

use async_trait::async_trait;
use pollwatch_core::AlertState;
use tokio::fs;
use tracing::debug;

use crate::error::StateStoreError;

/// Alert state storage trait.
///
/// `put` must replace the whole record atomically: a crash between
/// reads and writes may lose an update, but a reader must never see a
/// record mixing fields from two runs.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Prior state for an entity, or `None` if never observed.
    async fn get(&self, key: &str) -> Result<Option<AlertState>, StateStoreError>;

    /// Durably persist updated state for an entity.
    async fn put(&self, key: &str, state: &AlertState) -> Result<(), StateStoreError>;
}

/// In-memory state store for tests and dry experiments. Nothing
/// survives the process.
pub struct MemoryStateStore {
    states: tokio::sync::RwLock<std::collections::HashMap<String, AlertState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self {
            states: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }

    /// All stored records, for test assertions.
    pub async fn snapshot(&self) -> std::collections::HashMap<String, AlertState> {
        self.states.read().await.clone()
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<AlertState>, StateStoreError> {
        let states = self.states.read().await;
        Ok(states.get(key).cloned())
    }

    async fn put(&self, key: &str, state: &AlertState) -> Result<(), StateStoreError> {
        let mut states = self.states.write().await;
        states.insert(key.to_string(), state.clone());
        Ok(())
    }
}

/// File system based state store.
///
/// One JSON file per entity:
/// ```text
/// {state_dir}/
/// ├── agent-health--telemetry-agent.json
/// ├── job-queue--processing-queue.json
/// └── ...
/// ```
///
/// Writes go to a temp file in the same directory and are renamed over
/// the record, so a reader never observes a partial write. Writers
/// within one process are serialized by an internal lock; across
/// processes the store assumes a single writer per entity, which the
/// cron-style one-shot invocation model provides.
pub struct FileStateStore {
    state_dir: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileStateStore {
    /// Open (and create if needed) a state directory.
    pub async fn new(state_dir: impl Into<PathBuf>) -> Result<Self, StateStoreError> {
        let state_dir = state_dir.into();
        fs::create_dir_all(&state_dir).await?;

        debug!("FileStateStore initialized at {:?}", state_dir);

        Ok(Self {
            state_dir,
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", Self::sanitize_key(key)))
    }

    /// Sanitize a state key for use as a file name.
    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, key: &str) -> Result<Option<AlertState>, StateStoreError> {
        let path = self.record_path(key);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let state: AlertState = serde_json::from_str(&content).map_err(|e| {
            StateStoreError::Serialization(format!("failed to decode {:?}: {}", path, e))
        })?;

        Ok(Some(state))
    }

    async fn put(&self, key: &str, state: &AlertState) -> Result<(), StateStoreError> {
        let _guard = self.write_lock.lock().await;

        let path = self.record_path(key);
        let tmp = path.with_extension("json.tmp");

        let content = serde_json::to_string_pretty(state).map_err(|e| {
            StateStoreError::Serialization(format!("failed to encode state for '{}': {}", key, e))
        })?;

        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Saved state for '{}' to {:?}", key, path);
        Ok(())
    }
}
