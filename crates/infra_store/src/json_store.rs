//! Whole-collection JSON record store
//!
//! Collections are held in memory as JSON arrays and written back one file
//! per collection. Writes go to a temporary file that is then renamed over
//! the collection file, so a crash mid-write leaves the previous contents.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::StoreConfig;
use crate::error::StoreError;

/// The collections kept by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    MessBills,
    Users,
    MealRecords,
    Messes,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::MessBills,
        Collection::Users,
        Collection::MealRecords,
        Collection::Messes,
    ];

    /// Storage key of the collection
    pub fn key(&self) -> &'static str {
        match self {
            Collection::MessBills => "mess_bills",
            Collection::Users => "users",
            Collection::MealRecords => "meal_records",
            Collection::Messes => "messes",
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.key())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Default)]
struct StoreState {
    collections: HashMap<Collection, Value>,
    dirty: HashSet<Collection>,
}

/// File-backed record store
///
/// Created with [`JsonRecordStore::open`] at start-up and shut down with
/// [`JsonRecordStore::close`]. All access goes through an async `RwLock`.
#[derive(Debug)]
pub struct JsonRecordStore {
    config: StoreConfig,
    state: RwLock<StoreState>,
}

impl JsonRecordStore {
    /// Opens the store, loading every collection file found in the data
    /// directory
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the data directory cannot be created or a
    /// collection file exists but cannot be read. Unparseable files are not
    /// errors; they are moved aside to `<collection>.json.corrupt`, logged,
    /// and the collection starts out empty.
    pub async fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let mut state = StoreState::default();

        match config.data_dir() {
            Some(dir) => {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| StoreError::io(dir, e))?;

                for collection in Collection::ALL {
                    let path = dir.join(collection.file_name());
                    if let Some(value) = read_collection(&path, collection).await? {
                        state.collections.insert(collection, value);
                    }
                }
                info!(
                    data_dir = %dir.display(),
                    loaded = state.collections.len(),
                    "Record store opened"
                );
            }
            None => info!("Record store opened in memory"),
        }

        Ok(Self {
            config,
            state: RwLock::new(state),
        })
    }

    /// Opens a store that never touches the file system
    pub fn in_memory() -> Self {
        Self {
            config: StoreConfig::in_memory(),
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Loads a whole collection
    ///
    /// Records are decoded one by one. Records that do not decode into `T`
    /// are skipped with a warning and stay in the stored collection, so a
    /// later [`save`](Self::save) carries them through unchanged.
    pub async fn load<T>(&self, collection: Collection) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        let state = self.state.read().await;
        let Some(items) = state.collections.get(&collection).and_then(Value::as_array) else {
            return Vec::new();
        };

        let mut skipped = 0;
        let records: Vec<T> = items
            .iter()
            .filter_map(|item| match T::deserialize(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    if skipped == 0 {
                        warn!(%collection, error = %e, "Stored record does not decode, skipping");
                    }
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            warn!(%collection, skipped, loaded = records.len(), "Skipped undecodable records");
        }
        records
    }

    /// Replaces a whole collection
    ///
    /// Stored records that do not decode into `T` are kept after the new
    /// records instead of being dropped.
    ///
    /// With `flush_on_write` the file is written before the in-memory
    /// collection changes, so a failed write leaves the store as it was.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the records cannot be encoded,
    /// or `StoreError::Io` if `flush_on_write` is set and the write fails.
    #[instrument(skip(self, records), fields(collection = %collection, count = records.len()))]
    pub async fn save<T>(&self, collection: Collection, records: &[T]) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut items = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|e| StoreError::serialization(collection.key(), e))?;

        let mut state = self.state.write().await;

        let carried = state
            .collections
            .get(&collection)
            .map(undecodable::<T>)
            .unwrap_or_default();
        if !carried.is_empty() {
            warn!(carried = carried.len(), "Keeping undecodable records in saved collection");
            items.extend(carried);
        }
        let value = Value::Array(items);

        if self.config.flush_on_write {
            if let Some(dir) = self.config.data_dir() {
                write_collection(dir, collection, &value).await?;
            }
            state.dirty.remove(&collection);
        } else {
            state.dirty.insert(collection);
        }
        state.collections.insert(collection, value);

        debug!("Collection saved");
        Ok(())
    }

    /// Writes every collection changed since the last flush
    ///
    /// Returns the number of files written. Does nothing for an in-memory
    /// store.
    pub async fn flush(&self) -> Result<usize, StoreError> {
        let mut state = self.state.write().await;
        self.flush_locked(&mut state).await
    }

    /// Flushes pending changes; call once at shutdown
    pub async fn close(&self) -> Result<(), StoreError> {
        let written = self.flush().await?;
        info!(written, "Record store closed");
        Ok(())
    }

    /// Collections with unflushed changes
    pub async fn pending_writes(&self) -> usize {
        self.state.read().await.dirty.len()
    }

    async fn flush_locked(&self, state: &mut StoreState) -> Result<usize, StoreError> {
        let Some(dir) = self.config.data_dir() else {
            state.dirty.clear();
            return Ok(0);
        };

        let mut written = 0;
        for collection in Collection::ALL {
            if !state.dirty.contains(&collection) {
                continue;
            }
            if let Some(value) = state.collections.get(&collection) {
                write_collection(dir, collection, value).await?;
                written += 1;
            }
            state.dirty.remove(&collection);
        }
        Ok(written)
    }

    /// Checks that the data directory is still reachable
    pub(crate) async fn check_data_dir(&self) -> Result<(), String> {
        let Some(dir) = self.config.data_dir() else {
            return Ok(());
        };
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(format!("{} is not a directory", dir.display())),
            Err(e) => Err(format!("{}: {}", dir.display(), e)),
        }
    }
}

/// Stored records of `value` that do not decode into `T`
fn undecodable<T>(value: &Value) -> Vec<Value>
where
    T: DeserializeOwned,
{
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| T::deserialize(*item).is_err())
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

async fn read_collection(path: &Path, collection: Collection) -> Result<Option<Value>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(%collection, "No stored collection, starting empty");
            return Ok(None);
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let reason = match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) if value.is_array() => return Ok(Some(value)),
        Ok(_) => "not an array".to_string(),
        Err(e) => e.to_string(),
    };

    // Moved aside so the next save cannot overwrite it
    let backup = path.with_extension("json.corrupt");
    tokio::fs::rename(path, &backup)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    warn!(
        %collection,
        path = %path.display(),
        backup = %backup.display(),
        reason = %reason,
        "Stored collection is unreadable, moved aside and starting empty"
    );
    Ok(None)
}

async fn write_collection(dir: &Path, collection: Collection, value: &Value) -> Result<(), StoreError> {
    let path = dir.join(collection.file_name());
    let tmp: PathBuf = dir.join(format!("{}.tmp", collection.file_name()));

    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::serialization(collection.key(), e))?;

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, &path)
        .await
        .map_err(|e| StoreError::io(&path, e))?;

    debug!(%collection, bytes = bytes.len(), "Collection written");
    Ok(())
}
