use crate::errors::StoreError;
use crate::models::{DailyRecordSet, TargetSet};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;
use tracing::{debug, error};

pub const DAILY_SALES_KEY: &str = "dailyStaffSalesData";
pub const STAFF_TARGETS_KEY: &str = "staffTargetsData";

/// Whole-document get/set storage, the way browser local storage behaves.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Replaces the entire document under `key`.
    fn set(
        &self,
        key: &str,
        document: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// All documents in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                key: self.path.display().to_string(),
                source,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut documents = self.read_all().await?;
        Ok(documents.remove(key))
    }

    async fn set(&self, key: &str, document: Value) -> Result<(), StoreError> {
        let mut documents = match self.read_all().await {
            Ok(documents) => documents,
            Err(StoreError::Corrupt { .. }) => {
                error!("store file {} is corrupt, rewriting it", self.path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        documents.insert(key.to_string(), document);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(&documents).map_err(StoreError::Serialize)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &self.path).await?;
        debug!("wrote document '{key}' to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send {
        let value = self
            .documents
            .lock()
            .map(|documents| documents.get(key).cloned())
            .unwrap_or_else(|poisoned| poisoned.into_inner().get(key).cloned());
        async move { Ok(value) }
    }

    fn set(
        &self,
        key: &str,
        document: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        documents.insert(key.to_string(), document);
        async { Ok(()) }
    }
}

/// Typed access to the two sales documents.
#[derive(Debug, Clone)]
pub struct SalesRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SalesRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn load_records(&self) -> Result<DailyRecordSet, StoreError> {
        self.load(DAILY_SALES_KEY).await
    }

    pub async fn save_records(&self, records: &DailyRecordSet) -> Result<(), StoreError> {
        self.save(DAILY_SALES_KEY, records).await
    }

    pub async fn load_targets(&self) -> Result<TargetSet, StoreError> {
        self.load(STAFF_TARGETS_KEY).await
    }

    pub async fn save_targets(&self, targets: &TargetSet) -> Result<(), StoreError> {
        self.save(STAFF_TARGETS_KEY, targets).await
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.store.get(key).await? {
            Some(document) => {
                serde_json::from_value(document).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })
            }
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let document = serde_json::to_value(value).map_err(StoreError::Serialize)?;
        self.store.set(key, document).await
    }
}

/// Loads a document and falls back to an empty one when it is corrupt or unreadable.
pub async fn load_or_default<T, F, Fut>(what: &str, load: F) -> T
where
    T: Default,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match load().await {
        Ok(value) => value,
        Err(err) => {
            error!("failed to load {what}, starting empty: {err}");
            T::default()
        }
    }
}
