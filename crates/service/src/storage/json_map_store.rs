use std::{collections::BTreeMap, marker::PhantomData, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// The file is the only source of truth: every call reads the whole map from
/// disk, and every mutation writes the whole map back. Calls through one
/// handle are serialized by an async `RwLock`, so concurrent mutations in a
/// process cannot lose each other's updates. Separate processes sharing the
/// file are not coordinated.
///
/// A missing file reads as an empty map. Saves are atomic: the map is
/// written pretty-printed to a sibling temp file which is renamed over the
/// target.
pub struct JsonMapStore<K, V> {
    lock: RwLock<()>,
    file_path: PathBuf,
    _entries: PhantomData<fn() -> (K, V)>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + serde::Serialize + serde::de::DeserializeOwned,
    V: serde::Serialize + serde::de::DeserializeOwned,
{
    /// Bind the store to a path, creating the parent directory if missing.
    /// The file itself is not created until the first save.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::StoreWrite(format!("{}: {e}", parent.display())))?;
        }
        Ok(Arc::new(Self { lock: RwLock::new(()), file_path, _entries: PhantomData }))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    async fn read_map(&self) -> Result<BTreeMap<K, V>, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::StoreRead(format!("{}: {e}", self.file_path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ServiceError::StoreRead(format!("{}: {e}", self.file_path.display()))),
        }
    }

    async fn write_map(&self, map: &BTreeMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(map).map_err(|e| ServiceError::StoreWrite(e.to_string()))?;
        let tmp = self.temp_path();
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::StoreWrite(format!("{}: {e}", tmp.display())))?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::StoreWrite(format!("{}: {e}", self.file_path.display())));
        }
        debug!(path = %self.file_path.display(), entries = map.len(), "json map saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        self.file_path.with_file_name(format!(".{name}.tmp"))
    }

    /// Load the full map from disk.
    pub async fn load(&self) -> Result<BTreeMap<K, V>, ServiceError> {
        let _guard = self.lock.read().await;
        self.read_map().await
    }

    /// Replace the full map on disk.
    pub async fn save(&self, map: &BTreeMap<K, V>) -> Result<(), ServiceError> {
        let _guard = self.lock.write().await;
        self.write_map(map).await
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Result<Option<V>, ServiceError> {
        let mut map = self.load().await?;
        Ok(map.remove(key))
    }

    /// Load, apply a mutation, and persist. The map is saved only when `f`
    /// succeeds, so a rejected mutation leaves the file untouched.
    pub async fn update_map<F, T>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut BTreeMap<K, V>) -> Result<T, ServiceError>,
    {
        let _guard = self.lock.write().await;
        let mut map = self.read_map().await?;
        let out = f(&mut map)?;
        self.write_map(&map).await?;
        Ok(out)
    }
}
