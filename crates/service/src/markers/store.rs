use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::markers::model::{CreateMarkerInput, Marker, MarkerId, MarkerRecord, UpdateMarkerInput};
use crate::markers::repository::MarkerRepository;
use crate::markers::MarkerMap;
use crate::storage::json_map_store::JsonMapStore;

/// Next id: one past the highest id currently stored, or 0 for an empty map.
/// Only present ids count, so deleting the highest record frees its id.
/// Fails when the highest stored id is already `MarkerId::MAX`.
pub fn next_id(map: &MarkerMap) -> Result<MarkerId, ServiceError> {
    match map.keys().next_back() {
        None => Ok(0),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| ServiceError::StoreWrite(format!("marker id space exhausted after {max}"))),
    }
}

/// File store for garden markers, persisted as `{"<id>": {latlng, data}}`.
#[derive(Clone)]
pub struct MarkerStore {
    store: Arc<JsonMapStore<MarkerId, MarkerRecord>>,
}

impl MarkerStore {
    /// Bind to the markers file. A missing file is an empty garden.
    pub async fn new<P: Into<std::path::PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<MarkerId, MarkerRecord>::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }

    /// Full id → record mapping.
    pub async fn list(&self) -> Result<MarkerMap, ServiceError> {
        let map = self.store.load().await?;
        debug!(count = map.len(), "markers loaded");
        Ok(map)
    }

    pub async fn get(&self, id: MarkerId) -> Result<Marker, ServiceError> {
        self.store
            .get(&id)
            .await?
            .map(|record| Marker::new(id, record))
            .ok_or_else(|| marker_not_found(id))
    }

    /// Validate and insert under a freshly assigned id.
    pub async fn create(&self, input: CreateMarkerInput) -> Result<Marker, ServiceError> {
        let record = input.validate()?;
        let marker = self
            .store
            .update_map(|map| {
                let id = next_id(map)?;
                map.insert(id, record.clone());
                Ok(Marker::new(id, record))
            })
            .await?;
        info!(marker_id = marker.id, name = %marker.record.data.name, "marker created");
        Ok(marker)
    }

    /// Replace `latlng` and/or shallow-merge `data` of an existing marker.
    pub async fn update(&self, id: MarkerId, input: UpdateMarkerInput) -> Result<Marker, ServiceError> {
        input.validate()?;
        let marker = self
            .store
            .update_map(|map| {
                let existing = map.get_mut(&id).ok_or_else(|| marker_not_found(id))?;
                input.apply(existing);
                Ok(Marker::new(id, existing.clone()))
            })
            .await?;
        info!(marker_id = id, "marker updated");
        Ok(marker)
    }

    pub async fn delete(&self, id: MarkerId) -> Result<(), ServiceError> {
        self.store
            .update_map(|map| map.remove(&id).map(|_| ()).ok_or_else(|| marker_not_found(id)))
            .await?;
        info!(marker_id = id, "marker deleted");
        Ok(())
    }
}

fn marker_not_found(id: MarkerId) -> ServiceError {
    ServiceError::not_found(&format!("marker {id}"))
}

#[async_trait::async_trait]
impl MarkerRepository for MarkerStore {
    async fn list(&self) -> Result<MarkerMap, ServiceError> { self.list().await }
    async fn get(&self, id: MarkerId) -> Result<Marker, ServiceError> { self.get(id).await }
    async fn create(&self, input: CreateMarkerInput) -> Result<Marker, ServiceError> { self.create(input).await }
    async fn update(&self, id: MarkerId, input: UpdateMarkerInput) -> Result<Marker, ServiceError> { self.update(id, input).await }
    async fn delete(&self, id: MarkerId) -> Result<(), ServiceError> { self.delete(id).await }
}
