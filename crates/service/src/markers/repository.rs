use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::markers::model::{CreateMarkerInput, Marker, MarkerId, UpdateMarkerInput};
use crate::markers::MarkerMap;

/// Trait abstraction for marker persistence used by the HTTP layer.
/// Implementations can be file-backed or anything else that keeps the
/// id-assignment and merge rules of the file store.
#[async_trait]
pub trait MarkerRepository: Send + Sync {
    async fn list(&self) -> Result<MarkerMap, ServiceError>;
    async fn get(&self, id: MarkerId) -> Result<Marker, ServiceError>;
    async fn create(&self, input: CreateMarkerInput) -> Result<Marker, ServiceError>;
    async fn update(&self, id: MarkerId, input: UpdateMarkerInput) -> Result<Marker, ServiceError>;
    async fn delete(&self, id: MarkerId) -> Result<(), ServiceError>;
}
