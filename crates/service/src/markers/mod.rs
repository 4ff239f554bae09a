//! Garden markers: plant records with a position on the garden picture and
//! descriptive data, persisted in a single JSON file.

pub mod model;
pub mod repository;
pub mod store;

use std::collections::BTreeMap;

pub use model::{CreateMarkerInput, LatLng, Marker, MarkerData, MarkerDataPatch, MarkerId, MarkerRecord, UpdateMarkerInput};
pub use repository::MarkerRepository;
pub use store::{next_id, MarkerStore};

/// Full store contents, ordered by id.
pub type MarkerMap = BTreeMap<MarkerId, MarkerRecord>;
