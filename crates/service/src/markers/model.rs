use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// Marker ids are integers in memory and string keys in the JSON file.
pub type MarkerId = u64;

/// Position in image-pixel space of the garden picture, not geographic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Descriptive payload of a plant.
///
/// Fields beyond the known ones are kept in `extra` so whatever the client
/// stored comes back unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerData {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planted_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logbook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_repo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Record as persisted under its id key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MarkerRecord {
    pub latlng: LatLng,
    #[serde(default)]
    pub data: MarkerData,
}

/// Record together with its id, the shape returned by create/update/get.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    #[serde(flatten)]
    pub record: MarkerRecord,
}

impl Marker {
    pub fn new(id: MarkerId, record: MarkerRecord) -> Self {
        Self { id, record }
    }
}

/// Partial `data` object as sent by clients. Every field is optional; a
/// present field overwrites, an absent one leaves the stored value alone.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planted_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logbook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_repo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarkerDataPatch {
    /// Shallow merge into `data`. An explicit `null` counts as absent for
    /// every field, known or not, so it never clears or adds anything.
    pub fn merge_into(self, data: &mut MarkerData) {
        if let Some(v) = self.name { data.name = v; }
        if let Some(v) = self.planted_date { data.planted_date = Some(v); }
        if let Some(v) = self.logbook { data.logbook = Some(v); }
        if let Some(v) = self.info_link { data.info_link = Some(v); }
        if let Some(v) = self.picture_repo { data.picture_repo = Some(v); }
        data.extra.extend(self.extra.into_iter().filter(|(_, v)| !v.is_null()));
    }

    fn into_data(self) -> MarkerData {
        let mut data = MarkerData::default();
        self.merge_into(&mut data);
        data
    }
}

/// Body of a create request.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateMarkerInput {
    #[serde(default)]
    pub latlng: Option<LatLng>,
    #[serde(default)]
    pub data: Option<MarkerDataPatch>,
}

impl CreateMarkerInput {
    /// Require a position, a data object and a non-blank name.
    pub fn validate(self) -> Result<MarkerRecord, ServiceError> {
        let latlng = self.latlng.ok_or_else(|| ServiceError::validation("latlng is required"))?;
        let data = self.data.ok_or_else(|| ServiceError::validation("data is required"))?;
        match data.name.as_deref() {
            Some(name) if !name.trim().is_empty() => {}
            _ => return Err(ServiceError::validation("data.name is required and must not be empty")),
        }
        Ok(MarkerRecord { latlng, data: data.into_data() })
    }
}

/// Body of an update request.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateMarkerInput {
    #[serde(default)]
    pub latlng: Option<LatLng>,
    #[serde(default)]
    pub data: Option<MarkerDataPatch>,
}

impl UpdateMarkerInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.latlng.is_none() && self.data.is_none() {
            return Err(ServiceError::validation("at least one of latlng or data is required"));
        }
        Ok(())
    }

    /// `latlng` replaces the position wholesale, `data` is shallow-merged.
    pub fn apply(self, record: &mut MarkerRecord) {
        if let Some(latlng) = self.latlng {
            record.latlng = latlng;
        }
        if let Some(patch) = self.data {
            patch.merge_into(&mut record.data);
        }
    }
}
