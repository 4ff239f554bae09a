use std::collections::HashMap;

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

/// Position in image-pixel space.
#[derive(ToSchema)]
pub struct LatLngDoc { pub lat: f64, pub lng: f64 }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDataDoc {
    pub name: String,
    pub planted_date: Option<String>,
    pub logbook: Option<String>,
    pub info_link: Option<String>,
    pub picture_repo: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDataPatchDoc {
    pub name: Option<String>,
    pub planted_date: Option<String>,
    pub logbook: Option<String>,
    pub info_link: Option<String>,
    pub picture_repo: Option<String>,
}

#[derive(ToSchema)]
pub struct MarkerRecordDoc { pub latlng: LatLngDoc, pub data: MarkerDataDoc }

#[derive(ToSchema)]
pub struct MarkerDoc { pub id: u64, pub latlng: LatLngDoc, pub data: MarkerDataDoc }

/// Keys are string-encoded marker ids.
#[derive(ToSchema)]
pub struct MarkerMapDoc(pub HashMap<String, MarkerRecordDoc>);

#[derive(ToSchema)]
pub struct CreateMarkerDoc { pub latlng: LatLngDoc, pub data: MarkerDataDoc }

#[derive(ToSchema)]
pub struct UpdateMarkerDoc { pub latlng: Option<LatLngDoc>, pub data: Option<MarkerDataPatchDoc> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::markers::list_markers,
        crate::routes::markers::create_marker,
        crate::routes::markers::get_marker,
        crate::routes::markers::update_marker,
        crate::routes::markers::delete_marker,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            LatLngDoc,
            MarkerDataDoc,
            MarkerDataPatchDoc,
            MarkerRecordDoc,
            MarkerDoc,
            MarkerMapDoc,
            CreateMarkerDoc,
            UpdateMarkerDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "markers")
    )
)]
pub struct ApiDoc;
