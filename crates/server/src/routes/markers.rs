use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use service::markers::{CreateMarkerInput, Marker, MarkerId, MarkerMap, UpdateMarkerInput};
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

// Body and path rejections are folded into the `{message}` error shape:
// a malformed body is a validation failure, a non-numeric id names no marker.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| JsonApiError::bad_request(e.body_text()))
}

fn marker_id(path: Result<Path<MarkerId>, PathRejection>) -> Result<MarkerId, JsonApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| JsonApiError::not_found("marker not found"))
}

#[utoipa::path(
    get, path = "/api/markers", tag = "markers",
    responses(
        (status = 200, description = "All markers keyed by id", body = crate::openapi::MarkerMapDoc),
        (status = 500, description = "Store read failed", body = crate::openapi::MessageDoc)
    )
)]
pub async fn list_markers(State(state): State<ServerState>) -> Result<Json<MarkerMap>, JsonApiError> {
    let map = state.markers.list().await?;
    info!(count = map.len(), "list markers");
    Ok(Json(map))
}

#[utoipa::path(
    post, path = "/api/markers", tag = "markers",
    request_body = crate::openapi::CreateMarkerDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::MarkerDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::MessageDoc),
        (status = 500, description = "Store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn create_marker(
    State(state): State<ServerState>,
    payload: Result<Json<CreateMarkerInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Marker>), JsonApiError> {
    let input = body(payload)?;
    let marker = state.markers.create(input).await?;
    Ok((StatusCode::CREATED, Json(marker)))
}

#[utoipa::path(
    get, path = "/api/markers/{id}", tag = "markers",
    params(("id" = u64, Path, description = "Marker id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::MarkerDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get_marker(
    State(state): State<ServerState>,
    path: Result<Path<MarkerId>, PathRejection>,
) -> Result<Json<Marker>, JsonApiError> {
    let id = marker_id(path)?;
    Ok(Json(state.markers.get(id).await?))
}

#[utoipa::path(
    put, path = "/api/markers/{id}", tag = "markers",
    params(("id" = u64, Path, description = "Marker id")),
    request_body = crate::openapi::UpdateMarkerDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MarkerDoc),
        (status = 400, description = "Neither latlng nor data given", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn update_marker(
    State(state): State<ServerState>,
    path: Result<Path<MarkerId>, PathRejection>,
    payload: Result<Json<UpdateMarkerInput>, JsonRejection>,
) -> Result<Json<Marker>, JsonApiError> {
    let id = marker_id(path)?;
    let input = body(payload)?;
    Ok(Json(state.markers.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/api/markers/{id}", tag = "markers",
    params(("id" = u64, Path, description = "Marker id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::MessageDoc),
        (status = 500, description = "Store failure", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete_marker(
    State(state): State<ServerState>,
    path: Result<Path<MarkerId>, PathRejection>,
) -> Result<Json<MessageBody>, JsonApiError> {
    let id = marker_id(path)?;
    state.markers.delete(id).await?;
    Ok(Json(MessageBody::new(format!("marker {id} deleted"))))
}
