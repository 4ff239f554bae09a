use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::errors::ServiceError;
use service::markers::{CreateMarkerInput, Marker, MarkerId, MarkerMap, MarkerRepository, MarkerStore, UpdateMarkerInput};
use tower::Service;
use uuid::Uuid;

use server::routes::{self, ServerState};
use server::startup::build_cors;

struct TestApp {
    router: Router,
    markers_file: PathBuf,
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&v)?))?,
            None => builder.body(Body::empty())?,
        };
        let resp = self.router.clone().call(req).await?;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    async fn list(&self) -> anyhow::Result<Value> {
        let (status, body) = self.send("GET", "/api/markers", None).await?;
        assert_eq!(status, StatusCode::OK);
        Ok(body)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.markers_file);
    }
}

async fn build_app() -> anyhow::Result<TestApp> {
    let markers_file = std::env::temp_dir().join(format!("garden_api_{}.json", Uuid::new_v4()));
    let store = MarkerStore::new(&markers_file).await?;
    let state = ServerState::new(store);
    let router = routes::build_router(state, build_cors(), "/nonexistent-frontend");
    Ok(TestApp { router, markers_file })
}

fn rose() -> Value {
    json!({"latlng": {"lat": 1, "lng": 2}, "data": {"name": "Rose"}})
}

#[tokio::test]
async fn create_list_delete_scenario() -> anyhow::Result<()> {
    let app = build_app().await?;
    assert_eq!(app.list().await?, json!({}));

    let (status, created) = app.send("POST", "/api/markers", Some(rose())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": 0, "latlng": {"lat": 1.0, "lng": 2.0}, "data": {"name": "Rose"}}));

    let (status, second) = app.send("POST", "/api/markers", Some(rose())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], 1);

    let (status, body) = app.send("DELETE", "/api/markers/0", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "marker 0 deleted"}));

    let list = app.list().await?;
    let keys: Vec<&String> = list.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["1"]);
    assert_eq!(list["1"]["data"]["name"], "Rose");
    Ok(())
}

#[tokio::test]
async fn create_without_name_is_rejected_and_not_persisted() -> anyhow::Result<()> {
    let app = build_app().await?;
    app.send("POST", "/api/markers", Some(rose())).await?;
    let before = app.list().await?;

    let bad_bodies = [
        json!({"latlng": {"lat": 1, "lng": 2}, "data": {"name": ""}}),
        json!({"latlng": {"lat": 1, "lng": 2}, "data": {"logbook": "x"}}),
        json!({"latlng": {"lat": 1, "lng": 2}}),
        json!({"data": {"name": "Rose"}}),
        json!({"latlng": {"lat": "north", "lng": 2}, "data": {"name": "Rose"}}),
    ];
    for bad in bad_bodies {
        let (status, body) = app.send("POST", "/api/markers", Some(bad)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
    assert_eq!(app.list().await?, before);
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_a_bad_request() -> anyhow::Result<()> {
    let app = build_app().await?;
    let req = Request::builder()
        .method("POST")
        .uri("/api/markers")
        .header("content-type", "application/json")
        .body(Body::from("{ nope"))?;
    let resp = app.router.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn update_merges_data_and_replaces_latlng() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, created) = app
        .send("POST", "/api/markers", Some(json!({"latlng": {"lat": 5, "lng": 5}, "data": {"name": "A", "logbook": "x"}})))
        .await?;
    let uri = format!("/api/markers/{}", created["id"]);

    let (status, updated) = app.send("PUT", &uri, Some(json!({"data": {"logbook": "y"}}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"], json!({"name": "A", "logbook": "y"}));
    assert_eq!(updated["latlng"], json!({"lat": 5.0, "lng": 5.0}));

    let (status, moved) = app.send("PUT", &uri, Some(json!({"latlng": {"lat": 11, "lng": 12}}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["latlng"], json!({"lat": 11.0, "lng": 12.0}));
    assert_eq!(moved["data"], json!({"name": "A", "logbook": "y"}));

    let (status, fetched) = app.send("GET", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, moved);
    Ok(())
}

#[tokio::test]
async fn null_data_fields_change_nothing() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, created) = app
        .send("POST", "/api/markers", Some(json!({"latlng": {"lat": 1, "lng": 1}, "data": {"name": "A", "logbook": "x", "color": "red", "height": null}})))
        .await?;
    assert_eq!(created["data"], json!({"name": "A", "logbook": "x", "color": "red"}));

    let uri = format!("/api/markers/{}", created["id"]);
    let (status, updated) = app
        .send("PUT", &uri, Some(json!({"data": {"logbook": null, "color": null, "height": null}})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"], created["data"]);
    assert_eq!(app.list().await?["0"]["data"], created["data"]);
    Ok(())
}

#[tokio::test]
async fn update_without_fields_is_a_bad_request() -> anyhow::Result<()> {
    let app = build_app().await?;
    app.send("POST", "/api/markers", Some(rose())).await?;
    let (status, body) = app.send("PUT", "/api/markers/0", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn missing_ids_are_not_found_and_store_unchanged() -> anyhow::Result<()> {
    let app = build_app().await?;
    app.send("POST", "/api/markers", Some(rose())).await?;
    let before = app.list().await?;

    let (status, body) = app.send("PUT", "/api/markers/99", Some(json!({"data": {"name": "B"}}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, _) = app.send("DELETE", "/api/markers/99", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send("GET", "/api/markers/not-a-number", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    assert_eq!(app.list().await?, before);
    Ok(())
}

#[tokio::test]
async fn list_is_stable_and_survives_restart() -> anyhow::Result<()> {
    let app = build_app().await?;
    for name in ["Rose", "Tulip", "Basil"] {
        app.send("POST", "/api/markers", Some(json!({"latlng": {"lat": 3, "lng": 4}, "data": {"name": name, "plantedDate": "2024-05-01"}})))
            .await?;
    }
    let first = app.list().await?;
    let second = app.list().await?;
    assert_eq!(first, second);

    // a new store over the same file sees what the API returned
    let reloaded = MarkerStore::new(&app.markers_file).await?;
    let map = reloaded.list().await?;
    assert_eq!(serde_json::to_value(&map)?, first);
    assert_eq!(map.len(), 3);
    Ok(())
}

#[tokio::test]
async fn malformed_store_file_is_a_server_error() -> anyhow::Result<()> {
    let app = build_app().await?;
    tokio::fs::write(&app.markers_file, b"[1, 2").await?;
    let (status, body) = app.send("GET", "/api/markers", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap_or_default().contains("failed to read store"));

    let (status, _) = app.send("POST", "/api/markers", Some(rose())).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

/// Repository whose every call fails the way a broken disk would.
struct BrokenDisk;

#[async_trait::async_trait]
impl MarkerRepository for BrokenDisk {
    async fn list(&self) -> Result<MarkerMap, ServiceError> { Err(ServiceError::StoreRead("disk gone".into())) }
    async fn get(&self, _id: MarkerId) -> Result<Marker, ServiceError> { Err(ServiceError::StoreRead("disk gone".into())) }
    async fn create(&self, _input: CreateMarkerInput) -> Result<Marker, ServiceError> { Err(ServiceError::StoreWrite("disk full".into())) }
    async fn update(&self, _id: MarkerId, _input: UpdateMarkerInput) -> Result<Marker, ServiceError> { Err(ServiceError::StoreWrite("disk full".into())) }
    async fn delete(&self, _id: MarkerId) -> Result<(), ServiceError> { Err(ServiceError::StoreWrite("disk full".into())) }
}

#[tokio::test]
async fn store_failures_surface_their_message() -> anyhow::Result<()> {
    let router = routes::build_router(ServerState::new(Arc::new(BrokenDisk)), build_cors(), "/nonexistent-frontend");
    let app = TestApp { router, markers_file: std::env::temp_dir().join(format!("garden_unused_{}.json", Uuid::new_v4())) };

    let (status, body) = app.send("GET", "/api/markers", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "failed to read store: disk gone"}));

    let (status, body) = app.send("POST", "/api/markers", Some(rose())).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "failed to write store: disk full"}));

    let (status, _) = app.send("DELETE", "/api/markers/0", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_served() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = app.send("GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, doc) = app.send("GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/markers"].is_object());
    Ok(())
}
