//! Integration tests for the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;
use wmtsgrid::{EngineBuilder, MAX_ZOOM};
use wmtsgrid_service::{router, AppState, OptionsResponse};

const TEMPLATE: &str = "http://tiles.test/wmts?COL=__COL__&ROW=__ROW__&LAYER=__LAYER__&FORMAT=__FORMAT__&ZOOM=__ZOOM__";

/// Create a test server around an engine at the given position.
fn create_test_server(col: i64, row: i64, zoom: u8) -> TestServer {
    let engine = EngineBuilder::new()
        .template(TEMPLATE)
        .position(col, row)
        .zoom(zoom)
        .layer("L")
        .format("F")
        .build()
        .unwrap();
    let state = Arc::new(AppState::new(engine, OptionsResponse::default()));
    TestServer::new(router(state)).unwrap()
}

fn default_server() -> TestServer {
    create_test_server(3715, 40025, 9)
}

#[tokio::test]
async fn test_state_endpoint() {
    let server = default_server();

    let response = server.get("/state").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["column"], 3715);
    assert_eq!(json["row"], 40025);
    assert_eq!(json["zoom"], 9);
    assert_eq!(json["matrix"], "1");
    assert_eq!(json["layer"], "L");
    assert_eq!(json["format"], "F");
}

#[tokio::test]
async fn test_tile_center() {
    let server = default_server();

    let response = server.get("/tile").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json["url"],
        "http://tiles.test/wmts?COL=3715&ROW=40025&LAYER=L&FORMAT=F&ZOOM=1"
    );
}

#[tokio::test]
async fn test_tile_offset() {
    let server = default_server();

    let response = server
        .get("/tile")
        .add_query_param("row_offset", 1)
        .add_query_param("col_offset", -1)
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(
        json["url"],
        "http://tiles.test/wmts?COL=3714&ROW=40026&LAYER=L&FORMAT=F&ZOOM=1"
    );
}

#[tokio::test]
async fn test_tile_invalid_offset() {
    let server = default_server();

    let response = server.get("/tile").add_query_param("row_offset", 2).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("offset"));
}

#[tokio::test]
async fn test_grid_uses_selection() {
    let server = default_server();

    let response = server
        .get("/grid")
        .add_query_param("layer", "ORTHO")
        .add_query_param("format", "image/png")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    let tiles = json["tiles"].as_array().unwrap();
    assert_eq!(tiles.len(), 3);
    for row in tiles {
        assert_eq!(row.as_array().unwrap().len(), 3);
    }
    assert_eq!(
        tiles[0][0],
        "http://tiles.test/wmts?COL=3714&ROW=40024&LAYER=ORTHO&FORMAT=image/png&ZOOM=1"
    );
    assert_eq!(
        tiles[2][2],
        "http://tiles.test/wmts?COL=3716&ROW=40026&LAYER=ORTHO&FORMAT=image/png&ZOOM=1"
    );
    assert!(json.get("missing").is_none());

    // Selection sticks for later requests
    let state: Value = server.get("/state").await.json();
    assert_eq!(state["layer"], "ORTHO");
    assert_eq!(state["format"], "image/png");
}

#[tokio::test]
async fn test_grid_without_selection_keeps_state() {
    let server = default_server();

    let response = server.get("/grid").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["state"]["layer"], "L");
    assert_eq!(
        json["tiles"][1][1],
        "http://tiles.test/wmts?COL=3715&ROW=40025&LAYER=L&FORMAT=F&ZOOM=1"
    );
}

#[tokio::test]
async fn test_navigate_pan() {
    let server = default_server();

    server.post("/navigate/left").await.assert_status_ok();
    server.post("/navigate/up").await.assert_status_ok();
    let response = server.post("/navigate/up").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["state"]["column"], 3714);
    assert_eq!(json["state"]["row"], 40023);
    assert_eq!(
        json["tiles"][1][1],
        "http://tiles.test/wmts?COL=3714&ROW=40023&LAYER=L&FORMAT=F&ZOOM=1"
    );
}

#[tokio::test]
async fn test_navigate_zoom_in_then_out() {
    let server = default_server();

    let response = server.post("/navigate/zoom-in").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["state"]["zoom"], 10);
    assert_eq!(json["state"]["column"], 7430);
    assert_eq!(json["state"]["matrix"], "0_5");

    let response = server.post("/navigate/zoom-out").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["state"]["zoom"], 9);
    assert_eq!(json["state"]["column"], 3715);
}

#[tokio::test]
async fn test_navigate_zoom_in_at_max() {
    let server = create_test_server(12, 34, MAX_ZOOM);

    let response = server.post("/navigate/zoom-in").await;

    response.assert_status(StatusCode::CONFLICT);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("zoom in"));

    // Nothing moved
    let state: Value = server.get("/state").await.json();
    assert_eq!(state["zoom"], 10);
    assert_eq!(state["column"], 12);
    assert_eq!(state["row"], 34);
}

#[tokio::test]
async fn test_navigate_zoom_out_at_min() {
    let server = create_test_server(5, 5, 0);

    let response = server.post("/navigate/zoom-out").await;

    response.assert_status(StatusCode::CONFLICT);
    let state: Value = server.get("/state").await.json();
    assert_eq!(state["zoom"], 0);
    assert_eq!(state["column"], 5);
}

#[tokio::test]
async fn test_navigate_zoom_out_rounds_odd_up() {
    let server = create_test_server(5, 4, 3);

    let response = server.post("/navigate/zoom-out").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["state"]["column"], 3);
    assert_eq!(json["state"]["row"], 2);
}

#[tokio::test]
async fn test_navigate_past_coordinate_limit() {
    let server = create_test_server(i64::MAX - 1, 0, 5);

    let response = server.post("/navigate/right").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("overflow"));

    // Engine still usable and unmoved
    let state: Value = server.get("/state").await.json();
    assert_eq!(state["column"], i64::MAX - 1);

    server.post("/navigate/left").await.assert_status_ok();
    let state: Value = server.get("/state").await.json();
    assert_eq!(state["column"], i64::MAX - 2);
}

#[tokio::test]
async fn test_tile_past_coordinate_limit() {
    let server = create_test_server(i64::MAX, 0, 5);

    let response = server.get("/tile").add_query_param("col_offset", 1).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/tile").add_query_param("col_offset", -1).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_navigate_unknown_command() {
    let server = default_server();

    let response = server.post("/navigate/sideways").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("sideways"));
}

#[tokio::test]
async fn test_navigate_with_selection() {
    let server = default_server();

    let response = server
        .post("/navigate/right")
        .add_query_param("layer", "ORTHO_RAW")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["state"]["layer"], "ORTHO_RAW");
    assert_eq!(json["state"]["format"], "F");
    assert_eq!(
        json["tiles"][1][1],
        "http://tiles.test/wmts?COL=3716&ROW=40025&LAYER=ORTHO_RAW&FORMAT=F&ZOOM=1"
    );
}

#[tokio::test]
async fn test_matrix_endpoint() {
    let server = default_server();

    let response = server.get("/matrix").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let levels = json["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 11);
    assert_eq!(levels[0]["identifier"], "512");
    assert_eq!(levels[10]["identifier"], "0_5");
    assert_eq!(levels[9]["current"], true);
    assert_eq!(levels[8]["current"], false);
}

#[tokio::test]
async fn test_options_endpoint() {
    let server = default_server();

    let response = server.get("/options").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["layers"][0], "ORTHO");
    assert_eq!(json["formats"][0], "image/jpeg");
}

#[tokio::test]
async fn test_viewer_page() {
    let server = default_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("id=\"img00\""));
    assert!(body.contains("id=\"img22\""));
    assert!(body.contains("layerSelect"));
    assert!(body.contains("formatSelect"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = default_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document() {
    let server = default_server();

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"].get("/navigate/{command}").is_some());
    assert!(json["paths"].get("/grid").is_some());
}
