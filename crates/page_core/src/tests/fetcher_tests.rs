use super::*;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::json;
use shared::domain::{PhoneDetails, PhoneSummary};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct ServerState {
    queries: Arc<Mutex<Vec<Option<String>>>>,
}

async fn phone_file(
    State(state): State<ServerState>,
    Path(file): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<String, StatusCode> {
    state.queries.lock().expect("queries").push(query);
    match file.as_str() {
        "phones.json" => Ok(json!([
            { "id": "nexus-s", "name": "Nexus S" },
            { "id": "iphone", "name": "iPhone" }
        ])
        .to_string()),
        "nexus-s.json" => Ok(json!({
            "id": "nexus-s",
            "name": "Nexus S",
            "description": "Fast just got faster",
            "images": ["img/phones/nexus-s.0.jpg"],
            "android": { "os": "Android 2.3" }
        })
        .to_string()),
        "broken.json" => Ok("{ not json".to_string()),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn spawn_data_server() -> (String, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route("/data/phones/:file", get(phone_file))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn fetches_and_decodes_phone_list() {
    let (base_url, _state) = spawn_data_server().await;
    let fetcher = HttpFetcher::new(base_url);

    let phones: Vec<PhoneSummary> = fetch_as(&fetcher, "/data/phones/phones.json")
        .await
        .expect("phones");

    assert_eq!(phones.len(), 2);
    assert_eq!(phones[0].name, "Nexus S");
}

#[tokio::test]
async fn query_parameter_reaches_server() {
    let (base_url, state) = spawn_data_server().await;
    let fetcher = HttpFetcher::new(base_url);

    fetcher
        .get_json("/data/phones/phones.json?query=nex")
        .await
        .expect("phones");

    assert_eq!(
        *state.queries.lock().expect("queries"),
        vec![Some("query=nex".to_string())]
    );
}

#[tokio::test]
async fn details_keep_unmodelled_fields() {
    let (base_url, _state) = spawn_data_server().await;
    let fetcher = HttpFetcher::new(format!("{base_url}/"));

    let details: PhoneDetails = fetch_as(&fetcher, "/data/phones/nexus-s.json")
        .await
        .expect("details");

    assert_eq!(details.images, vec!["img/phones/nexus-s.0.jpg".to_string()]);
    assert_eq!(details.extra["android"]["os"], json!("Android 2.3"));
}

#[tokio::test]
async fn http_error_status_is_reported_with_path() {
    let (base_url, _state) = spawn_data_server().await;
    let fetcher = HttpFetcher::new(base_url);

    let err = fetcher
        .get_json("/data/phones/unknown.json")
        .await
        .expect_err("missing phone");

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert_eq!(err.path(), "/data/phones/unknown.json");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (base_url, _state) = spawn_data_server().await;
    let fetcher = HttpFetcher::new(base_url);

    let err = fetcher
        .get_json("/data/phones/broken.json")
        .await
        .expect_err("broken json");

    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn wrong_shape_is_a_decode_error() {
    let (base_url, _state) = spawn_data_server().await;
    let fetcher = HttpFetcher::new(base_url);

    let err = fetch_as::<Vec<PhoneSummary>>(&fetcher, "/data/phones/nexus-s.json")
        .await
        .expect_err("object is not a list");

    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let fetcher = HttpFetcher::new(format!("http://{addr}"));

    let err = fetcher
        .get_json("/data/phones/phones.json")
        .await
        .expect_err("nothing listening");

    assert!(matches!(err, FetchError::Transport { .. }));
}
