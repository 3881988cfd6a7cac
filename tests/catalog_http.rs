//! HTTP catalog client against a local server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use bookscout::catalog::{CatalogClient, HttpCatalogClient};
use bookscout::storage::{FavoritesStore, MemoryStore};
use bookscout::{AppController, BookscoutError, Config};

type Requests = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn volumes(
    State(requests): State<Requests>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    requests.lock().expect("request log").push(params.clone());

    match params.get("q").map(String::as_str) {
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, "backend down").into_response(),
        Some("nothing") => Json(json!({ "kind": "books#volumes", "totalItems": 0 })).into_response(),
        Some("garbage") => "not json".into_response(),
        _ => {
            let start: usize = params
                .get("startIndex")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            let size: usize = params
                .get("maxResults")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10);
            let items: Vec<_> = (start..start + size)
                .map(|i| {
                    json!({
                        "kind": "books#volume",
                        "id": format!("vol-{i}"),
                        "selfLink": format!("https://example.test/volumes/vol-{i}"),
                        "volumeInfo": { "title": format!("Volume {i}"), "authors": ["A. Author"] }
                    })
                })
                .collect();
            Json(json!({ "kind": "books#volumes", "totalItems": 100, "items": items })).into_response()
        }
    }
}

async fn spawn_catalog() -> (String, Requests) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let requests: Requests = Arc::default();

    let app = Router::new()
        .route("/volumes", get(volumes))
        .with_state(Arc::clone(&requests));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), requests)
}

#[tokio::test]
async fn sends_paging_parameters_and_key() {
    let (url, requests) = spawn_catalog().await;
    let client = HttpCatalogClient::new(format!("{url}/"), Some("secret".into())).expect("client");

    let page = client.get_volumes("javascript", 3, 3).await.expect("page");
    let ids: Vec<_> = page
        .into_items()
        .iter()
        .filter_map(|item| item["id"].as_str().map(String::from))
        .collect();
    assert_eq!(ids, ["vol-3", "vol-4", "vol-5"]);

    let params = requests.lock().expect("request log")[0].clone();
    assert_eq!(params["q"], "javascript");
    assert_eq!(params["startIndex"], "3");
    assert_eq!(params["maxResults"], "3");
    assert_eq!(params["key"], "secret");
}

#[tokio::test]
async fn omits_key_when_not_configured() {
    let (url, requests) = spawn_catalog().await;
    let client = HttpCatalogClient::new(url, None).expect("client");

    client.get_volumes("rust", 0, 3).await.expect("page");
    assert!(!requests.lock().expect("request log")[0].contains_key("key"));
}

#[tokio::test]
async fn missing_items_is_an_empty_page() {
    let (url, _) = spawn_catalog().await;
    let client = HttpCatalogClient::new(url, None).expect("client");

    let page = client.get_volumes("nothing", 0, 3).await.expect("page");
    assert!(page.into_items().is_empty());
}

#[tokio::test]
async fn error_status_and_bad_body_are_fetch_failures() {
    let (url, _) = spawn_catalog().await;
    let client = HttpCatalogClient::new(url, None).expect("client");

    match client.get_volumes("broken", 0, 3).await {
        Err(BookscoutError::FetchFailed { message }) => {
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("backend down"), "{message}");
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }

    assert!(matches!(
        client.get_volumes("garbage", 0, 3).await,
        Err(BookscoutError::FetchFailed { .. })
    ));
}

#[tokio::test]
async fn controller_searches_and_pages_over_http() {
    let (url, requests) = spawn_catalog().await;
    let config = Config {
        api_base_url: url,
        ..Config::default()
    };
    let client = HttpCatalogClient::from_config(&config).expect("client");
    let favorites = FavoritesStore::open(Box::new(MemoryStore::default()));

    let (controller, handle, mut channels) = AppController::new(&config, Arc::new(client), favorites);
    let task = tokio::spawn(controller.run());

    handle.submit("javascript").expect("submit");
    tokio::time::timeout(Duration::from_secs(5), channels.results.changed())
        .await
        .expect("first page in time")
        .expect("controller alive");
    assert_eq!(channels.results.borrow().as_ref().map(Vec::len), Some(3));

    handle.load_more().expect("load more");
    tokio::time::timeout(Duration::from_secs(5), channels.results.changed())
        .await
        .expect("second page in time")
        .expect("controller alive");

    let ids: Vec<String> = channels
        .results
        .borrow()
        .iter()
        .flatten()
        .map(|b| b.id.clone())
        .collect();
    assert_eq!(ids, ["vol-0", "vol-1", "vol-2", "vol-3", "vol-4", "vol-5"]);
    assert_eq!(requests.lock().expect("request log")[1]["startIndex"], "3");

    handle.shutdown().expect("shutdown");
    task.await.expect("controller exits");
}
