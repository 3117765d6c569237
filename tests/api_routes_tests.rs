use bytes::Bytes;
use codebin::{routes, MemoryStore, SaveResponse, SharedStore, Snippet};
use std::sync::Arc;
use warp::http::StatusCode;

const BOUNDARY: &str = "codebin-test-boundary";
const RETENTION_SECS: i64 = 3600;

fn test_routes() -> impl warp::Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let store: SharedStore = Arc::new(MemoryStore::new());
    routes(store, RETENTION_SECS)
}

fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            name
        ));
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

async fn post_save(
    api: &(impl warp::Filter<Extract = impl warp::Reply + Send, Error = warp::Rejection>
          + Clone
          + Send
          + Sync
          + 'static),
    fields: &[(&str, &str)],
) -> warp::http::Response<Bytes> {
    warp::test::request()
        .method("POST")
        .path("/api/save")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(multipart_body(fields))
        .reply(api)
        .await
}

#[tokio::test]
async fn save_then_view_round_trips() {
    let api = test_routes();

    let resp = post_save(
        &api,
        &[
            ("snippetName", "greeting"),
            ("snippetText", "print('hello')"),
            ("mode", "python"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let saved: SaveResponse = serde_json::from_slice(resp.body()).expect("save response");
    assert_eq!(saved.snippet_id.len(), 32);
    assert!(saved
        .snippet_id
        .bytes()
        .all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));

    let resp = warp::test::request()
        .method("GET")
        .path(&format!("/api/view/{}", saved.snippet_id))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"],
        "application/json; charset=utf-8"
    );

    let snippet: Snippet = serde_json::from_slice(resp.body()).expect("snippet json");
    assert_eq!(snippet.name, "greeting");
    assert_eq!(snippet.body, "print('hello')");
    assert_eq!(snippet.mode.as_str(), "python");
    assert_eq!(
        snippet.time_expired - snippet.time_created,
        RETENTION_SECS
    );
}

#[tokio::test]
async fn save_defaults_an_empty_name() {
    let api = test_routes();

    let resp = post_save(
        &api,
        &[
            ("snippetName", ""),
            ("snippetText", "package main"),
            ("mode", "golang"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let saved: SaveResponse = serde_json::from_slice(resp.body()).expect("save response");

    let resp = warp::test::request()
        .method("GET")
        .path(&format!("/api/view/{}", saved.snippet_id))
        .reply(&api)
        .await;
    let snippet: Snippet = serde_json::from_slice(resp.body()).expect("snippet json");
    assert!(snippet.name.starts_with("Snippet created at "));
}

#[tokio::test]
async fn save_rejects_a_missing_field() {
    let api = test_routes();

    let resp = post_save(&api, &[("snippetName", "x"), ("snippetText", "y")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.body(), "Missing form field");
}

#[tokio::test]
async fn save_rejects_an_empty_body() {
    let api = test_routes();

    let resp = post_save(
        &api,
        &[("snippetName", "x"), ("snippetText", ""), ("mode", "rust")],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.body(), "Snippet body is empty");
}

#[tokio::test]
async fn save_rejects_an_unsupported_mode() {
    let api = test_routes();

    let resp = post_save(
        &api,
        &[
            ("snippetName", "x"),
            ("snippetText", "y"),
            ("mode", "haskell"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.body(), "Unsupported mode: haskell");
}

#[tokio::test]
async fn view_unknown_id_is_not_found() {
    let api = test_routes();
    let id = "ffffffffffffffffffffffffffffffff";

    let resp = warp::test::request()
        .method("GET")
        .path(&format!("/api/view/{}", id))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.body(),
        &format!("Data for snippet {} not found", id)
    );
}

#[tokio::test]
async fn view_malformed_id_is_not_found() {
    let api = test_routes();

    let resp = warp::test::request()
        .method("GET")
        .path("/api/view/not-a-snippet-id")
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
