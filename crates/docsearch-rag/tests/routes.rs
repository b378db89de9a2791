//! HTTP routes driven through the router without a socket

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use common::{app_state, RecordingLlm};
use docsearch_rag::build_router;
use docsearch_rag::providers::InMemoryIndex;

const BOUNDARY: &str = "docsearch-test-boundary";

async fn app() -> (Router, Arc<InMemoryIndex>, Arc<RecordingLlm>) {
    let llm = Arc::new(RecordingLlm::new("Forty-two."));
    let (state, index) = app_state(llm.clone()).await;
    (build_router(state), index, llm)
}

fn multipart(field: &str, file_name: &str, content: &str) -> Body {
    Body::from(format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
    ))
}

fn upload_request(uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(body)
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn upload(app: &Router, file_name: &str, content: &str) -> (StatusCode, Value) {
    send(
        app,
        upload_request(
            "/api/v1/upload-file?chunk_size=100",
            multipart("file", file_name, content),
        ),
    )
    .await
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (app, _, _) = app().await;
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]["POST /ask"].is_string());
    let formats = body["supported_formats"].as_array().unwrap();
    assert!(formats.iter().any(|f| f == ".pdf"));
    assert!(formats.iter().any(|f| f == ".xlsx"));
}

#[tokio::test]
async fn test_health_reports_components() {
    let (app, _, _) = app().await;
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["index"], true);
}

#[tokio::test]
async fn test_upload_then_search() {
    let (app, index, _) = app().await;

    let (status, body) = upload(&app, "animals.txt", "Cats are small. Dogs are big.").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "File uploaded successfully");
    assert_eq!(body["file_name"], "animals.txt");
    assert_eq!(body["chunk_size"], 100);
    assert_eq!(body["chunks_stored"], 1);
    assert_eq!(index.len(), 1);

    let (status, body) = send(
        &app,
        get("/api/v1/search?query=Cats%20are%20small%20Dogs%20are%20big&include_vectors=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_results"], 1);
    let hit = &body["results"][0];
    assert_eq!(hit["file_name"], "animals.txt");
    assert_eq!(hit["file_type"], ".txt");
    assert_eq!(hit["chunk_id"], 0);
    assert_eq!(hit["chunk_text"], "Cats are small Dogs are big");
    assert_eq!(hit["vector"].as_array().map(Vec::len), Some(common::DIMENSION));
    assert!(hit["metadata"]["total_words"].is_number());
}

#[tokio::test]
async fn test_search_without_chunks() {
    let (app, _, _) = app().await;
    upload(&app, "a.txt", "Solar panels convert light.").await;

    let (status, body) = send(
        &app,
        get("/api/v1/search?query=solar%20panels&include_chunks=false"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hit = &body["results"][0];
    assert!(hit.get("chunk_text").is_none());
    assert!(hit.get("vector").is_none());
}

#[tokio::test]
async fn test_search_validation() {
    let (app, _, _) = app().await;

    let (status, body) = send(&app, get("/api/v1/search?query=cats&limit=21")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "validation_error");

    let (status, _) = send(&app, get("/api/v1/search?query=cats&score_threshold=0.05")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/v1/search?query=%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for threshold in ["NaN", "inf"] {
        let uri = format!("/api/v1/search?query=cats&score_threshold={}", threshold);
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{threshold}");
        assert_eq!(body["error"]["type"], "validation_error");
    }
}

#[tokio::test]
async fn test_upload_rejections() {
    let (app, index, _) = app().await;

    let (status, body) = send(
        &app,
        upload_request(
            "/api/v1/upload-file?chunk_size=50",
            multipart("file", "a.txt", "Some text."),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = upload(&app, "tool.exe", "MZ").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["type"], "unsupported_type");

    let (status, body) = upload(&app, "blank.txt", "   ").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "empty_document");

    let (status, _) = send(
        &app,
        upload_request(
            "/api/v1/upload-file",
            multipart("document", "a.txt", "Some text."),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(index.is_empty());
}

#[tokio::test]
async fn test_file_listing_detail_and_delete() {
    let (app, _, _) = app().await;
    upload(&app, "guide.txt", "Install the package. Run the server.").await;
    upload(&app, "data.csv", "name,age\nann,30\n").await;

    let (status, body) = send(&app, get("/api/v1/files?file_type=txt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_files"], 1);
    assert_eq!(body["files"][0]["file_name"], "guide.txt");
    assert_eq!(body["has_more"], false);

    let (status, _) = send(&app, get("/api/v1/files?limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/api/v1/files/guide.txt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_chunks"], 1);
    assert_eq!(body["chunks"][0]["text"], "Install the package Run the server");

    let (status, body) = send(&app, get("/api/v1/chunks/0?file_name=guide.txt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["full_text"], "Install the package Run the server");
    assert_eq!(body["vector_info"]["vector_dimension"], common::DIMENSION);

    let (status, body) = send(&app, get("/api/v1/chunks/3?file_name=guide.txt")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/files/guide.txt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_chunks"], 1);

    let (status, _) = send(&app, get("/api/v1/files/guide.txt")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/v1/collection")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points_count"], 1);
}

#[tokio::test]
async fn test_ask() {
    let (app, _, llm) = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/ask?query=anything")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], docsearch_rag::generation::NO_CONTEXT_ANSWER);
    assert!(llm.prompts().is_empty());

    upload(&app, "faq.txt", "The answer is forty-two.").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/ask?query=What%20is%20the%20answer%3F&limit=3")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Forty-two.");
    assert_eq!(body["total_sources"], 1);
    assert_eq!(body["sources"][0]["file_name"], "faq.txt");
    assert_eq!(llm.prompts().len(), 1);
}
