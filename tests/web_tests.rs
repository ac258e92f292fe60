use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use litsift::app::AppContext;
use litsift::client::endpoints;
use litsift::config::Config;

mod test_helpers {
    use super::*;

    pub fn app_for(base_url: &str) -> Router {
        app_with(Config::default().with_api_url(base_url))
    }

    pub fn app_with(config: Config) -> Router {
        let ctx = AppContext::bootstrap(config).unwrap();
        litsift::web::create_router(Arc::new(ctx))
    }

    pub const BOUNDARY: &str = "XBOUNDARYX";

    /// Multipart body with a `document` part of `size` bytes and a `criteria` part.
    pub fn upload_request(size: usize, criteria: &str) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"big.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .into_bytes();
        body.extend(std::iter::repeat_n(b'a', size));
        body.extend(
            format!(
                "\r\n--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"criteria\"\r\n\r\n{criteria}\r\n--{BOUNDARY}--\r\n"
            )
            .into_bytes(),
        );
        Request::builder()
            .method("POST")
            .uri("/actions/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    pub async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_results_page_renders_search_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::VECTOR_SEARCH))
        .and(body_json(json!({"message": "hello world"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "Checkpoint inhibitors in NSCLC", "score": 0.91},
            {"title": "A <b>bold</b> claim", "score": 0.5}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    let response = app.oneshot(get("/results?q=hello%20world")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(r#"Results for "hello world""#));
    assert!(html.contains("Checkpoint inhibitors in NSCLC"));
    assert!(html.contains("A &lt;b&gt;bold&lt;/b&gt; claim"));
    assert!(html.contains(r#"<th class="p-column" data-field="title">title</th>"#));
    assert!(!html.contains("Request failed"));
}

#[tokio::test]
async fn test_results_page_shows_error_toast_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::VECTOR_SEARCH))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    let response = app.oneshot(get("/results?q=cats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("p-toast-message-error"));
    assert!(html.contains("Request failed"));
    assert!(html.contains("HTTP error! status: 500, details: server error"));
    assert!(!html.contains("p-datatable"));
}

#[tokio::test]
async fn test_results_page_without_query_skips_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    let response = app.oneshot(get("/results")).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("p-toast-message-info"));
    assert!(html.contains("No query"));
}

#[tokio::test]
async fn test_unknown_route_redirects_to_search() {
    let app = app_for("http://127.0.0.1:9");
    let response = app.oneshot(get("/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/search");
}

#[tokio::test]
async fn test_static_pages_render() {
    let app = app_for("http://127.0.0.1:9");
    for (uri, marker) in [
        ("/", "/actions/analyze"),
        ("/search", "/actions/search"),
        ("/keyword", "/actions/keywords/expand"),
        ("/loading", "p-progressbar"),
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let html = body_text(response).await;
        assert!(html.contains(marker), "{uri} missing {marker}");
        assert!(html.contains(r#"<html lang="en" class="p-theme-aura">"#));
        assert!(html.contains("@layer app-styles, primevue, another-css-library;"));
    }
}

#[tokio::test]
async fn test_search_form_redirects_to_results() {
    let app = app_for("http://127.0.0.1:9");
    let response = app
        .oneshot(post_form("/actions/search", "message=lung+cancer%26smoking"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/results?q=lung+cancer%26smoking"
    );
}

#[tokio::test]
async fn test_keyword_forms_call_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(endpoints::GENERATE_KEYWORDS))
        .and(query_param("query", "heart failure"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"keywords": ["cardiac", "HFrEF"]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(endpoints::EXPAND_KEYWORD))
        .and(body_json(json!({"keyword": "cardiac"})))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown keyword"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server.uri());

    let response = app
        .clone()
        .oneshot(post_form("/actions/keywords/generate", "query=heart+failure"))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Suggested keywords"));
    assert!(html.contains("<td>HFrEF</td>"));
    assert!(html.contains(r#"value="heart failure""#));

    let response = app
        .oneshot(post_form("/actions/keywords/expand", "keyword=cardiac"))
        .await
        .unwrap();
    let html = body_text(response).await;
    assert!(html.contains("HTTP error! status: 404, details: unknown keyword"));
}

#[tokio::test]
async fn test_analyze_upload_forwards_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::ANALYZE_DOCUMENT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"excluded": true, "reason": "animal study"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"paper.txt\"\r\nContent-Type: text/plain\r\n\r\nstudy in mice\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"criteria\"\r\n\r\nexclude animal studies\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/actions/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let app = app_for(&server.uri());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Exclusion analysis"));
    assert!(html.contains("<td>animal study</td>"));

    let requests = server.received_requests().await.unwrap();
    let forwarded = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(forwarded.contains("study in mice"));
    assert!(forwarded.contains("exclude animal studies"));
}

#[tokio::test]
async fn test_analyze_without_document_warns() {
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"criteria\"\r\n\r\nexclude reviews\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/actions/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let app = app_for("http://127.0.0.1:9");
    let response = app.oneshot(request).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("p-toast-message-warn"));
    assert!(html.contains("exclude reviews"));
}

#[tokio::test]
async fn test_assets_are_served() {
    let app = app_for("http://127.0.0.1:9");
    let response = app.oneshot(get("/assets/app.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_analyze_accepts_documents_over_two_megabytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::ANALYZE_DOCUMENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"excluded": false})))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    let response = app
        .oneshot(upload_request(3 * 1024 * 1024, "exclude reviews"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Exclusion analysis"));
    assert!(!html.contains("Upload failed"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.len() > 3 * 1024 * 1024);
}

#[tokio::test]
async fn test_oversized_upload_renders_error_toast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = Config::default().with_api_url(&server.uri());
    config.max_upload_bytes = 1024 * 1024;
    let app = app_with(config);

    let response = app
        .oneshot(upload_request(2 * 1024 * 1024, "exclude reviews"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("p-toast-message-error"));
    assert!(html.contains("Upload failed"));
    assert!(html.contains("at most 1 MB"));
    assert!(html.contains("/actions/analyze"));
}

#[tokio::test]
async fn test_nav_marks_each_requests_own_page() {
    let app = app_for("http://127.0.0.1:9");

    let html = body_text(app.clone().oneshot(get("/keyword")).await.unwrap()).await;
    assert!(html.contains(r#"<a href="/keyword" aria-current="page">Keywords</a>"#));

    let html = body_text(app.oneshot(get("/search")).await.unwrap()).await;
    assert!(html.contains(r#"<a href="/search" aria-current="page">Search</a>"#));
    assert!(html.contains(r#"<a href="/keyword">Keywords</a>"#));
}
