use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, header};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};

/// Backend endpoint paths, relative to the base URL.
pub mod endpoints {
    pub const ANALYZE_DOCUMENT: &str = "/api/exclusion/analyze/";
    pub const GENERATE_KEYWORDS: &str = "/api/generate-keywords/";
    pub const EXPAND_KEYWORD: &str = "/api/expand-keyword/";
    pub const VECTOR_SEARCH: &str = "/api/vector-search/";
}

/// A document uploaded for exclusion analysis.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn into_part(self) -> ApiResult<Part> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| ApiError::Request(format!("invalid content type {mime:?}: {e}"))),
            None => Ok(part),
        }
    }
}

/// Content type for common document extensions, `None` when unknown.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "rtf" => "application/rtf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return None,
    };
    Some(mime)
}

#[derive(Serialize)]
struct ExpandKeywordRequest<'a> {
    keyword: &'a str,
}

#[derive(Serialize)]
struct VectorSearchRequest<'a> {
    message: &'a str,
}

/// Client for the search backend. Every operation issues exactly one request
/// and returns the parsed JSON body or an [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, &config.api_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Submits a document for exclusion analysis against the given criteria.
    pub async fn analyze_document(&self, document: Document, criteria: &str) -> ApiResult<Value> {
        log::info!(
            "analyzing document {} ({} bytes) with criteria: {criteria}",
            document.file_name,
            document.bytes.len()
        );
        let form = Form::new()
            .part("document", document.into_part()?)
            .text("criteria", criteria.to_string());
        let request = self.http.post(self.url(endpoints::ANALYZE_DOCUMENT)).multipart(form);
        self.execute(endpoints::ANALYZE_DOCUMENT, request).await
    }

    /// Fetches keyword suggestions for a free-text query.
    pub async fn generate_keywords(&self, query: &str) -> ApiResult<Value> {
        let request = self
            .http
            .get(self.url(endpoints::GENERATE_KEYWORDS))
            .query(&[("query", query)])
            .header(header::ACCEPT, "application/json");
        self.execute(endpoints::GENERATE_KEYWORDS, request).await
    }

    pub async fn expand_keyword(&self, keyword: &str) -> ApiResult<Value> {
        let request = self
            .http
            .post(self.url(endpoints::EXPAND_KEYWORD))
            .json(&ExpandKeywordRequest { keyword });
        self.execute(endpoints::EXPAND_KEYWORD, request).await
    }

    /// Semantic search over the article corpus.
    pub async fn search_articles(&self, message: &str) -> ApiResult<Value> {
        let request = self
            .http
            .post(self.url(endpoints::VECTOR_SEARCH))
            .json(&VectorSearchRequest { message });
        self.execute(endpoints::VECTOR_SEARCH, request).await
    }

    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<Value> {
        let request_id = nanoid::nanoid!(10);
        log::debug!("[{request_id}] sending request to {endpoint}");

        let response = request.send().await.map_err(|e| {
            log::error!("[{request_id}] {endpoint} unreachable: {e}");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        log::info!("[{request_id}] {endpoint} responded {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("[{request_id}] error response from {endpoint}: {body}");
            return Err(ApiError::Status { status, body });
        }

        response.json::<Value>().await.map_err(|e| {
            // a body that fails mid-stream is a transport problem, not bad JSON
            if e.is_decode() {
                log::error!("[{request_id}] {endpoint} returned invalid JSON: {e}");
                ApiError::Decode(e)
            } else {
                log::error!("[{request_id}] {endpoint} body read failed: {e}");
                ApiError::Transport(e)
            }
        })
    }
}
