use axum::{
    Form,
    extract::{Multipart, State, multipart::MultipartError},
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::app::AppContext;
use crate::client::Document;
use crate::routes::{Location, Navigator, Page, Resolution};
use crate::ui::pages::{self, PageState};
use crate::ui::toast::Severity;

use super::models::{ExpandKeywordForm, GenerateKeywordsForm, SearchForm};

/// GET on any path: resolve through the route table and render the page.
pub async fn page(State(ctx): State<Arc<AppContext>>, uri: Uri) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    // one navigator per request, sessions never see each other's location
    let navigator = Navigator::new(ctx.routes.clone());
    match navigator.navigate(target) {
        Resolution::Redirect(to) => {
            tracing::info!("no route for {target}, redirecting to {to}");
            Redirect::to(&to).into_response()
        }
        Resolution::Page(page) => {
            let state = load(&ctx, &page).await.with_location(navigator.current());
            Html(pages::render(&ctx, &page, &state)).into_response()
        }
    }
}

/// Runs the API call a page needs before it can render.
async fn load(ctx: &AppContext, page: &Page) -> PageState {
    match page {
        Page::Results { query: Some(query) } if !query.is_empty() => {
            let outcome = ctx.client.search_articles(query).await;
            PageState::new()
                .with_input(query)
                .with_outcome(ctx, "Articles", &outcome)
        }
        Page::Results { .. } => PageState::new().with_toast(pages::missing_query(ctx)),
        _ => PageState::new(),
    }
}

/// Location of a named route, for pages rendered in answer to a form post.
fn located(ctx: &AppContext, name: &str) -> Location {
    Location::parse(&ctx.routes.href(name, &[]).unwrap_or_default())
}

/// POST /actions/search - navigate to the results page for the message.
pub async fn submit_search(
    State(ctx): State<Arc<AppContext>>,
    Form(form): Form<SearchForm>,
) -> Redirect {
    let href = ctx
        .routes
        .href("results", &[("q", form.message.as_str())])
        .unwrap_or_else(|| ctx.routes.fallback().to_string());
    Redirect::to(&href)
}

/// POST /actions/keywords/generate
pub async fn generate_keywords(
    State(ctx): State<Arc<AppContext>>,
    Form(form): Form<GenerateKeywordsForm>,
) -> Html<String> {
    let outcome = ctx.client.generate_keywords(&form.query).await;
    let state = PageState::new()
        .with_location(located(&ctx, "keyword"))
        .with_input(&form.query)
        .with_outcome(&ctx, "Suggested keywords", &outcome);
    Html(pages::render(&ctx, &Page::Keyword, &state))
}

/// POST /actions/keywords/expand
pub async fn expand_keyword(
    State(ctx): State<Arc<AppContext>>,
    Form(form): Form<ExpandKeywordForm>,
) -> Html<String> {
    let outcome = ctx.client.expand_keyword(&form.keyword).await;
    let state = PageState::new()
        .with_location(located(&ctx, "keyword"))
        .with_outcome(&ctx, "Expanded keyword", &outcome);
    Html(pages::render(&ctx, &Page::Keyword, &state))
}

#[derive(Default)]
struct Upload {
    document: Option<Document>,
    criteria: String,
}

async fn read_upload(multipart: &mut Multipart, upload: &mut Upload) -> Result<(), MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("document") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // browsers send an empty part when no file was picked
                if !file_name.is_empty() || !bytes.is_empty() {
                    let mut doc = Document::new(file_name, bytes.to_vec());
                    doc.content_type = content_type;
                    upload.document = Some(doc);
                }
            }
            Some("criteria") => upload.criteria = field.text().await?,
            other => tracing::debug!("ignoring upload field {:?}", other),
        }
    }
    Ok(())
}

/// POST /actions/analyze - multipart upload of `document` and `criteria`.
pub async fn analyze_document(
    State(ctx): State<Arc<AppContext>>,
    mut multipart: Multipart,
) -> Html<String> {
    let mut upload = Upload::default();
    let read = read_upload(&mut multipart, &mut upload).await;

    let state = PageState::new()
        .with_location(located(&ctx, "main"))
        .with_input(&upload.criteria);

    let state = match (read, upload.document) {
        (Err(e), _) => {
            tracing::warn!("rejected document upload: {e}");
            let limit_mb = ctx.config.max_upload_bytes / (1024 * 1024);
            state.with_toast(ctx.toasts.add(
                Severity::Error,
                "Upload failed",
                &format!("{e}. Documents may be at most {limit_mb} MB."),
            ))
        }
        (Ok(()), Some(document)) => {
            let outcome = ctx
                .client
                .analyze_document(document, &upload.criteria)
                .await;
            state.with_outcome(&ctx, "Exclusion analysis", &outcome)
        }
        (Ok(()), None) => state.with_toast(ctx.toasts.add(
            Severity::Warn,
            "No document",
            "Choose a document to analyze.",
        )),
    };

    Html(pages::render(&ctx, &Page::Main, &state))
}
