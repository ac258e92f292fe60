//! Page views. Each renders a complete HTML document from the page props
//! and whatever state the handler collected for it.

use serde_json::Value;

use crate::app::AppContext;
use crate::error::ApiResult;
use crate::routes::{Location, Page};

use super::components::{Button, DataTable, InputKind, InputText, escape};
use super::toast::{Severity, ToastMessage};

/// A tabulated API payload with a heading.
#[derive(Debug, Clone)]
pub struct Panel {
    pub heading: String,
    pub table: DataTable,
}

/// Display state of one render: toasts to show, a result panel, the input
/// to echo back into the form, and where the session currently is.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub toasts: Vec<ToastMessage>,
    pub panel: Option<Panel>,
    pub input: Option<String>,
    pub location: Option<Location>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: &str) -> Self {
        self.input = Some(input.to_string());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_toast(mut self, toast: ToastMessage) -> Self {
        self.toasts.push(toast);
        self
    }

    /// Records an API outcome: a table on success, an error toast otherwise.
    pub fn with_outcome(mut self, ctx: &AppContext, heading: &str, outcome: &ApiResult<Value>) -> Self {
        match outcome {
            Ok(payload) => {
                self.panel = Some(Panel {
                    heading: heading.to_string(),
                    table: DataTable::from_json(payload),
                });
            }
            Err(err) => self.toasts.push(ctx.toasts.request_failed(err)),
        }
        self
    }
}

pub fn render(ctx: &AppContext, page: &Page, state: &PageState) -> String {
    let (title, body) = match page {
        Page::Main => ("Exclusion analysis", main_body(ctx, state)),
        Page::Search => ("Search", search_body(ctx, state)),
        Page::Keyword => ("Keywords", keyword_body(ctx, state)),
        Page::Loading => ("Loading", loading_body(ctx)),
        Page::Results { query } => ("Results", results_body(ctx, query.as_deref(), state)),
    };
    layout(ctx, title, &body, state)
}

fn layout(ctx: &AppContext, title: &str, body: &str, state: &PageState) -> String {
    let theme = &ctx.theme;
    let current_path = state.location.as_ref().map(|l| l.path.as_str());
    let nav: String = [("main", "Home"), ("search", "Search"), ("keyword", "Keywords")]
        .iter()
        .filter_map(|(name, label)| {
            let href = ctx.routes.href(name, &[])?;
            let active = if current_path == Some(href.as_str()) {
                r#" aria-current="page""#
            } else {
                ""
            };
            Some(format!(r#"<a href="{}"{active}>{}</a>"#, escape(&href), label))
        })
        .collect::<Vec<_>>()
        .join(" ");

    let toasts: String = state
        .toasts
        .iter()
        .map(|t| ctx.components.render(theme, t))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{root}">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{layers}</style>
<link rel="stylesheet" href="/assets/app.css">
</head>
<body>
<nav>{nav}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
<div class="{toast_class}-container">{toasts}</div>
</body>
</html>
"#,
        root = escape(&theme.root_classes()),
        title = escape(title),
        layers = theme.layer_statement(),
        toast_class = theme.class_for("toast"),
    )
}

fn panel(ctx: &AppContext, state: &PageState) -> String {
    match &state.panel {
        Some(panel) => format!(
            "<section><h2>{}</h2>{}</section>",
            escape(&panel.heading),
            ctx.components.render(&ctx.theme, &panel.table)
        ),
        None => String::new(),
    }
}

fn main_body(ctx: &AppContext, state: &PageState) -> String {
    let theme = &ctx.theme;
    let reg = &ctx.components;
    let search = ctx.routes.href("search", &[]).unwrap_or_default();
    let keyword = ctx.routes.href("keyword", &[]).unwrap_or_default();
    format!(
        r#"<p>{} {}</p>
<form method="post" action="/actions/analyze" enctype="multipart/form-data">
{}
{}
{}
</form>
{}"#,
        reg.render(theme, &Button::link("Search articles", &search).with_icon("pi-search")),
        reg.render(theme, &Button::link("Keywords", &keyword).with_icon("pi-tags")),
        reg.render(theme, &InputText::new("document", InputKind::File)),
        reg.render(
            theme,
            &InputText::new("criteria", InputKind::TextArea)
                .value(state.input.as_deref().unwrap_or_default())
                .placeholder("Exclusion criteria")
        ),
        reg.render(theme, &Button::submit("Analyze").with_icon("pi-upload")),
        panel(ctx, state)
    )
}

fn search_body(ctx: &AppContext, state: &PageState) -> String {
    let theme = &ctx.theme;
    let reg = &ctx.components;
    format!(
        r#"<form method="post" action="/actions/search">
{}
{}
</form>
{}"#,
        reg.render(
            theme,
            &InputText::new("message", InputKind::Text)
                .value(state.input.as_deref().unwrap_or_default())
                .placeholder("Search articles")
        ),
        reg.render(theme, &Button::submit("Search").with_icon("pi-search")),
        panel(ctx, state)
    )
}

fn keyword_body(ctx: &AppContext, state: &PageState) -> String {
    let theme = &ctx.theme;
    let reg = &ctx.components;
    let input = state.input.as_deref().unwrap_or_default();
    format!(
        r#"<form method="post" action="/actions/keywords/generate">
{}
{}
</form>
<form method="post" action="/actions/keywords/expand">
{}
{}
</form>
{}"#,
        reg.render(
            theme,
            &InputText::new("query", InputKind::Text)
                .value(input)
                .placeholder("Describe your topic")
        ),
        reg.render(theme, &Button::submit("Generate keywords")),
        reg.render(
            theme,
            &InputText::new("keyword", InputKind::Text).placeholder("Single keyword")
        ),
        reg.render(theme, &Button::submit("Expand keyword")),
        panel(ctx, state)
    )
}

fn loading_body(ctx: &AppContext) -> String {
    format!(
        r#"<div class="{}" role="progressbar" aria-busy="true"></div><p>Fetching results...</p>"#,
        ctx.theme.class_for("progressbar")
    )
}

fn results_body(ctx: &AppContext, query: Option<&str>, state: &PageState) -> String {
    let back = ctx.routes.href("search", &[]).unwrap_or_default();
    let heading = match query {
        Some(q) if !q.is_empty() => format!(r#"<p>Results for "{}"</p>"#, escape(q)),
        _ => String::new(),
    };
    format!(
        "{heading}\n{}\n{}",
        panel(ctx, state),
        ctx.components
            .render(&ctx.theme, &Button::link("New search", &back).with_icon("pi-arrow-left"))
    )
}

/// Toast shown when the results page is opened without a query.
pub fn missing_query(ctx: &AppContext) -> ToastMessage {
    ctx.toasts
        .add(Severity::Info, "No query", "Enter a search query to see results.")
}
