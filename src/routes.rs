//! Page routing: a static table from URL path to page, plus the navigator
//! service that tracks the current location.

use reqwest::Url;
use std::sync::{Arc, RwLock};

/// Path every unregistered location redirects to.
pub const DEFAULT_PATH: &str = "/search";

/// Query parameter forwarded to the results page as its `query` prop.
pub const QUERY_PARAM: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Main,
    Search,
    Keyword,
    Loading,
    Results,
}

/// A resolved page together with its props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Main,
    Search,
    Keyword,
    Loading,
    Results { query: Option<String> },
}

impl Page {
    pub fn kind(&self) -> PageKind {
        match self {
            Page::Main => PageKind::Main,
            Page::Search => PageKind::Search,
            Page::Keyword => PageKind::Keyword,
            Page::Loading => PageKind::Loading,
            Page::Results { .. } => PageKind::Results,
        }
    }
}

/// Maps the decoded query pairs of a location to page props.
pub type PropsMapper = fn(&[(String, String)]) -> Page;

pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub kind: PageKind,
    pub props: Option<PropsMapper>,
}

impl Route {
    fn page(&self, query: &[(String, String)]) -> Page {
        if let Some(mapper) = self.props {
            return mapper(query);
        }
        match self.kind {
            PageKind::Main => Page::Main,
            PageKind::Search => Page::Search,
            PageKind::Keyword => Page::Keyword,
            PageKind::Loading => Page::Loading,
            PageKind::Results => Page::Results { query: None },
        }
    }
}

fn results_props(query: &[(String, String)]) -> Page {
    Page::Results {
        query: query
            .iter()
            .find(|(key, _)| key == QUERY_PARAM)
            .map(|(_, value)| value.clone()),
    }
}

/// A path and its raw (still encoded) query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    /// Splits `"/results?q=x"` into path and query. An empty path becomes `/`.
    pub fn parse(target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        let path = if path.is_empty() { "/" } else { path };
        Location {
            path: path.to_string(),
            query: query.filter(|q| !q.is_empty()),
        }
    }

    /// Decoded query pairs. `%20` and `+` both decode to a space.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = &self.query else {
            return Vec::new();
        };
        // the host is a placeholder, only the query string is parsed
        match Url::parse(&format!("http://localhost/?{query}")) {
            Ok(url) => url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => write!(f, "{}", self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Page(Page),
    /// The path is not registered; navigate to this location instead.
    Redirect(String),
}

pub struct RouteTable {
    routes: Vec<Route>,
    fallback: &'static str,
}

impl RouteTable {
    /// Builds a table. Panics on duplicate paths, which is a programming error.
    pub fn new(routes: Vec<Route>, fallback: &'static str) -> Self {
        for (i, route) in routes.iter().enumerate() {
            assert!(
                routes[..i].iter().all(|r| r.path != route.path),
                "duplicate route path {}",
                route.path
            );
        }
        Self { routes, fallback }
    }

    /// The application's routes: main, search, keyword, loading and results.
    pub fn standard() -> Self {
        Self::new(
            vec![
                Route {
                    path: "/",
                    name: "main",
                    kind: PageKind::Main,
                    props: None,
                },
                Route {
                    path: "/search",
                    name: "search",
                    kind: PageKind::Search,
                    props: None,
                },
                Route {
                    path: "/keyword",
                    name: "keyword",
                    kind: PageKind::Keyword,
                    props: None,
                },
                Route {
                    path: "/loading",
                    name: "loading",
                    kind: PageKind::Loading,
                    props: None,
                },
                Route {
                    path: "/results",
                    name: "results",
                    kind: PageKind::Results,
                    props: Some(results_props),
                },
            ],
            DEFAULT_PATH,
        )
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn fallback(&self) -> &str {
        self.fallback
    }

    pub fn find(&self, path: &str) -> Option<&Route> {
        let path = normalize_path(path);
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn resolve(&self, location: &Location) -> Resolution {
        match self.find(&location.path) {
            Some(route) => Resolution::Page(route.page(&location.query_pairs())),
            None => Resolution::Redirect(self.fallback.to_string()),
        }
    }

    /// Link to a named route with optional query pairs, percent-encoded.
    pub fn href(&self, name: &str, query: &[(&str, &str)]) -> Option<String> {
        let route = self.routes.iter().find(|r| r.name == name)?;
        if query.is_empty() {
            return Some(route.path.to_string());
        }
        let mut url = Url::parse("http://localhost/").ok()?;
        url.set_path(route.path);
        url.query_pairs_mut().extend_pairs(query.iter());
        Some(format!("{}?{}", url.path(), url.query().unwrap_or_default()))
    }
}

fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Tracks the current location of one browsing session over a shared,
/// immutable route table.
pub struct Navigator {
    table: Arc<RouteTable>,
    current: RwLock<Location>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            current: RwLock::new(Location::parse("/")),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> Location {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Resolves `target`, follows at most one redirect, and records where it
    /// landed as the current location.
    pub fn navigate(&self, target: &str) -> Resolution {
        let location = Location::parse(target);
        let resolution = self.table.resolve(&location);
        let landed = match &resolution {
            Resolution::Page(_) => location,
            Resolution::Redirect(to) => Location::parse(to),
        };
        tracing::debug!("navigated to {target}, now at {landed}");
        match self.current.write() {
            Ok(mut guard) => *guard = landed,
            Err(poisoned) => *poisoned.into_inner() = landed,
        }
        resolution
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Arc::new(RouteTable::standard()))
    }
}
