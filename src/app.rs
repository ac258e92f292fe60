use anyhow::{Context, Result};
use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::Config;
use crate::routes::RouteTable;
use crate::theme::Theme;
use crate::ui::components::ComponentRegistry;
use crate::ui::toast::ToastService;

/// Everything a page view needs, built once at startup and passed around
/// explicitly.
pub struct AppContext {
    pub config: Config,
    pub theme: Theme,
    pub client: ApiClient,
    /// Shared by every request; each request navigates with its own
    /// `Navigator` over this table.
    pub routes: Arc<RouteTable>,
    pub toasts: ToastService,
    pub components: ComponentRegistry,
}

impl AppContext {
    pub fn bootstrap(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config).context("Failed to create API client")?;
        let theme = Theme::new(config.theme, config.dark_mode);
        let components = ComponentRegistry::standard();

        tracing::info!(
            "bootstrapped UI: api={}, theme={}, components=[{}]",
            client.base_url(),
            theme.preset.name(),
            components.names().collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            config,
            theme,
            client,
            routes: Arc::new(RouteTable::standard()),
            toasts: ToastService::default(),
            components,
        })
    }
}
