use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::theme::ThemePreset;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5173";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, without a trailing slash
    pub api_url: String,
    /// Address the web UI listens on
    pub bind_addr: String,
    /// Directory served under /assets
    pub assets_dir: PathBuf,
    pub theme: ThemePreset,
    pub dark_mode: bool,
    /// Unset means requests run until the transport resolves
    pub request_timeout: Option<Duration>,
    /// Largest document upload accepted by the web UI
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            assets_dir: PathBuf::from("static"),
            theme: ThemePreset::Aura,
            dark_mode: false,
            request_timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Config {
            api_url: trim_base_url(&get_env_or_default("LITSIFT_API_URL", DEFAULT_API_URL)),
            bind_addr: get_env_or_default("LITSIFT_BIND_ADDR", DEFAULT_BIND_ADDR),
            assets_dir: env::var("LITSIFT_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            theme: env::var("LITSIFT_THEME")
                .ok()
                .and_then(|name| {
                    let preset = ThemePreset::from_name(&name);
                    if preset.is_none() {
                        tracing::warn!("unknown theme preset {name:?}, using default");
                    }
                    preset
                })
                .unwrap_or(defaults.theme),
            dark_mode: env::var("LITSIFT_DARK_MODE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.dark_mode),
            request_timeout: env::var("LITSIFT_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            max_upload_bytes: env::var("LITSIFT_MAX_UPLOAD_MB")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|mb| *mb > 0)
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    /// Returns a copy pointing at another backend.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = trim_base_url(api_url);
        self
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_base_url() {
        assert_eq!(trim_base_url("http://localhost:8000/"), "http://localhost:8000");
        assert_eq!(trim_base_url(" http://x:1// "), "http://x:1");
        assert_eq!(trim_base_url("http://x:1"), "http://x:1");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("ON"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn test_with_api_url_strips_slash() {
        let config = Config::default().with_api_url("http://127.0.0.1:9999/");
        assert_eq!(config.api_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_default_upload_limit_exceeds_axum_default() {
        let config = Config::default();
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert!(config.max_upload_bytes > 2 * 1024 * 1024);
    }
}
