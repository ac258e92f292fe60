use crate::error::ApiError;
use crate::theme::Theme;

use super::components::{Component, escape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Milliseconds before the toast hides itself.
    pub life: u32,
}

impl Component for ToastMessage {
    const NAME: &'static str = "toast";

    fn render(&self, theme: &Theme) -> String {
        format!(
            r#"<div class="{} {}-{}" role="alert" data-life="{}"><strong>{}</strong> <span>{}</span></div>"#,
            theme.class_for(Self::NAME),
            theme.class_for("toast-message"),
            self.severity.as_str(),
            self.life,
            escape(&self.summary),
            escape(&self.detail)
        )
    }
}

/// Builds toast messages with a shared display lifetime.
#[derive(Debug, Clone)]
pub struct ToastService {
    life: u32,
}

impl ToastService {
    pub const DEFAULT_LIFE_MS: u32 = 3000;

    pub fn new(life: u32) -> Self {
        Self { life }
    }

    pub fn add(&self, severity: Severity, summary: &str, detail: &str) -> ToastMessage {
        ToastMessage {
            severity,
            summary: summary.to_string(),
            detail: detail.to_string(),
            life: self.life,
        }
    }

    pub fn request_failed(&self, err: &ApiError) -> ToastMessage {
        self.add(Severity::Error, "Request failed", &err.to_string())
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIFE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_request_failed_toast() {
        let err = ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        let toast = ToastService::new(5000).request_failed(&err);
        assert_eq!(toast.severity, Severity::Error);
        assert_eq!(toast.life, 5000);
        assert_eq!(toast.detail, "HTTP error! status: 502, details: upstream down");

        let html = toast.render(&Theme::default());
        assert!(html.contains(r#"class="p-toast p-toast-message-error""#));
        assert!(html.contains(r#"data-life="5000""#));
    }
}
