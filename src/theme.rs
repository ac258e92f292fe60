//! Theme presets and options applied to every rendered page.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    Aura,
    Lara,
    Nora,
    Material,
}

impl ThemePreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "aura" => Some(Self::Aura),
            "lara" => Some(Self::Lara),
            "nora" => Some(Self::Nora),
            "material" => Some(Self::Material),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aura => "aura",
            Self::Lara => "lara",
            Self::Nora => "nora",
            Self::Material => "material",
        }
    }
}

/// Named CSS cascade layer the component styles are emitted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssLayer {
    pub name: String,
    /// Comma separated layer order, declared once per page.
    pub order: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub preset: ThemePreset,
    /// Prefix for every component class, `p` gives `p-button`.
    pub prefix: String,
    /// Class that switches the page into dark mode when present on `<html>`.
    pub dark_mode_selector: String,
    pub css_layer: CssLayer,
    pub dark: bool,
}

impl Theme {
    pub fn new(preset: ThemePreset, dark: bool) -> Self {
        Self {
            preset,
            prefix: "p".to_string(),
            dark_mode_selector: ".my-app-dark".to_string(),
            css_layer: CssLayer {
                name: "primevue".to_string(),
                order: "app-styles, primevue, another-css-library".to_string(),
            },
            dark,
        }
    }

    /// Component class name, e.g. `class_for("datatable")` -> `p-datatable`.
    pub fn class_for(&self, component: &str) -> String {
        format!("{}-{}", self.prefix, component)
    }

    /// Classes for the root `<html>` element.
    pub fn root_classes(&self) -> String {
        let mut classes = format!("{}-theme-{}", self.prefix, self.preset.name());
        if self.dark {
            classes.push(' ');
            classes.push_str(self.dark_mode_selector.trim_start_matches('.'));
        }
        classes
    }

    /// `@layer` statement declaring the cascade order.
    pub fn layer_statement(&self) -> String {
        format!("@layer {};", self.css_layer.order)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemePreset::Aura, false)
    }
}
