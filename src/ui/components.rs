use serde_json::Value;
use std::collections::BTreeSet;

use crate::theme::Theme;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub trait Component {
    /// Registry name, also the suffix of the themed class.
    const NAME: &'static str;

    fn render(&self, theme: &Theme) -> String;
}

/// The set of components pages may render.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    names: BTreeSet<&'static str>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button, InputText, Toast, DataTable and Column.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register::<Button>();
        registry.register::<InputText>();
        registry.register::<super::toast::ToastMessage>();
        registry.register::<DataTable>();
        registry.register::<Column>();
        registry
    }

    pub fn register<C: Component>(&mut self) {
        self.names.insert(C::NAME);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    /// Renders `component`, or nothing if its type was never registered.
    pub fn render<C: Component>(&self, theme: &Theme, component: &C) -> String {
        if !self.contains(C::NAME) {
            tracing::warn!("failed to resolve component: {}", C::NAME);
            return String::new();
        }
        component.render(theme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Submit,
    Link,
}

#[derive(Debug, Clone)]
pub struct Button {
    pub label: String,
    pub icon: Option<String>,
    pub action: ButtonAction,
    pub href: Option<String>,
}

impl Button {
    pub fn submit(label: &str) -> Self {
        Self {
            label: label.to_string(),
            icon: None,
            action: ButtonAction::Submit,
            href: None,
        }
    }

    pub fn link(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            icon: None,
            action: ButtonAction::Link,
            href: Some(href.to_string()),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }
}

impl Component for Button {
    const NAME: &'static str = "button";

    fn render(&self, theme: &Theme) -> String {
        let class = theme.class_for(Self::NAME);
        let icon = self
            .icon
            .as_deref()
            .map(|i| format!(r#"<span class="pi {}"></span> "#, escape(i)))
            .unwrap_or_default();
        let label = escape(&self.label);
        match (self.action, &self.href) {
            (ButtonAction::Link, Some(href)) => {
                format!(r#"<a class="{class}" href="{}">{icon}{label}</a>"#, escape(href))
            }
            _ => format!(r#"<button type="submit" class="{class}">{icon}{label}</button>"#),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    File,
}

#[derive(Debug, Clone)]
pub struct InputText {
    pub name: String,
    pub kind: InputKind,
    pub value: String,
    pub placeholder: String,
}

impl InputText {
    pub fn new(name: &str, kind: InputKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value: String::new(),
            placeholder: String::new(),
        }
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }
}

impl Component for InputText {
    const NAME: &'static str = "inputtext";

    fn render(&self, theme: &Theme) -> String {
        let class = theme.class_for(Self::NAME);
        let name = escape(&self.name);
        let placeholder = escape(&self.placeholder);
        match self.kind {
            InputKind::Text => format!(
                r#"<input type="text" class="{class}" name="{name}" value="{}" placeholder="{placeholder}">"#,
                escape(&self.value)
            ),
            InputKind::TextArea => format!(
                r#"<textarea class="{class}" name="{name}" placeholder="{placeholder}">{}</textarea>"#,
                escape(&self.value)
            ),
            InputKind::File => format!(r#"<input type="file" class="{class}" name="{name}">"#),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: String,
    pub header: String,
}

impl Column {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            header: field.to_string(),
        }
    }
}

impl Component for Column {
    const NAME: &'static str = "column";

    fn render(&self, theme: &Theme) -> String {
        format!(
            r#"<th class="{}" data-field="{}">{}</th>"#,
            theme.class_for(Self::NAME),
            escape(&self.field),
            escape(&self.header)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Tabulates an arbitrary JSON payload.
    ///
    /// Arrays of objects get one column per key, in order of first
    /// appearance. Arrays of scalars get a single `value` column. An object
    /// holding exactly one array field is tabulated through that array;
    /// other objects become `field`/`value` rows.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::from_array(items),
            Value::Object(map) => {
                let arrays: Vec<&Vec<Value>> = map.values().filter_map(Value::as_array).collect();
                if let [only] = arrays.as_slice() {
                    return Self::from_array(only);
                }
                DataTable {
                    columns: vec![Column::new("field"), Column::new("value")],
                    rows: map.iter().map(|(k, v)| vec![k.clone(), cell(v)]).collect(),
                }
            }
            scalar => DataTable {
                columns: vec![Column::new("value")],
                rows: vec![vec![cell(scalar)]],
            },
        }
    }

    fn from_array(items: &[Value]) -> Self {
        if !items.iter().all(Value::is_object) || items.is_empty() {
            return DataTable {
                columns: vec![Column::new("value")],
                rows: items.iter().map(|v| vec![cell(v)]).collect(),
            };
        }

        let mut fields: Vec<String> = Vec::new();
        for item in items {
            if let Value::Object(map) = item {
                for key in map.keys() {
                    if !fields.contains(key) {
                        fields.push(key.clone());
                    }
                }
            }
        }

        let rows = items
            .iter()
            .map(|item| {
                fields
                    .iter()
                    .map(|f| item.get(f).map(cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        DataTable {
            columns: fields.iter().map(|f| Column::new(f)).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Component for DataTable {
    const NAME: &'static str = "datatable";

    fn render(&self, theme: &Theme) -> String {
        let mut html = format!(r#"<table class="{}"><thead><tr>"#, theme.class_for(Self::NAME));
        for column in &self.columns {
            html.push_str(&column.render(theme));
        }
        html.push_str("</tr></thead><tbody>");
        if self.rows.is_empty() {
            html.push_str(&format!(
                r#"<tr><td colspan="{}">No results found.</td></tr>"#,
                self.columns.len().max(1)
            ));
        }
        for row in &self.rows {
            html.push_str("<tr>");
            for value in row {
                html.push_str(&format!("<td>{}</td>", escape(value)));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }
}
