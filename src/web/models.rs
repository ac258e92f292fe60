use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateKeywordsForm {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpandKeywordForm {
    #[serde(default)]
    pub keyword: String,
}
