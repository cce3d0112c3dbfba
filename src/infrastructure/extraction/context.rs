/// Context for one parse call
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Base URL for resolving relative links
    pub base_url: String,

    /// Human-readable label of the page being parsed, for log lines
    pub page_label: String,
}

impl ParseContext {
    pub fn new(base_url: impl Into<String>, page_label: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_label: page_label.into(),
        }
    }
}
