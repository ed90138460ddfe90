//! Lightweight search query wrapper.

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, limit: usize) -> Self {
        Self {
            text: text.into().trim().to_string(),
            limit,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}
