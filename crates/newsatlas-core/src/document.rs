use serde::{Deserialize, Serialize};

/// One news item, created once at ingestion and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub description: String,
}

impl Document {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// The text the extraction pipeline operates on: title and description
    /// joined with a single space.
    #[must_use]
    pub fn text(&self) -> String {
        let title = self.title.trim();
        let description = self.description.trim();

        if title.is_empty() {
            description.to_string()
        } else if description.is_empty() {
            title.to_string()
        } else {
            format!("{title} {description}")
        }
    }

    /// Whitespace-delimited token count of the combined text.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}
