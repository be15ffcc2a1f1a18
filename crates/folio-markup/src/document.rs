//! Stored article bodies

use serde::{Deserialize, Serialize};

/// One titled section of an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl Topic {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: content.into(),
        }
    }
}

/// An article body in one of its two stored representations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupDocument {
    Content(String),
    Topics(Vec<Topic>),
}

/// Body fields as stored by the editor. Both may be present on old records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,
}

impl ArticleBody {
    /// Resolve the representation to render. Topics win whenever present,
    /// even an empty list; `content` is ignored in that case.
    pub fn document(&self) -> MarkupDocument {
        match &self.topics {
            Some(topics) => MarkupDocument::Topics(topics.clone()),
            None => MarkupDocument::Content(self.content.clone().unwrap_or_default()),
        }
    }
}
