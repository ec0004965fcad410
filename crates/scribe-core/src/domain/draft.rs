//! Draft post request and response types.

use serde::{Deserialize, Serialize};

use crate::content::ContentStats;

/// Model used for drafting when the caller does not pick one.
pub const DEFAULT_DRAFT_MODEL: &str = "mistral:7b";

/// Folder drafts land in when the caller does not pick one.
pub const DEFAULT_BLOG_FOLDER: &str = "posts";

fn default_model() -> String {
    DEFAULT_DRAFT_MODEL.to_string()
}

fn default_blog_folder() -> String {
    DEFAULT_BLOG_FOLDER.to_string()
}

/// Request to generate a new blog post draft from a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPostRequest {
    pub topic: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_blog_folder")]
    pub blog_folder: String,
}

impl DraftPostRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            model: default_model(),
            blog_folder: default_blog_folder(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_blog_folder(mut self, folder: impl Into<String>) -> Self {
        self.blog_folder = folder.into();
        self
    }
}

/// Result of a successful draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPostResponse {
    pub filename: String,
    pub preview: String,
    pub full_path: String,
    pub status: String,
    pub word_count: usize,
    pub content_stats: ContentStats,
    /// `None` when the draft passed every check.
    pub content_issues: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: DraftPostRequest = serde_json::from_str(r#"{"topic":"Rust"}"#).unwrap();
        assert_eq!(req.model, "mistral:7b");
        assert_eq!(req.blog_folder, "posts");
    }

    #[test]
    fn test_request_requires_topic() {
        assert!(serde_json::from_str::<DraftPostRequest>(r#"{"model":"x"}"#).is_err());
    }
}
