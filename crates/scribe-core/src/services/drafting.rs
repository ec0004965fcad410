//! One-shot blog post drafting: topic in, post file out.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::content;
use crate::domain::{ChatCompletionRequest, ChatMessage, DraftPostRequest, DraftPostResponse};
use crate::error::CoreError;
use crate::ports::ChatCompletionPort;
use crate::posts::{dated_stem, draft_front_matter, preview, strip_front_matter, write_unique};

/// Extension of generated drafts unless configured otherwise (Quarto).
pub const DEFAULT_DRAFT_EXTENSION: &str = "qmd";

const DRAFT_TEMPERATURE: f32 = 0.7;
const DRAFT_MAX_TOKENS: u32 = 2000;
const PREVIEW_CHARS: usize = 200;

const WRITER_SYSTEM_PROMPT: &str = "You are an expert technical writer who creates engaging blog posts in Quarto format. Start directly with the main content - do NOT include YAML frontmatter as it will be added automatically.";

/// Generates a complete draft post for a topic and writes it to disk.
#[derive(Debug)]
pub struct DraftService {
    completions: Arc<dyn ChatCompletionPort>,
    extension: String,
}

impl DraftService {
    pub fn new(completions: Arc<dyn ChatCompletionPort>) -> Self {
        Self {
            completions,
            extension: DEFAULT_DRAFT_EXTENSION.to_string(),
        }
    }

    /// Use a different file extension for drafts (without the dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Draft a post about `request.topic`.
    ///
    /// The model is checked against the runtime's installed models first. If
    /// that list cannot be fetched the check is skipped with a warning; if it
    /// can and the model is missing, the call fails with `InvalidInput`.
    pub async fn draft_post(&self, request: &DraftPostRequest) -> Result<DraftPostResponse, CoreError> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(CoreError::InvalidInput("topic must not be empty".to_string()));
        }

        self.ensure_model_available(&request.model).await?;

        info!(model = %request.model, topic = %topic, "Drafting post");
        let chat = ChatCompletionRequest::new(
            request.model.clone(),
            vec![
                ChatMessage::system(WRITER_SYSTEM_PROMPT),
                ChatMessage::user(writer_prompt(topic)),
            ],
        )
        .with_temperature(Some(DRAFT_TEMPERATURE))
        .with_max_tokens(DRAFT_MAX_TOKENS);

        let response = self.completions.complete(&chat).await?;
        let body = strip_front_matter(response.first_content()).trim();

        let today = Local::now().date_naive();
        let post = format!("{}{body}", draft_front_matter(topic, today));

        let content_stats = content::stats(&post);
        let issues = content::validate(&post);

        let path = write_unique(
            Path::new(&request.blog_folder),
            &dated_stem(today, topic),
            &self.extension,
            &post,
        )
        .await?;
        let full_path = tokio::fs::canonicalize(&path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!(
            filename = %filename,
            words = content_stats.word_count,
            issues = issues.len(),
            "Draft written"
        );

        Ok(DraftPostResponse {
            filename,
            preview: preview(body, PREVIEW_CHARS),
            full_path: full_path.display().to_string(),
            status: "success".to_string(),
            word_count: content_stats.word_count,
            content_stats,
            content_issues: (!issues.is_empty()).then_some(issues),
        })
    }

    async fn ensure_model_available(&self, model: &str) -> Result<(), CoreError> {
        match self.completions.list_models().await {
            Ok(models) if models.iter().any(|m| m == model) => Ok(()),
            Ok(models) => Err(CoreError::InvalidInput(format!(
                "Model '{model}' is not available. Available models: {}",
                models.join(", ")
            ))),
            Err(e) => {
                warn!("Could not validate model availability: {e}");
                Ok(())
            }
        }
    }
}

fn writer_prompt(topic: &str) -> String {
    format!(
        "Create a comprehensive Quarto blog post about \"{topic}\".

Structure the post with:
1. YAML frontmatter including title, description, author, date, categories
2. Introduction paragraph
3. Main content with headings and subheadings
4. Code examples if relevant
5. Conclusion

Make it engaging and informative. Use proper Quarto markdown formatting.

Topic: {topic}"
    )
}
