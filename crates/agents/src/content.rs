//! Content stage: expand each outline section into prose.

use std::sync::Arc;

use pipeline::{
    parse, ChatCompletion, ChatMessage, ChatRequest, OutlineSection, PipelineError, SectionBudget,
};

use crate::storage::{OutputStore, DRAFT_FILE};

/// Expands an outline into a full draft, one completion call per section.
pub struct ContentAgent {
    chat: Arc<dyn ChatCompletion>,
    store: OutputStore,
}

impl ContentAgent {
    /// Creates the agent with an injected chat provider and artifact store.
    pub fn new(chat: Arc<dyn ChatCompletion>, store: OutputStore) -> Self {
        Self { chat, store }
    }

    /// Generates the draft document and persists it as `blog_post.md`.
    ///
    /// The outline is split on its `## ` markers; every fragment gets one
    /// completion call sized by [`SectionBudget::for_heading`], and the
    /// section texts are joined in outline order with one blank line.
    /// A failed write is logged and reported, never raised: the generated
    /// draft is returned either way.
    pub async fn generate(&self, outline: &str) -> Result<String, PipelineError> {
        let sections = parse::split_outline(outline);
        let mut rendered = Vec::with_capacity(sections.len());

        for section in &sections {
            let budget = SectionBudget::for_heading(&section.heading);
            tracing::debug!(
                heading = %section.heading,
                words = %budget.word_target,
                "expanding outline section"
            );
            let text = self
                .chat
                .complete(ChatRequest {
                    messages: vec![ChatMessage::user(section_prompt(outline, section, budget))],
                    max_tokens: budget.max_tokens,
                    temperature: 0.7,
                })
                .await
                .map_err(|source| PipelineError::Completion {
                    stage: "content",
                    source,
                })?;
            rendered.push(text);
        }

        let draft = rendered.join("\n\n");

        match self.store.write(DRAFT_FILE, &draft).await {
            Ok(path) => tracing::info!(path = %path.display(), "draft persisted"),
            Err(err) => tracing::warn!(%err, "draft could not be persisted; continuing with the in-memory copy"),
        }

        Ok(draft)
    }
}

fn section_prompt(outline: &str, section: &OutlineSection, budget: SectionBudget) -> String {
    format!(
        "Write a detailed section for a blog post in Markdown format based on this outline:
{outline}

Section to write:
{heading}
{guidance}

Expand this into {words} words of professional, reader-focused content.
Include relevant trends, strategies, or examples as needed, ensuring the text is engaging and informative.",
        heading = section.heading,
        guidance = section.guidance,
        words = budget.word_target,
    )
}
