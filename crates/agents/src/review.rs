//! Review stage: structural cleanup, quality passes, and final polish.

use std::sync::Arc;

use pipeline::{
    parse, ChatCompletion, ChatMessage, ChatRequest, CompletionError, ImprovementSuggestions,
    ReviewOutcome, ReviewStatus, TokenBudget,
};

use crate::storage::{OutputStore, FINAL_FILE, SEO_CONTENT_FILE, SUGGESTIONS_FILE};

/// Polishes the optimized document through four completion passes.
pub struct ReviewAgent {
    chat: Arc<dyn ChatCompletion>,
    store: OutputStore,
}

impl ReviewAgent {
    /// Creates the agent with an injected chat provider and artifact store.
    pub fn new(chat: Arc<dyn ChatCompletion>, store: OutputStore) -> Self {
        Self { chat, store }
    }

    /// Runs the review passes, persisting the outcome either way.
    ///
    /// This stage never raises. Any internal failure — including a missing
    /// input file — is absorbed into a well-formed outcome with status
    /// [`ReviewStatus::Error`], the unmodified input as the final content,
    /// and the fixed failure suggestions. Both artifacts are written on the
    /// failure path too.
    pub async fn final_review(&self, content: Option<&str>) -> ReviewOutcome {
        let original = match content {
            Some(content) => content.to_string(),
            None => match self.store.read(SEO_CONTENT_FILE).await {
                Ok(content) => content,
                Err(err) => {
                    let path = self.store.path(SEO_CONTENT_FILE);
                    tracing::warn!(%err, path = %path.display(), "no content to review");
                    return self
                        .failure_outcome(
                            String::new(),
                            format!(
                                "no blog content provided and none could be read from {}",
                                path.display()
                            ),
                        )
                        .await;
                }
            },
        };

        match self.run_passes(&original).await {
            Ok(outcome) => {
                self.persist(&outcome).await;
                outcome
            }
            Err(err) => {
                tracing::warn!(%err, "review pass failed; returning the input unmodified");
                self.failure_outcome(original, err.to_string()).await
            }
        }
    }

    async fn run_passes(&self, content: &str) -> Result<ReviewOutcome, CompletionError> {
        let structured = self
            .chat_call(structure_prompt(content), 3000, 0.3)
            .await?;

        let enhanced = self.chat_call(quality_prompt(&structured), 3000, 0.4).await?;

        let suggestions_reply = self
            .chat_call(suggestions_prompt(&enhanced), 1000, 0.4)
            .await?;
        let improvement_suggestions = match parse::decode_suggestions(&suggestions_reply) {
            Ok(suggestions) => suggestions,
            Err(err) => {
                tracing::warn!(%err, "suggestions undecodable; substituting the fallback set");
                ImprovementSuggestions::decode_fallback()
            }
        };

        let polished = self.chat_call(final_check_prompt(&enhanced), 3000, 0.3).await?;
        let final_content = parse::strip_review_artifacts(&polished);

        Ok(ReviewOutcome {
            final_content,
            improvement_suggestions,
            status: ReviewStatus::Success,
            error: None,
        })
    }

    async fn failure_outcome(&self, original: String, error: String) -> ReviewOutcome {
        let outcome = ReviewOutcome {
            final_content: original,
            improvement_suggestions: ImprovementSuggestions::review_failed(),
            status: ReviewStatus::Error,
            error: Some(error),
        };
        self.persist(&outcome).await;
        outcome
    }

    async fn chat_call(
        &self,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        self.chat
            .complete(ChatRequest {
                messages: vec![ChatMessage::user(prompt)],
                max_tokens: TokenBudget::new(max_tokens),
                temperature,
            })
            .await
    }

    async fn persist(&self, outcome: &ReviewOutcome) {
        if let Err(err) = self.store.write(FINAL_FILE, &outcome.final_content).await {
            tracing::warn!(%err, artifact = FINAL_FILE, "review artifact could not be persisted");
        }
        let suggestions_json = serde_json::to_string_pretty(&outcome.improvement_suggestions)
            .unwrap_or_else(|_| "{}".to_string());
        if let Err(err) = self.store.write(SUGGESTIONS_FILE, &suggestions_json).await {
            tracing::warn!(%err, artifact = SUGGESTIONS_FILE, "review artifact could not be persisted");
        }
    }
}

fn structure_prompt(content: &str) -> String {
    format!(
        "Review and fix the markdown structure of this blog post. Return ONLY the corrected markdown content with:
1. Proper heading hierarchy (H1 > H2 > H3)
2. Consistent formatting for lists and bullet points
3. Proper spacing between sections
4. Correct markdown syntax for links and emphasis
5. Clean, organized table of contents

Content to review:
{content}"
    )
}

fn quality_prompt(content: &str) -> String {
    format!(
        "Enhance this blog post's quality. Focus on:
1. Clarity and conciseness
2. Professional tone
3. Engaging transitions
4. Active voice
5. Industry-specific terminology
6. Data-backed statements
7. Actionable insights

Content to enhance:
{content}"
    )
}

fn suggestions_prompt(content: &str) -> String {
    format!(
        "Analyze this blog post and provide specific suggestions for improvement in JSON format:
{{
    \"content_suggestions\": [
        \"suggestion1\",
        \"suggestion2\"
    ],
    \"seo_suggestions\": [
        \"suggestion1\",
        \"suggestion2\"
    ],
    \"engagement_suggestions\": [
        \"suggestion1\",
        \"suggestion2\"
    ]
}}

Blog content:
{content}"
    )
}

fn final_check_prompt(content: &str) -> String {
    format!(
        "Perform a final quality check on this blog post. Return ONLY the final blog content without any additional commentary or notes.
Ensure:
1. All sections are properly connected
2. No redundant information
3. Clear and professional tone throughout
4. Proper formatting and structure
5. SEO elements are well-integrated
6. No review comments or notes in the output

Content:
{content}"
    )
}
