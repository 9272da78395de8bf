//! SEO stage: keyword extraction, keyword-driven rewrite, schema markup.

use std::sync::Arc;

use pipeline::{
    parse, ChatCompletion, ChatMessage, ChatRequest, KeywordRecord, PipelineError, SeoBundle,
    TokenBudget,
};

use crate::storage::{OutputStore, DRAFT_FILE, KEYWORD_FILE, SCHEMA_FILE, SEO_CONTENT_FILE};

/// How much of the original draft the schema prompt embeds.
const SCHEMA_EXCERPT_CHARS: usize = 500;

/// Rewrites a draft around extracted keywords and emits schema markup.
pub struct SeoAgent {
    chat: Arc<dyn ChatCompletion>,
    store: OutputStore,
}

impl SeoAgent {
    /// Creates the agent with an injected chat provider and artifact store.
    pub fn new(chat: Arc<dyn ChatCompletion>, store: OutputStore) -> Self {
        Self { chat, store }
    }

    /// Runs the three SEO calls and persists the three artifacts.
    ///
    /// When no draft is supplied, the persisted `blog_post.md` is read
    /// instead; if that also fails the stage errors out. Keyword-record
    /// decode failures fall back to [`KeywordRecord::fallback`]; every
    /// other failure before the three calls finish propagates. Once the
    /// calls complete, persistence is attempted unconditionally and a
    /// write failure is logged rather than raised.
    pub async fn optimize(&self, draft: Option<&str>) -> Result<SeoBundle, PipelineError> {
        let content = match draft {
            Some(content) => content.to_string(),
            None => {
                self.store
                    .read(DRAFT_FILE)
                    .await
                    .map_err(|_| PipelineError::DraftUnavailable {
                        path: self.store.path(DRAFT_FILE),
                    })?
            }
        };

        let keywords = self.analyze_keywords(&content).await?;

        let optimized_content = self
            .chat_call(optimization_prompt(&content, &keywords), 3000, 0.5)
            .await?;

        let schema_markup = self
            .chat_call(schema_prompt(&content, &keywords), 1000, 0.3)
            .await?;

        let bundle = SeoBundle {
            keywords,
            optimized_content,
            schema_markup,
        };

        self.persist(&bundle).await;

        Ok(bundle)
    }

    /// Extracts the keyword record from the draft.
    ///
    /// Decode failures and partially-populated records substitute the
    /// fixed fallback record so the output shape is always complete.
    async fn analyze_keywords(&self, content: &str) -> Result<KeywordRecord, PipelineError> {
        let reply = self.chat_call(keyword_prompt(content), 1000, 0.3).await?;
        match parse::decode_keyword_record(&reply) {
            Ok(record) => Ok(record),
            Err(err) => {
                tracing::warn!(%err, "keyword analysis undecodable; substituting the fallback record");
                Ok(KeywordRecord::fallback())
            }
        }
    }

    async fn chat_call(
        &self,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, PipelineError> {
        self.chat
            .complete(ChatRequest {
                messages: vec![ChatMessage::user(prompt)],
                max_tokens: TokenBudget::new(max_tokens),
                temperature,
            })
            .await
            .map_err(|source| PipelineError::Completion {
                stage: "seo",
                source,
            })
    }

    async fn persist(&self, bundle: &SeoBundle) {
        let keyword_json = serde_json::to_string_pretty(&bundle.keywords)
            .unwrap_or_else(|_| "{}".to_string());
        let writes = [
            (SEO_CONTENT_FILE, bundle.optimized_content.as_str()),
            (SCHEMA_FILE, bundle.schema_markup.as_str()),
            (KEYWORD_FILE, keyword_json.as_str()),
        ];
        for (name, contents) in writes {
            if let Err(err) = self.store.write(name, contents).await {
                tracing::warn!(%err, artifact = name, "SEO artifact could not be persisted");
            }
        }
    }
}

fn keyword_prompt(content: &str) -> String {
    format!(
        "Analyze this blog content and extract SEO keywords. Return ONLY a JSON object in this exact format:
{{
    \"primary_keyword\": \"main topic keyword\",
    \"secondary_keywords\": [\"keyword1\", \"keyword2\", \"keyword3\", \"keyword4\", \"keyword5\"],
    \"lsi_keywords\": [\"related1\", \"related2\", \"related3\", \"related4\", \"related5\", \"related6\", \"related7\", \"related8\"]
}}

Blog content:
{content}

Remember: Return ONLY the JSON object, no additional text or explanation."
    )
}

fn optimization_prompt(content: &str, keywords: &KeywordRecord) -> String {
    format!(
        "Enhance this blog post for SEO while maintaining its professional tone and readability.

Primary keyword: {primary}
Secondary keywords: {secondary}
LSI keywords: {lsi}

Please:
1. Add an SEO-optimized meta description (155 characters max) using the primary keyword
2. Optimize headings with relevant keywords (H1 should contain primary keyword)
3. Add internal linking suggestions based on the topic and keywords
4. Naturally incorporate all keywords throughout the content
5. Enhance readability with:
   - Shorter paragraphs (3-4 sentences max)
   - Bullet points for lists
   - Transition sentences
   - Strategic keyword placement (especially in first/last paragraphs)
6. Add a table of contents
7. Include relevant statistics and data points
8. Add strategic CTAs that align with the content topic
9. Suggest relevant meta tags

Original content:
{content}",
        primary = keywords.primary_keyword,
        secondary = keywords.secondary_keywords.join(", "),
        lsi = keywords.lsi_keywords.join(", "),
    )
}

fn schema_prompt(content: &str, keywords: &KeywordRecord) -> String {
    // Char-based excerpt: byte slicing could split a multi-byte character.
    let excerpt: String = content.chars().take(SCHEMA_EXCERPT_CHARS).collect();
    format!(
        "Create JSON-LD schema markup for this blog post. Include:
1. Article schema (using primary keyword: {primary})
2. Organization schema
3. BreadcrumbList schema
4. FAQPage schema (generate 3-4 relevant FAQs based on the content)

Blog content first paragraph:
{excerpt}...

Keywords to incorporate:
Primary: {primary}
Secondary: {secondary}",
        primary = keywords.primary_keyword,
        secondary = keywords.secondary_keywords.join(", "),
    )
}
