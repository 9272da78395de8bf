//! Shared value types for the DraftWorks pipeline domain.
//!
//! These types carry meaningful values with invariants (e.g. progress
//! percentages are in `[0, 100]`, fallback records are always fully
//! populated) and are passed from stage to stage. Each record is produced
//! once and handed forward, never updated in place.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Token and word-count types
// ---------------------------------------------------------------------------

/// Response-token cap handed to an LLM completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenBudget(u32);

impl TokenBudget {
    /// Creates a [`TokenBudget`] from a raw integer.
    pub const fn new(count: u32) -> Self {
        Self(count)
    }

    /// Returns the underlying integer value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TokenBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Word-count target a generated blog section is asked to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordTarget(u32);

impl WordTarget {
    /// Creates a [`WordTarget`] from a raw integer.
    pub const fn new(count: u32) -> Self {
        Self(count)
    }

    /// Returns the underlying integer value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for WordTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Word-count target and response-token cap for one outline section.
///
/// The policy is keyed off the section heading: introductions and
/// conclusions are kept short, body sections get the larger budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBudget {
    /// Word count the prompt asks the model to produce.
    pub word_target: WordTarget,
    /// Response-token cap for the completion call.
    pub max_tokens: TokenBudget,
}

impl SectionBudget {
    /// Selects the budget for a section from its heading line.
    ///
    /// A heading containing the substring `"Introduction"` or `"Conclusion"`
    /// (case-sensitive) targets 250 words with a 600-token cap; every other
    /// heading targets 400 words with a 1000-token cap.
    pub fn for_heading(heading: &str) -> Self {
        if heading.contains("Introduction") || heading.contains("Conclusion") {
            Self {
                word_target: WordTarget::new(250),
                max_tokens: TokenBudget::new(600),
            }
        } else {
            Self {
                word_target: WordTarget::new(400),
                max_tokens: TokenBudget::new(1000),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Progress percentage
// ---------------------------------------------------------------------------

/// A progress percentage in the range `[0, 100]`.
///
/// Carried by streaming progress notifications; serialises as the bare
/// integer so the wire shape stays flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressPercent(u8);

impl ProgressPercent {
    /// Creates a [`ProgressPercent`], returning `None` if `value` exceeds 100.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 100 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the percentage as a `u8` in `[0, 100]`.
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ProgressPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// ---------------------------------------------------------------------------
// Run identity
// ---------------------------------------------------------------------------

/// Identifies a single pipeline execution run.
///
/// Generated fresh for every run; propagated through spans so all activity
/// from one invocation can be correlated in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`RunId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Research stage records
// ---------------------------------------------------------------------------

/// One trending topic surfaced by the research stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Display name of the topic.
    pub topic: String,
    /// Short rationale for why the topic is trending.
    pub details: String,
}

/// Fully parsed research reply: the trending-topic list plus the one topic
/// the model selected as the blog focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchSummary {
    /// Topics enumerated by the model, in reply order.
    pub trending_topics: Vec<TopicRecord>,
    /// Name of the topic chosen for the blog post.
    pub selected_topic: String,
    /// Supporting detail text for the selected topic.
    pub selected_topic_details: String,
}

/// Outcome of the research stage.
///
/// Parse failures never escape the stage; an unrecognisable reply is
/// carried forward verbatim so downstream stages can still run with
/// placeholder topic text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchOutcome {
    /// The reply matched the expected shape.
    Parsed(ResearchSummary),
    /// The reply could not be parsed; the raw text is preserved.
    Unparsed {
        /// The model's reply, verbatim.
        raw_output: String,
    },
}

impl ResearchOutcome {
    /// Name of the selected topic, or a placeholder when the reply was
    /// unparseable.
    pub fn selected_topic(&self) -> &str {
        match self {
            Self::Parsed(summary) => &summary.selected_topic,
            Self::Unparsed { .. } => "Unknown Topic",
        }
    }

    /// Detail text for the selected topic, or a placeholder.
    pub fn selected_topic_details(&self) -> &str {
        match self {
            Self::Parsed(summary) => &summary.selected_topic_details,
            Self::Unparsed { .. } => "No details provided.",
        }
    }
}

// ---------------------------------------------------------------------------
// Outline records
// ---------------------------------------------------------------------------

/// One section block split out of the planning stage's Markdown outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSection {
    /// The heading line, marker included (e.g. `"## Introduction"`).
    pub heading: String,
    /// Non-blank descriptive lines below the heading, newline-joined.
    pub guidance: String,
}

// ---------------------------------------------------------------------------
// SEO stage records
// ---------------------------------------------------------------------------

/// Keyword analysis for a draft: one primary keyword plus secondary and
/// LSI (related) keyword lists.
///
/// Invariant: always fully populated. When extraction fails the fixed
/// [`KeywordRecord::fallback`] record is substituted, never a partial one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// The main topic keyword.
    pub primary_keyword: String,
    /// Supporting keywords, in model-preference order.
    pub secondary_keywords: Vec<String>,
    /// Latent-semantic-indexing (related) keywords.
    pub lsi_keywords: Vec<String>,
}

impl KeywordRecord {
    /// The placeholder record substituted when keyword extraction fails.
    pub fn fallback() -> Self {
        Self {
            primary_keyword: "blog topic".to_string(),
            secondary_keywords: ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"]
                .map(String::from)
                .to_vec(),
            lsi_keywords: ["related1", "related2", "related3", "related4", "related5"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Returns `true` when every field carries usable content.
    pub fn is_fully_populated(&self) -> bool {
        !self.primary_keyword.trim().is_empty()
            && !self.secondary_keywords.is_empty()
            && !self.lsi_keywords.is_empty()
    }
}

/// Everything the SEO stage produces: the keyword analysis, the rewritten
/// document, and the structured-markup blob (opaque text, not validated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoBundle {
    /// Keyword analysis driving the rewrite.
    pub keywords: KeywordRecord,
    /// The SEO-rewritten document.
    pub optimized_content: String,
    /// Structured-markup text, persisted verbatim.
    pub schema_markup: String,
}

// ---------------------------------------------------------------------------
// Review stage records
// ---------------------------------------------------------------------------

/// Reviewer suggestions, grouped into three named lists.
///
/// Invariant: all three lists are always present and non-empty; fixed
/// fallback text substitutes when the model's reply cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementSuggestions {
    /// Suggestions about the content itself.
    pub content_suggestions: Vec<String>,
    /// Suggestions about search-engine optimisation.
    pub seo_suggestions: Vec<String>,
    /// Suggestions about reader engagement.
    pub engagement_suggestions: Vec<String>,
}

impl ImprovementSuggestions {
    /// Fallback used when the suggestions reply cannot be decoded.
    pub fn decode_fallback() -> Self {
        Self {
            content_suggestions: ["Review content structure", "Add more examples"]
                .map(String::from)
                .to_vec(),
            seo_suggestions: ["Check keyword density", "Add more internal links"]
                .map(String::from)
                .to_vec(),
            engagement_suggestions: ["Include call-to-actions", "Add reader questions"]
                .map(String::from)
                .to_vec(),
        }
    }

    /// Fallback used when the review stage as a whole fails.
    pub fn review_failed() -> Self {
        let notice = vec!["Review failed - please check manually".to_string()];
        Self {
            content_suggestions: notice.clone(),
            seo_suggestions: notice.clone(),
            engagement_suggestions: notice,
        }
    }

    /// Returns `true` when all three lists carry at least one entry.
    pub fn is_fully_populated(&self) -> bool {
        !self.content_suggestions.is_empty()
            && !self.seo_suggestions.is_empty()
            && !self.engagement_suggestions.is_empty()
    }
}

/// Whether the review stage ran to completion or absorbed a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// All review passes completed.
    Success,
    /// A pass failed; the outcome carries degraded-but-well-formed content.
    Error,
}

/// Final output of the review stage.
///
/// The review stage never raises: on failure `status` is
/// [`ReviewStatus::Error`], `final_content` is the unmodified input, and
/// the suggestions are the fixed failure set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// The polished document (or the original input on failure).
    pub final_content: String,
    /// Reviewer suggestions for further manual improvement.
    pub improvement_suggestions: ImprovementSuggestions,
    /// Whether the review completed.
    pub status: ReviewStatus,
    /// Human-readable failure description, present only on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_and_conclusion_headings_get_short_budget() {
        for heading in ["## Introduction", "## Conclusion", "## Conclusion: Key Takeaways"] {
            let budget = SectionBudget::for_heading(heading);
            assert_eq!(budget.word_target, WordTarget::new(250));
            assert_eq!(budget.max_tokens, TokenBudget::new(600));
        }
    }

    #[test]
    fn body_headings_get_full_budget() {
        let budget = SectionBudget::for_heading("## Market Forces");
        assert_eq!(budget.word_target, WordTarget::new(400));
        assert_eq!(budget.max_tokens, TokenBudget::new(1000));
    }

    #[test]
    fn heading_match_is_case_sensitive() {
        // Lowercase "introduction" is a body section by the policy.
        let budget = SectionBudget::for_heading("## introduction");
        assert_eq!(budget.word_target, WordTarget::new(400));
    }

    #[test]
    fn progress_percent_rejects_out_of_range() {
        assert!(ProgressPercent::new(100).is_some());
        assert!(ProgressPercent::new(101).is_none());
    }

    #[test]
    fn fallback_records_are_fully_populated() {
        assert!(KeywordRecord::fallback().is_fully_populated());
        assert!(ImprovementSuggestions::decode_fallback().is_fully_populated());
        assert!(ImprovementSuggestions::review_failed().is_fully_populated());
    }

    #[test]
    fn unparsed_research_uses_placeholder_topic() {
        let outcome = ResearchOutcome::Unparsed {
            raw_output: "gibberish".to_string(),
        };
        assert_eq!(outcome.selected_topic(), "Unknown Topic");
        assert_eq!(outcome.selected_topic_details(), "No details provided.");
    }

    #[test]
    fn review_status_serialises_lowercase() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&ReviewStatus::Error).unwrap(),
            "\"error\""
        );
    }
}
