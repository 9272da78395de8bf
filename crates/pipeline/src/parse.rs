//! Response-shape parsers for free-text LLM replies.
//!
//! Every heuristic that depends on how a model formats its reply lives
//! here, one narrow function per shape, so a heuristic can be hardened or
//! swapped without touching orchestration code. A miss is always a typed
//! [`MalformedResponse`]; the calling stage decides whether to absorb it
//! into a fallback value or fail the run.

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::MalformedResponse;
use crate::types::{
    ImprovementSuggestions, KeywordRecord, OutlineSection, ResearchSummary, TopicRecord,
};

/// Marker separating the trending-topic list from the final selection block
/// in a research reply. The research prompt instructs the model to emit it.
pub const FINAL_TOPIC_MARKER: &str = "#### **Final Selected Topic:**";

/// Generic section marker used as the positional fallback when the final
/// selection marker is absent.
const SECTION_MARKER: &str = "####";

/// Separator between the selected topic name and its rationale, as the
/// research prompt instructs (a spaced en dash).
const SELECTION_SEPARATOR: &str = " \u{2013} ";

/// Self-referential preamble some models prepend to a polished document.
pub const REVIEWER_PREAMBLE: &str = "After conducting a thorough review";

/// Trailer phrase some models append to enumerate their edits.
pub const ADJUSTMENTS_TRAILER: &str = "I made the following adjustments:";

// ---------------------------------------------------------------------------
// Research reply
// ---------------------------------------------------------------------------

/// Parses a research reply into the topic list and the selected topic.
///
/// The reply is split on [`FINAL_TOPIC_MARKER`]; when the model dropped the
/// marker, the reply is split on the generic `####` heading marker and the
/// second and third chunks are taken positionally. Numbered lines are
/// matched by their expected ordinal (`1.`, `2.`, …); a line that does not
/// start with the next ordinal is skipped, but a matched line missing its
/// `**…**:` structure fails the whole parse.
pub fn parse_research_reply(reply: &str) -> Result<ResearchSummary, MalformedResponse> {
    const SHAPE: &str = "research";

    let (topics_section, final_section) = match reply.split_once(FINAL_TOPIC_MARKER) {
        Some((topics, finals)) => (topics, finals),
        None => {
            let mut chunks = reply.split(SECTION_MARKER);
            let _preamble = chunks.next();
            let topics = chunks.next().ok_or_else(|| {
                MalformedResponse::new(SHAPE, "no trending-topics section found")
            })?;
            let finals = chunks.next().ok_or_else(|| {
                MalformedResponse::new(SHAPE, "no final-selection section found")
            })?;
            (topics, finals)
        }
    };

    let mut trending_topics = Vec::new();
    for line in topics_section.trim().lines() {
        let ordinal = format!("{}.", trending_topics.len() + 1);
        if !line.starts_with(ordinal.as_str()) {
            continue;
        }
        let details = line
            .split_once("**: ")
            .ok_or_else(|| {
                MalformedResponse::new(SHAPE, format!("numbered line missing `**: `: {line:?}"))
            })?
            .1;
        let topic = line.split("**").nth(1).ok_or_else(|| {
            MalformedResponse::new(SHAPE, format!("numbered line missing bold topic: {line:?}"))
        })?;
        trending_topics.push(TopicRecord {
            topic: topic.to_string(),
            details: details.to_string(),
        });
    }

    let final_text = final_section.trim();
    let (selected, details) = match final_text.split_once(SELECTION_SEPARATOR) {
        Some((name, rest)) => (name, rest.trim()),
        None => (final_text, ""),
    };
    let selected_topic = selected.trim().trim_matches('*').to_string();

    Ok(ResearchSummary {
        trending_topics,
        selected_topic,
        selected_topic_details: details.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Outline
// ---------------------------------------------------------------------------

/// Splits a Markdown outline into per-section blocks on the `## ` marker.
///
/// Each non-empty fragment becomes one section; a fragment that lost its
/// marker to the split gets it re-prefixed. The first line of a fragment
/// is the heading, the remaining non-blank lines are guidance text. Note
/// that an outline beginning with an `# ` title yields the title block as
/// its first section.
pub fn split_outline(outline: &str) -> Vec<OutlineSection> {
    let mut sections = Vec::new();
    for fragment in outline.split("\n## ") {
        if fragment.trim().is_empty() {
            continue;
        }
        let block = if fragment.starts_with('#') {
            fragment.to_string()
        } else {
            format!("## {fragment}")
        };
        let block = block.trim();
        let mut lines = block.lines();
        let heading = lines.next().unwrap_or_default().trim().to_string();
        let guidance = lines
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(OutlineSection { heading, guidance });
    }
    sections
}

// ---------------------------------------------------------------------------
// JSON blobs
// ---------------------------------------------------------------------------

fn json_blob_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("literal pattern compiles"))
}

/// Returns the first brace-delimited substring of `reply`, dot matching
/// newlines, or `None` when the reply carries no braces at all.
pub fn extract_json_blob(reply: &str) -> Option<&str> {
    json_blob_pattern().find(reply).map(|found| found.as_str())
}

/// Decodes a keyword-analysis reply.
///
/// The reply is narrowed to its first JSON blob (models often wrap the
/// object in prose or code fences) and decoded; a record with an empty
/// primary keyword or empty keyword list is rejected so the caller's
/// fallback keeps the always-fully-populated invariant.
pub fn decode_keyword_record(reply: &str) -> Result<KeywordRecord, MalformedResponse> {
    const SHAPE: &str = "keyword analysis";

    let blob = extract_json_blob(reply).unwrap_or(reply);
    let record: KeywordRecord = serde_json::from_str(blob)
        .map_err(|err| MalformedResponse::new(SHAPE, err.to_string()))?;
    if !record.is_fully_populated() {
        return Err(MalformedResponse::new(
            SHAPE,
            "record is missing a primary keyword or has an empty keyword list",
        ));
    }
    Ok(record)
}

/// Decodes an improvement-suggestions reply.
pub fn decode_suggestions(reply: &str) -> Result<ImprovementSuggestions, MalformedResponse> {
    const SHAPE: &str = "improvement suggestions";

    let suggestions: ImprovementSuggestions = serde_json::from_str(reply.trim())
        .map_err(|err| MalformedResponse::new(SHAPE, err.to_string()))?;
    if !suggestions.is_fully_populated() {
        return Err(MalformedResponse::new(
            SHAPE,
            "one or more suggestion lists is empty",
        ));
    }
    Ok(suggestions)
}

// ---------------------------------------------------------------------------
// Review cleanup
// ---------------------------------------------------------------------------

/// Strips known reviewer self-commentary from a polished document.
///
/// Two observed model habits are handled: a self-referential opening
/// paragraph (dropped through its first blank line) and an "adjustments"
/// trailer enumerating the edits (truncated at the phrase). Both are plain
/// substring matches against observed phrasing, not Markdown rules.
pub fn strip_review_artifacts(text: &str) -> String {
    let mut cleaned = text;
    if cleaned.contains(REVIEWER_PREAMBLE) {
        if let Some((_preamble, rest)) = cleaned.split_once("\n\n") {
            cleaned = rest;
        }
    }
    match cleaned.find(ADJUSTMENTS_TRAILER) {
        Some(index) => cleaned[..index].trim().to_string(),
        None => cleaned.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESEARCH_REPLY: &str = "\
#### **Trending Renewable Energy Topics in 2025**
1. **Grid-Scale Storage**: Battery costs fell 40% and utilities are racing to deploy.
2. **Green Hydrogen**: Electrolyser capacity tripled across Europe and Asia.
3. **Agrivoltaics**: Dual-use solar farming is gaining regulatory support.
4. **Offshore Wind**: Floating platforms opened deep-water sites to development.
5. **Virtual Power Plants**: Aggregated home batteries now bid into wholesale markets.

#### **Final Selected Topic:**
**Grid-Scale Storage** \u{2013} Storage sits at the centre of every other trend and has the freshest data.";

    #[test]
    fn parses_reply_with_final_marker() {
        let summary = parse_research_reply(RESEARCH_REPLY).unwrap();
        assert_eq!(summary.trending_topics.len(), 5);
        assert_eq!(summary.trending_topics[0].topic, "Grid-Scale Storage");
        assert_eq!(
            summary.trending_topics[1].details,
            "Electrolyser capacity tripled across Europe and Asia."
        );
        assert_eq!(summary.selected_topic, "Grid-Scale Storage");
        assert!(summary
            .selected_topic_details
            .starts_with("Storage sits at the centre"));
    }

    #[test]
    fn falls_back_to_positional_sections_without_marker() {
        let reply = "\
Intro narration from the model.
#### Trending Topics
1. **Solar**: Cheap panels everywhere.
2. **Wind**: Bigger turbines offshore.
#### **Solar** \u{2013} The cost curve is the story.";
        let summary = parse_research_reply(reply).unwrap();
        assert_eq!(summary.trending_topics.len(), 2);
        assert_eq!(summary.selected_topic, "Solar");
        assert_eq!(summary.selected_topic_details, "The cost curve is the story.");
    }

    #[test]
    fn skips_lines_without_the_expected_ordinal() {
        let reply = "\
Some framing sentence from the model.
1. **Solar**: Cheap panels.
And a stray remark.
2. **Wind**: Offshore growth.
#### **Final Selected Topic:**
**Wind**";
        let summary = parse_research_reply(reply).unwrap();
        assert_eq!(summary.trending_topics.len(), 2);
        // No separator after the dash: details default to empty.
        assert_eq!(summary.selected_topic, "Wind");
        assert_eq!(summary.selected_topic_details, "");
    }

    #[test]
    fn matched_line_without_bold_structure_fails_the_parse() {
        let reply = "\
#### Topics
1. Solar without any bold markers.
#### Selection
**Solar**";
        assert!(parse_research_reply(reply).is_err());
    }

    #[test]
    fn reply_without_sections_fails_the_parse() {
        assert!(parse_research_reply("I could not find any trends.").is_err());
    }

    #[test]
    fn outline_splits_into_sections_in_order() {
        let outline = "\
## Introduction
- Set the scene
## Market Forces
- Costs
- Policy
## Conclusion
- Takeaways";
        let sections = split_outline(outline);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].heading, "## Introduction");
        assert_eq!(sections[1].heading, "## Market Forces");
        assert_eq!(sections[1].guidance, "- Costs\n- Policy");
        assert_eq!(sections[2].heading, "## Conclusion");
    }

    #[test]
    fn outline_title_block_counts_as_a_section() {
        let outline = "# Grid-Scale Storage\nWhy it matters.\n## Introduction\n- Hook";
        let sections = split_outline(outline);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "# Grid-Scale Storage");
        assert_eq!(sections[0].guidance, "Why it matters.");
        assert_eq!(sections[1].heading, "## Introduction");
    }

    #[test]
    fn blank_fragments_are_dropped() {
        let sections = split_outline("## Only Section\n- point\n## ");
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn json_blob_is_extracted_from_narration() {
        let reply = "Sure! Here is the analysis:\n```json\n{\"a\": 1}\n```\nHope that helps.";
        assert_eq!(extract_json_blob(reply), Some("{\"a\": 1}"));
        assert_eq!(extract_json_blob("no braces here"), None);
    }

    #[test]
    fn keyword_record_decodes_from_wrapped_json() {
        let reply = r#"Here you go: {"primary_keyword": "grid storage",
            "secondary_keywords": ["battery", "utility"],
            "lsi_keywords": ["lithium", "duck curve"]} — let me know!"#;
        let record = decode_keyword_record(reply).unwrap();
        assert_eq!(record.primary_keyword, "grid storage");
        assert_eq!(record.secondary_keywords.len(), 2);
    }

    #[test]
    fn keyword_record_rejects_empty_fields() {
        let reply = r#"{"primary_keyword": "", "secondary_keywords": ["a"], "lsi_keywords": ["b"]}"#;
        assert!(decode_keyword_record(reply).is_err());
        assert!(decode_keyword_record("not json at all").is_err());
    }

    #[test]
    fn suggestions_require_all_three_lists() {
        let ok = r#"{"content_suggestions": ["tighten intro"],
            "seo_suggestions": ["add alt text"],
            "engagement_suggestions": ["end with a question"]}"#;
        assert!(decode_suggestions(ok).is_ok());

        let empty_list = r#"{"content_suggestions": [],
            "seo_suggestions": ["x"], "engagement_suggestions": ["y"]}"#;
        assert!(decode_suggestions(empty_list).is_err());
        assert!(decode_suggestions("```json\n{}\n```").is_err());
    }

    #[test]
    fn reviewer_preamble_paragraph_is_dropped() {
        let text = "After conducting a thorough review, I polished the post.\n\n# The Post\nBody.";
        assert_eq!(strip_review_artifacts(text), "# The Post\nBody.");
    }

    #[test]
    fn adjustments_trailer_is_truncated() {
        let text = "# The Post\nBody.\n\nI made the following adjustments: fixed headings.";
        assert_eq!(strip_review_artifacts(text), "# The Post\nBody.");
    }

    #[test]
    fn clean_documents_pass_through_unchanged() {
        let text = "# The Post\n\nBody paragraph.";
        assert_eq!(strip_review_artifacts(text), text);
    }
}
