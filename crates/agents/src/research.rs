//! Research stage: enumerate trending subtopics and pick the blog focus.

use std::sync::Arc;

use pipeline::{
    parse, ChatCompletion, ChatMessage, ChatRequest, PipelineError, ResearchOutcome, TokenBudget,
};

/// Asks the chat provider for trending topics and a selected focus topic.
pub struct ResearchAgent {
    chat: Arc<dyn ChatCompletion>,
}

impl ResearchAgent {
    /// Creates the agent with an injected chat provider.
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }

    /// Runs the research call and parses the reply.
    ///
    /// A reply that does not match the instructed shape degrades to
    /// [`ResearchOutcome::Unparsed`] with the raw text preserved — parse
    /// failures never escape this stage. Provider failures do propagate.
    pub async fn research(
        &self,
        topic: &str,
        year: i32,
        num_topics: usize,
    ) -> Result<ResearchOutcome, PipelineError> {
        let prompt = research_prompt(topic, year, num_topics);
        let reply = self
            .chat
            .complete(ChatRequest {
                messages: vec![ChatMessage::user(prompt)],
                max_tokens: TokenBudget::new(700),
                temperature: 0.7,
            })
            .await
            .map_err(|source| PipelineError::Completion {
                stage: "research",
                source,
            })?;

        match parse::parse_research_reply(&reply) {
            Ok(summary) => {
                tracing::info!(
                    topics = summary.trending_topics.len(),
                    selected = %summary.selected_topic,
                    "research reply parsed"
                );
                Ok(ResearchOutcome::Parsed(summary))
            }
            Err(err) => {
                tracing::warn!(%err, "research reply did not match the expected shape; carrying raw text forward");
                Ok(ResearchOutcome::Unparsed { raw_output: reply })
            }
        }
    }
}

fn research_prompt(topic: &str, year: i32, num_topics: usize) -> String {
    let placeholder_lines: String = (1..=num_topics)
        .map(|n| format!("{n}. **[Topic {n}]**: [Brief explanation]\n"))
        .collect();

    format!(
        "You are an expert {topic} researcher tracking the latest trends.
Your task is to identify the top {num_topics} trending {topic} topics for {year} and provide a brief explanation (2-3 sentences) for each.

For each trend, highlight:
- Why it is gaining traction.
- Key developments or statistics.
- A real-world example if available.

At the end, based on relevance and impact, **choose one topic** that would be the best focus for a detailed blog post.

Format the output as follows:

#### **Trending {topic} Topics in {year}**
{placeholder_lines}
#### **Final Selected Topic:**
**[Chosen Topic]** \u{2013} [Why this topic is the most relevant for a blog post]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_enumerates_the_requested_count() {
        let prompt = research_prompt("Renewable Energy", 2025, 3);
        assert!(prompt.contains("top 3 trending Renewable Energy topics for 2025"));
        assert!(prompt.contains("3. **[Topic 3]**"));
        assert!(!prompt.contains("4. **[Topic 4]**"));
        assert!(prompt.contains(parse::FINAL_TOPIC_MARKER));
    }
}
