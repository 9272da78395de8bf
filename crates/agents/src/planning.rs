//! Planning stage: turn the selected topic into a Markdown outline.

use std::sync::Arc;

use pipeline::{GenerateRequest, PipelineError, ResearchOutcome, TextGeneration, TokenBudget};

/// Asks the generation provider for a structured blog outline.
pub struct PlanningAgent {
    generator: Arc<dyn TextGeneration>,
}

impl PlanningAgent {
    /// Creates the agent with an injected generation provider.
    pub fn new(generator: Arc<dyn TextGeneration>) -> Self {
        Self { generator }
    }

    /// Produces the outline for the research stage's selected topic.
    ///
    /// The only normalisation applied: when the reply does not open with a
    /// heading marker, an H1 built from the topic name is prepended so the
    /// content stage always sees a titled outline. Provider failures
    /// propagate.
    pub async fn plan(&self, research: &ResearchOutcome) -> Result<String, PipelineError> {
        let topic = research.selected_topic();
        let details = research.selected_topic_details();

        let prompt = planning_prompt(topic, details);
        let outline = self
            .generator
            .generate(GenerateRequest {
                prompt,
                max_tokens: TokenBudget::new(1000),
                temperature: 0.7,
            })
            .await
            .map_err(|source| PipelineError::Completion {
                stage: "planning",
                source,
            })?;

        if outline.starts_with('#') {
            Ok(outline)
        } else {
            tracing::debug!("outline missing a top-level heading; synthesising one");
            Ok(format!("# {topic}\n{outline}"))
        }
    }
}

fn planning_prompt(topic: &str, details: &str) -> String {
    format!(
        "Create a detailed blog outline in Markdown format for a 2000-word post on '{topic}'.
Use this research: {details}

Include:
1. An engaging introduction that sets the context and importance of {topic}
2. 3-5 main sections with relevant subheadings
3. A conclusion with actionable takeaways
4. Each section should have:
   - Clear heading
   - 1-2 sentence description of what will be covered
   - Key points or examples to be discussed

Format the outline in proper Markdown with:
- Main sections using ## (H2)
- Subsections using ### (H3)
- Bullet points for section descriptions
- Clear hierarchy and structure

Focus on:
- Current trends and developments
- Real-world applications and examples
- Industry statistics and data points
- Best practices and strategies
- Future implications"
    )
}
