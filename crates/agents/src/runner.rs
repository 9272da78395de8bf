//! Sequential pipeline runner shared by both drivers.
//!
//! The runner owns the five agents and executes them in strict order,
//! pushing a progress event on the supplied channel before each stage and
//! exactly one terminal event at the end. The CLI driver logs the events;
//! the WebSocket listener forwards them to the client.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tokio::sync::mpsc;
use tracing::Instrument;

use pipeline::{
    ChatCompletion, PipelineError, ProgressEvent, ReviewOutcome, RunId, TextGeneration,
};

use crate::content::ContentAgent;
use crate::planning::PlanningAgent;
use crate::research::ResearchAgent;
use crate::review::ReviewAgent;
use crate::seo::SeoAgent;
use crate::storage::OutputStore;

/// How many trending topics the research stage asks for.
const TOPIC_COUNT: usize = 5;

/// The five agents wired together over shared providers and one store.
pub struct BlogPipeline {
    research: ResearchAgent,
    planning: PlanningAgent,
    content: ContentAgent,
    seo: SeoAgent,
    review: ReviewAgent,
}

impl BlogPipeline {
    /// Wires the agents from the two provider ports and the artifact store.
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        generator: Arc<dyn TextGeneration>,
        store: OutputStore,
    ) -> Self {
        Self {
            research: ResearchAgent::new(chat.clone()),
            planning: PlanningAgent::new(generator),
            content: ContentAgent::new(chat.clone(), store.clone()),
            seo: SeoAgent::new(chat.clone(), store.clone()),
            review: ReviewAgent::new(chat, store),
        }
    }

    /// Runs the five stages for `topic`, emitting progress on `progress`.
    ///
    /// Exactly one terminal event is emitted: a completion notice carrying
    /// the review outcome, or a failure notice with a human-readable
    /// message. A closed progress channel never interrupts the run; events
    /// for departed consumers are dropped.
    pub async fn run(
        &self,
        topic: &str,
        progress: mpsc::Sender<ProgressEvent>,
    ) -> Result<ReviewOutcome, PipelineError> {
        let run_id = RunId::new_random();
        let span = tracing::info_span!("blog_pipeline", %run_id, topic);
        let result = self.run_stages(topic, &progress).instrument(span).await;

        match &result {
            Ok(outcome) => {
                let _ = progress
                    .send(ProgressEvent::completed(outcome.clone()))
                    .await;
            }
            Err(err) => {
                tracing::error!(%err, "pipeline run failed");
                let _ = progress.send(ProgressEvent::failed(err.to_string())).await;
            }
        }

        result
    }

    async fn run_stages(
        &self,
        topic: &str,
        progress: &mpsc::Sender<ProgressEvent>,
    ) -> Result<ReviewOutcome, PipelineError> {
        let _ = progress.send(ProgressEvent::stage(0)).await;
        let research = self
            .research
            .research(topic, Utc::now().year(), TOPIC_COUNT)
            .await?;

        let _ = progress.send(ProgressEvent::stage(1)).await;
        let outline = self.planning.plan(&research).await?;

        let _ = progress.send(ProgressEvent::stage(2)).await;
        let draft = self.content.generate(&outline).await?;
        tracing::debug!(draft_chars = draft.len(), "draft generated");

        // The SEO and review stages read their inputs back from the store,
        // so a run always exercises the same artifact chain the files show.
        let _ = progress.send(ProgressEvent::stage(3)).await;
        self.seo.optimize(None).await?;

        let _ = progress.send(ProgressEvent::stage(4)).await;
        Ok(self.review.final_review(None).await)
    }
}
