//! Progress notifications emitted while a pipeline run executes.
//!
//! Both drivers consume the same event stream: the CLI logs each event,
//! the WebSocket listener forwards each event to the client as JSON text.
//! The wire shapes are flat records, serialised untagged, so a client sees
//! exactly `{"step": 1, "agent": …, "progress": 0}` frames with no enum
//! wrapper.

use serde::{Deserialize, Serialize};

use crate::types::{ProgressPercent, ReviewOutcome};

/// Fixed description of one pipeline step, emitted before the step runs.
#[derive(Debug, Clone, Copy)]
pub struct StageDescriptor {
    /// 1-based step number.
    pub step: u8,
    /// Human-facing agent name.
    pub agent: &'static str,
    /// Machine-facing status keyword.
    pub status: &'static str,
    /// Human-facing description of the work in flight.
    pub message: &'static str,
    /// Rough wall-clock estimate shown to the client.
    pub estimated_time: &'static str,
    /// Percent complete when this step begins.
    pub progress: u8,
}

/// The five pipeline steps, in execution order.
pub const STAGES: [StageDescriptor; 5] = [
    StageDescriptor {
        step: 1,
        agent: "Research Agent",
        status: "researching",
        message: "Gathering comprehensive data on the topic...",
        estimated_time: "30-45 seconds",
        progress: 0,
    },
    StageDescriptor {
        step: 2,
        agent: "Planning Agent",
        status: "planning",
        message: "Creating structured outline and content plan...",
        estimated_time: "20-30 seconds",
        progress: 20,
    },
    StageDescriptor {
        step: 3,
        agent: "Content Agent",
        status: "writing",
        message: "Generating engaging blog content...",
        estimated_time: "60-90 seconds",
        progress: 40,
    },
    StageDescriptor {
        step: 4,
        agent: "SEO Agent",
        status: "optimizing",
        message: "Optimizing content for search engines...",
        estimated_time: "20-30 seconds",
        progress: 70,
    },
    StageDescriptor {
        step: 5,
        agent: "Review Agent",
        status: "reviewing",
        message: "Performing final review and polish...",
        estimated_time: "30-45 seconds",
        progress: 90,
    },
];

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// Notification that a pipeline step is starting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUpdate {
    /// 1-based step number.
    pub step: u8,
    /// Human-facing agent name.
    pub agent: String,
    /// Machine-facing status keyword.
    pub status: String,
    /// Human-facing description of the work in flight.
    pub message: String,
    /// Rough wall-clock estimate.
    pub estimated_time: String,
    /// Percent complete when this step begins.
    pub progress: ProgressPercent,
}

impl From<&StageDescriptor> for StageUpdate {
    fn from(descriptor: &StageDescriptor) -> Self {
        Self {
            step: descriptor.step,
            agent: descriptor.agent.to_string(),
            status: descriptor.status.to_string(),
            message: descriptor.message.to_string(),
            estimated_time: descriptor.estimated_time.to_string(),
            progress: ProgressPercent::new(descriptor.progress)
                .expect("stage table percentages are within range"),
        }
    }
}

/// Terminal notification carrying the final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionNotice {
    /// Always one past the last stage.
    pub step: u8,
    /// Always `"completed"`.
    pub status: String,
    /// Human-facing completion message.
    pub message: String,
    /// Always 100.
    pub progress: ProgressPercent,
    /// The review stage's outcome, in full.
    pub content: ReviewOutcome,
}

/// Terminal notification reporting a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureNotice {
    /// Always `"error"`.
    pub status: String,
    /// Human-readable failure description.
    pub message: String,
}

/// Idle keep-alive frame, sent every 30 seconds while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepAlive {
    /// Always `"ping"`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Any notification a pipeline run can emit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProgressEvent {
    /// A step is starting.
    Stage(StageUpdate),
    /// The run finished; carries the final result.
    Completed(CompletionNotice),
    /// The run failed; the connection closes after this.
    Failed(FailureNotice),
    /// Idle keep-alive.
    Ping(KeepAlive),
}

impl ProgressEvent {
    /// Notification for the start of the step at `index` in [`STAGES`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; the runner only indexes with the
    /// fixed step constants.
    pub fn stage(index: usize) -> Self {
        Self::Stage(StageUpdate::from(&STAGES[index]))
    }

    /// Completion notification wrapping the review outcome.
    pub fn completed(outcome: ReviewOutcome) -> Self {
        Self::Completed(CompletionNotice {
            step: STAGES.len() as u8 + 1,
            status: "completed".to_string(),
            message: "Blog post generated successfully!".to_string(),
            progress: ProgressPercent::new(100).expect("100 is a valid percentage"),
            content: outcome,
        })
    }

    /// Failure notification with a human-readable message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(FailureNotice {
            status: "error".to_string(),
            message: message.into(),
        })
    }

    /// Keep-alive notification.
    pub fn ping() -> Self {
        Self::Ping(KeepAlive {
            kind: "ping".to_string(),
        })
    }

    /// Returns `true` for the two notifications that end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_table_progress_schedule() {
        let schedule: Vec<u8> = STAGES.iter().map(|s| s.progress).collect();
        assert_eq!(schedule, vec![0, 20, 40, 70, 90]);
        let steps: Vec<u8> = STAGES.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ping_wire_shape() {
        let json = serde_json::to_string(&ProgressEvent::ping()).unwrap();
        assert_eq!(json, r#"{"type":"ping"}"#);
    }

    #[test]
    fn stage_update_serialises_flat() {
        let json = serde_json::to_value(ProgressEvent::stage(0)).unwrap();
        assert_eq!(json["step"], 1);
        assert_eq!(json["agent"], "Research Agent");
        assert_eq!(json["status"], "researching");
        assert_eq!(json["progress"], 0);
        // No enum tag leaks onto the wire.
        assert!(json.get("Stage").is_none());
    }

    #[test]
    fn terminal_detection() {
        assert!(ProgressEvent::failed("boom").is_terminal());
        assert!(!ProgressEvent::ping().is_terminal());
        assert!(!ProgressEvent::stage(2).is_terminal());
    }
}
