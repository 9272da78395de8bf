//! End-to-end pipeline runs against scripted providers.

mod common;

use common::{ScriptedChat, ScriptedGenerator};
use tempfile::TempDir;
use tokio::sync::mpsc;

use agents::storage::{
    DRAFT_FILE, FINAL_FILE, KEYWORD_FILE, SCHEMA_FILE, SEO_CONTENT_FILE, SUGGESTIONS_FILE,
};
use agents::{BlogPipeline, OutputStore};
use pipeline::{ProgressEvent, ReviewStatus};

fn temp_store() -> (TempDir, OutputStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = OutputStore::new(dir.path().join("output"));
    (dir, store)
}

const RESEARCH_REPLY: &str = "\
#### **Trending Renewable Energy Trends Topics in 2025**
1. **Grid-Scale Storage**: Battery costs fell sharply.
2. **Green Hydrogen**: Electrolyser capacity tripled.
3. **Agrivoltaics**: Dual-use solar farming grew.
4. **Offshore Wind**: Floating platforms matured.
5. **Virtual Power Plants**: Home batteries joined markets.

#### **Final Selected Topic:**
**Grid-Scale Storage** \u{2013} Storage underpins every other trend this year.";

const OUTLINE_REPLY: &str = "\
## Introduction
- Why storage matters now
## Storage Economics
- Falling battery costs
## Conclusion
- What to watch next";

const KEYWORD_REPLY: &str = r#"{
    "primary_keyword": "grid-scale storage",
    "secondary_keywords": ["battery costs", "utilities"],
    "lsi_keywords": ["lithium", "duck curve", "peak shaving"]
}"#;

fn scripted_happy_path() -> std::sync::Arc<ScriptedChat> {
    ScriptedChat::with_replies([
        // Research.
        RESEARCH_REPLY,
        // Content: one reply per outline section.
        "Intro section text.",
        "Economics section text.",
        "Conclusion section text.",
        // SEO: keywords, rewrite, schema.
        KEYWORD_REPLY,
        "# Optimized Storage Post\nRewritten for keywords.",
        r#"{"@context": "https://schema.org", "@type": "Article"}"#,
        // Review: structure, quality, suggestions, final polish.
        "# Structured\nBody.",
        "# Enhanced\nBody.",
        r#"{"content_suggestions": ["a"], "seo_suggestions": ["b"], "engagement_suggestions": ["c"]}"#,
        "# Grid-Scale Storage, Polished\nFinal body.",
    ])
}

#[tokio::test]
async fn full_run_emits_the_progress_schedule_and_writes_all_artifacts() {
    let (_dir, store) = temp_store();
    let chat = scripted_happy_path();
    let generator = ScriptedGenerator::with_reply(OUTLINE_REPLY);
    let blog = BlogPipeline::new(chat.clone(), generator.clone(), store.clone());

    let (tx, mut rx) = mpsc::channel(32);
    let outcome = blog
        .run("Renewable Energy Trends", tx)
        .await
        .expect("pipeline run");

    assert_eq!(outcome.status, ReviewStatus::Success);
    assert_eq!(
        outcome.final_content,
        "# Grid-Scale Storage, Polished\nFinal body."
    );

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events.len(), 6);
    for (index, event) in events[..5].iter().enumerate() {
        match event {
            ProgressEvent::Stage(update) => {
                assert_eq!(update.step as usize, index + 1);
            }
            other => panic!("expected a stage update, got {other:?}"),
        }
    }
    let percents: Vec<u8> = events[..5]
        .iter()
        .map(|event| match event {
            ProgressEvent::Stage(update) => update.progress.as_u8(),
            other => panic!("expected a stage update, got {other:?}"),
        })
        .collect();
    assert_eq!(percents, vec![0, 20, 40, 70, 90]);
    match &events[5] {
        ProgressEvent::Completed(notice) => {
            assert_eq!(notice.step, 6);
            assert_eq!(notice.status, "completed");
            assert_eq!(notice.progress.as_u8(), 100);
            assert_eq!(notice.content.status, ReviewStatus::Success);
        }
        other => panic!("expected a completion notice, got {other:?}"),
    }

    // 1 research + 3 sections + 3 SEO + 4 review chat calls; 1 outline call.
    assert_eq!(chat.recorded().len(), 11);
    assert_eq!(generator.recorded().len(), 1);

    // All six artifacts are on disk.
    for file in [
        DRAFT_FILE,
        SEO_CONTENT_FILE,
        SCHEMA_FILE,
        KEYWORD_FILE,
        FINAL_FILE,
        SUGGESTIONS_FILE,
    ] {
        assert!(store.read(file).await.is_ok(), "missing artifact: {file}");
    }

    // The draft on disk is the concatenated section chain.
    assert_eq!(
        store.read(DRAFT_FILE).await.expect("draft"),
        "Intro section text.\n\nEconomics section text.\n\nConclusion section text."
    );
}

#[tokio::test]
async fn failed_stage_emits_a_single_terminal_failure_notice() {
    let (_dir, store) = temp_store();
    let chat = ScriptedChat::with_replies([RESEARCH_REPLY]);
    let blog = BlogPipeline::new(chat, ScriptedGenerator::failing(), store);

    let (tx, mut rx) = mpsc::channel(32);
    let result = blog.run("Renewable Energy Trends", tx).await;
    assert!(result.is_err());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    // Research and planning stage updates, then one failure notice.
    assert_eq!(events.len(), 3);
    match &events[2] {
        ProgressEvent::Failed(notice) => {
            assert_eq!(notice.status, "error");
            assert!(notice.message.contains("planning"));
        }
        other => panic!("expected a failure notice, got {other:?}"),
    }
    assert!(events.iter().filter(|event| event.is_terminal()).count() == 1);
}
