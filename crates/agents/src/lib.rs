//! DraftWorks pipeline stage implementations.
//!
//! This crate provides the five blog-generation agents (research, planning,
//! content, SEO, review), the output-directory artifact store, and the
//! [`BlogPipeline`] runner that drives them in strict sequence while
//! emitting progress events.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** Stages sequence calls between the domain logic in the
//! `pipeline` crate and the provider traits implemented by the `llm` crate.
//! They contain the prompt text and the per-stage failure policy, nothing
//! else.
//!
//! ## Failure policy per stage
//!
//! | Stage | Provider failure | Reply-shape miss |
//! |----------|------------------|------------------|
//! | research | propagates | absorbed (`ResearchOutcome::Unparsed`) |
//! | planning | propagates | n/a (H1 synthesised when missing) |
//! | content | propagates | n/a (fragment split cannot miss) |
//! | seo | propagates | keyword record falls back |
//! | review | absorbed (status `error`) | suggestions fall back |

pub mod content;
pub mod planning;
pub mod research;
pub mod review;
pub mod runner;
pub mod seo;
pub mod storage;

pub use content::ContentAgent;
pub use planning::PlanningAgent;
pub use research::ResearchAgent;
pub use review::ReviewAgent;
pub use runner::BlogPipeline;
pub use seo::SeoAgent;
pub use storage::OutputStore;
