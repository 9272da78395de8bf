//! Artifact persistence under the working output directory.
//!
//! Every run overwrites the previous run's files; there is no versioning
//! and no locking. The directory is created on first write.

use std::path::{Path, PathBuf};

use tokio::fs;

use pipeline::PipelineError;

/// Draft document written by the content stage.
pub const DRAFT_FILE: &str = "blog_post.md";
/// SEO-rewritten document.
pub const SEO_CONTENT_FILE: &str = "seo_optimized_blog.md";
/// Structured-markup blob (opaque text, not necessarily valid JSON).
pub const SCHEMA_FILE: &str = "schema_markup.json";
/// Keyword analysis record.
pub const KEYWORD_FILE: &str = "keyword_analysis.json";
/// Final reviewed document.
pub const FINAL_FILE: &str = "final_blog.md";
/// Reviewer suggestions record.
pub const SUGGESTIONS_FILE: &str = "improvement_suggestions.json";

/// Handle on the output directory all artifacts are written to.
#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk until
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the output directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the full path of one artifact.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Writes one artifact, creating the output directory on demand and
    /// overwriting any previous contents.
    pub async fn write(&self, name: &str, contents: &str) -> Result<PathBuf, PipelineError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| PipelineError::Persist {
                path: self.root.clone(),
                source,
            })?;
        let path = self.path(name);
        fs::write(&path, contents)
            .await
            .map_err(|source| PipelineError::Persist {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Reads one artifact back, byte-for-byte as written.
    pub async fn read(&self, name: &str) -> std::io::Result<String> {
        fs::read_to_string(self.path(name)).await
    }
}

impl Default for OutputStore {
    fn default() -> Self {
        Self::new("output")
    }
}
