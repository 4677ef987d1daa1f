//! Task model: an immutable unit of work plus its token estimate.

use serde::Serialize;
use std::path::Path;

use crate::result::Metadata;

/// Rough characters-per-token ratio used for cost estimation.
pub const CHARS_PER_TOKEN: u64 = 4;

/// A unit of work to be routed to an executor.
///
/// All fields are fixed at construction. The token estimate is derived once,
/// inside [`TaskBuilder::build`], and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    content: String,
    context_files: Vec<String>,
    estimated_tokens: u64,
    metadata: Metadata,
}

impl Task {
    /// Build a task with no context files, no metadata and a derived estimate.
    pub fn new(content: impl Into<String>) -> Self {
        Self::builder(content).build()
    }

    /// Start building a task.
    pub fn builder(content: impl Into<String>) -> TaskBuilder {
        TaskBuilder {
            content: content.into(),
            context_files: Vec::new(),
            estimated_tokens: 0,
            metadata: Metadata::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn context_files(&self) -> &[String] {
        &self.context_files
    }

    pub fn estimated_tokens(&self) -> u64 {
        self.estimated_tokens
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

/// Builder for [`Task`].
///
/// An explicit estimate of `0` is treated as "not supplied" and replaced by the
/// derived estimate.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    content: String,
    context_files: Vec<String>,
    estimated_tokens: u64,
    metadata: Metadata,
}

impl TaskBuilder {
    pub fn context_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn estimated_tokens(mut self, tokens: u64) -> Self {
        self.estimated_tokens = tokens;
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Insert a single metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Task {
        let estimated_tokens = if self.estimated_tokens == 0 {
            estimate_tokens(&self.content, &self.context_files)
        } else {
            self.estimated_tokens
        };

        Task {
            content: self.content,
            context_files: self.context_files,
            estimated_tokens,
            metadata: self.metadata,
        }
    }
}

/// Estimate the token cost of `content` plus every readable context file.
///
/// Each term is `chars / 4` (integer division). Files that are missing, not
/// valid UTF-8, or otherwise unreadable contribute zero.
pub fn estimate_tokens(content: &str, context_files: &[String]) -> u64 {
    let content_tokens = char_tokens(content);
    let context_tokens: u64 = context_files
        .iter()
        .map(|path| file_tokens(Path::new(path)))
        .sum();
    content_tokens + context_tokens
}

fn char_tokens(text: &str) -> u64 {
    text.chars().count() as u64 / CHARS_PER_TOKEN
}

fn file_tokens(path: &Path) -> u64 {
    match std::fs::read_to_string(path) {
        Ok(text) => char_tokens(&text),
        Err(e) => {
            tracing::trace!(path = %path.display(), error = %e, "Skipping unreadable context file");
            0
        }
    }
}
