//! Edit scripts: a JSON list of studio operations replayed in order.
//!
//! ```json
//! [
//!   { "op": "commit", "prompt": "add a hat", "label": "hat" },
//!   { "op": "select", "commit": "root" },
//!   { "op": "branch", "prompt": "add glasses", "label": "glasses" },
//!   { "op": "toggle", "commit": "hat" },
//!   { "op": "toggle", "commit": "glasses" },
//!   { "op": "merge", "prompt": "keep both" },
//!   { "op": "revert", "target": "hat" }
//! ]
//! ```
//!
//! Commits are referenced by label. `root` always names the uploaded image;
//! anything that is not a known label is passed through as a raw commit id.

use anyhow::{Context, Result, bail};
use pixelpath::v1::CommitId;
use pixelpath_studio::{Outcome, Studio};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Commit {
        prompt: String,
        #[serde(default)]
        label: Option<String>,
    },
    Branch {
        prompt: String,
        #[serde(default)]
        label: Option<String>,
    },
    Merge {
        prompt: String,
        #[serde(default)]
        label: Option<String>,
    },
    Revert {
        target: String,
        #[serde(default)]
        label: Option<String>,
    },
    Select {
        commit: String,
    },
    Toggle {
        commit: String,
    },
}

impl Op {
    fn label(&self) -> Option<&str> {
        match self {
            Op::Commit { label, .. }
            | Op::Branch { label, .. }
            | Op::Merge { label, .. }
            | Op::Revert { label, .. } => label.as_deref(),
            Op::Select { .. } | Op::Toggle { .. } => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Commit { prompt, .. } => write!(f, "commit {:?}", prompt),
            Op::Branch { prompt, .. } => write!(f, "branch {:?}", prompt),
            Op::Merge { prompt, .. } => write!(f, "merge {:?}", prompt),
            Op::Revert { target, .. } => write!(f, "revert to {}", target),
            Op::Select { commit } => write!(f, "select {}", commit),
            Op::Toggle { commit } => write!(f, "toggle {}", commit),
        }
    }
}

pub fn read_script(path: &Path) -> Result<Vec<Op>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

/// Applies script operations to a studio, tracking labels.
pub struct Replayer<'a> {
    studio: &'a Studio,
    labels: HashMap<String, CommitId>,
}

impl<'a> Replayer<'a> {
    /// `root` is the id returned by the initial upload.
    pub fn new(studio: &'a Studio, root: CommitId) -> Self {
        let mut labels = HashMap::new();
        labels.insert("root".to_string(), root);
        Self { studio, labels }
    }

    fn resolve(&self, reference: &str) -> String {
        self.labels
            .get(reference)
            .map(|id| id.to_string())
            .unwrap_or_else(|| reference.to_string())
    }

    pub async fn apply(&mut self, op: &Op) -> Result<()> {
        let outcome = match op {
            Op::Commit { prompt, .. } => self.studio.commit(prompt).await?,
            Op::Branch { prompt, .. } => self.studio.branch(prompt).await?,
            Op::Merge { prompt, .. } => self.studio.merge(prompt).await?,
            Op::Revert { target, .. } => self.studio.revert(&self.resolve(target))?,
            Op::Select { commit } => {
                if !self.studio.select_current(&self.resolve(commit)) {
                    bail!("Unknown commit {:?}", commit);
                }
                return Ok(());
            }
            Op::Toggle { commit } => {
                if !self.studio.toggle_merge_selection(&self.resolve(commit)) {
                    bail!("Unknown commit {:?}", commit);
                }
                return Ok(());
            }
        };

        match outcome {
            Outcome::Created(id) => {
                if let Some(label) = op.label() {
                    self.labels.insert(label.to_string(), id);
                }
                Ok(())
            }
            Outcome::Skipped(reason) => bail!("Skipped: {}", reason),
        }
    }

    pub async fn apply_all(&mut self, ops: &[Op]) -> Result<()> {
        for (i, op) in ops.iter().enumerate() {
            self.apply(op)
                .await
                .with_context(|| format!("Step {} ({}) failed", i + 1, op))?;
        }
        Ok(())
    }
}
