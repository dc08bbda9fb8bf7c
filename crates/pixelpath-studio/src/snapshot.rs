use crate::error::Stage;
use crate::notice::Notice;
use pixelpath::v1::{Commit, CommitGraph, CommitId, MergeSelection, query};
use serde::Serialize;

/// Whether an operation is in flight, and where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Status {
    Idle,
    Running { stage: Option<Stage> },
}

impl Status {
    /// Progress text while running.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Status::Running { stage: Some(stage) } => Some(stage.message()),
            _ => None,
        }
    }
}

/// A read-only copy of a studio's state, taken at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub commits: CommitGraph,
    pub root_id: Option<CommitId>,
    pub current_id: Option<CommitId>,
    pub selection: MergeSelection,
    pub status: Status,
    /// The latest error notice, if it has not expired yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// The original upload next to the image currently being viewed.
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    pub original: &'a Commit,
    pub current: &'a Commit,
}

impl Snapshot {
    pub fn get(&self, id: &str) -> Option<&Commit> {
        self.commits.get(id)
    }

    pub fn root(&self) -> Option<&Commit> {
        self.root_id.as_ref().and_then(|id| self.get(id.as_str()))
    }

    pub fn current(&self) -> Option<&Commit> {
        self.current_id.as_ref().and_then(|id| self.get(id.as_str()))
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, Status::Running { .. })
    }

    pub fn comparison(&self) -> Option<Comparison<'_>> {
        Some(Comparison {
            original: self.root()?,
            current: self.current()?,
        })
    }

    /// Commits in display order; empty before an upload.
    pub fn render_order(&self) -> Vec<query::RenderEntry<'_>> {
        match &self.root_id {
            Some(root) => query::render_order(&self.commits, root.as_str()),
            None => Vec::new(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
