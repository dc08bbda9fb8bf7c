//! The session aggregate: graph, pointers, merge selection, and notice.

use crate::error::Stage;
use crate::notice::Notice;
use pixelpath::v1::{Commit, CommitGraph, CommitId, GraphError, MergeSelection};
use tracing::debug;

/// Everything a session mutates, owned in one place.
///
/// The studio holds this behind its lock; presenters only ever see clones
/// taken through [`Studio::snapshot`](crate::Studio::snapshot).
#[derive(Debug, Default)]
pub(crate) struct Workspace {
    graph: CommitGraph,
    current: Option<CommitId>,
    pub(crate) selection: MergeSelection,
    pub(crate) notice: Option<Notice>,
    pub(crate) stage: Option<Stage>,
}

impl Workspace {
    pub(crate) fn graph(&self) -> &CommitGraph {
        &self.graph
    }

    pub(crate) fn current_id(&self) -> Option<&CommitId> {
        self.current.as_ref()
    }

    /// Replace the whole session with a new graph rooted at `root`.
    ///
    /// The existing session is kept if `root` is refused.
    pub(crate) fn reset(&mut self, root: Commit) -> Result<CommitId, GraphError> {
        let mut graph = CommitGraph::new();
        let id = graph.insert(root)?.id.clone();
        *self = Workspace {
            graph,
            current: Some(id.clone()),
            ..Workspace::default()
        };
        debug!(root = %id, "session reset");
        Ok(id)
    }

    /// Insert `commit` and make it current.
    pub(crate) fn append(&mut self, commit: Commit) -> Result<CommitId, GraphError> {
        let id = self.graph.insert(commit)?.id.clone();
        self.current = Some(id.clone());
        debug!(current = %id, "advanced current commit");
        Ok(id)
    }

    /// Point the view at an existing commit. Clears the merge selection.
    pub(crate) fn select_current(&mut self, id: &str) -> bool {
        let Some(commit) = self.graph.get(id) else {
            return false;
        };
        self.current = Some(commit.id.clone());
        self.selection.clear();
        debug!(current = %id, "selected current commit");
        true
    }

    /// Toggle `id` in the merge selection. Unknown ids are ignored.
    pub(crate) fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.graph.contains(id) {
            return false;
        }
        self.selection.toggle(id);
        true
    }
}
