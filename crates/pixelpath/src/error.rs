use crate::types::CommitId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Reasons the graph refuses an insertion.
///
/// None of these should occur under correct orchestration. When one does, the
/// graph is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("commit {commit} references missing parent {parent}")]
    DanglingParent { commit: CommitId, parent: CommitId },

    #[error("commit id {0} is already in the graph")]
    DuplicateId(CommitId),

    #[error("graph already has root {existing}; refusing second root {commit}")]
    SecondRoot { commit: CommitId, existing: CommitId },

    #[error("commit {commit} names {count} parents; at most 2 are allowed")]
    TooManyParents { commit: CommitId, count: usize },

    #[error("commit {commit} names parent {parent} more than once")]
    DuplicateParent { commit: CommitId, parent: CommitId },
}
