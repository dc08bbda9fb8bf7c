//! The commit graph: an append-only map of commit id to [`Commit`].

use crate::error::{GraphError, Result};
use crate::types::{Commit, CommitId};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tracing::debug;

/// Owns every commit of a session and keeps parent/child links consistent.
///
/// Insertion is the only mutation. It validates the whole commit first and
/// only then writes the commit and its backlinks, so a refused insert leaves
/// the graph untouched.
#[derive(Debug, Clone, Default)]
pub struct CommitGraph {
    commits: HashMap<CommitId, Commit>,
    /// Insertion order, for stable iteration.
    order: Vec<CommitId>,
    root: Option<CommitId>,
}

impl CommitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph by inserting `commits` in the given order.
    ///
    /// Any `children_ids` carried by the input are discarded and recomputed.
    pub fn from_commits(commits: impl IntoIterator<Item = Commit>) -> Result<Self> {
        let mut graph = Self::new();
        for commit in commits {
            graph.insert(commit)?;
        }
        Ok(graph)
    }

    /// Insert a commit and link it under each of its parents.
    ///
    /// A parentless commit is accepted only while the graph is empty, and
    /// becomes the root. Every other commit must name one or two distinct
    /// parents that are already present.
    pub fn insert(&mut self, mut commit: Commit) -> Result<&Commit> {
        self.validate(&commit)?;

        commit.children_ids.clear();
        let id = commit.id.clone();
        for parent in &commit.parent_ids {
            if let Some(p) = self.commits.get_mut(parent) {
                p.children_ids.push(id.clone());
            }
        }
        if commit.is_root() {
            self.root = Some(id.clone());
        }
        debug!(commit = %id, parents = commit.parent_ids.len(), "inserted commit");

        self.order.push(id.clone());
        Ok(self.commits.entry(id).or_insert(commit))
    }

    fn validate(&self, commit: &Commit) -> Result<()> {
        if self.commits.contains_key(&commit.id) {
            return Err(GraphError::DuplicateId(commit.id.clone()));
        }

        if commit.parent_ids.is_empty() {
            if let Some(existing) = &self.root {
                return Err(GraphError::SecondRoot {
                    commit: commit.id.clone(),
                    existing: existing.clone(),
                });
            }
            return Ok(());
        }

        if commit.parent_ids.len() > 2 {
            return Err(GraphError::TooManyParents {
                commit: commit.id.clone(),
                count: commit.parent_ids.len(),
            });
        }

        for (i, parent) in commit.parent_ids.iter().enumerate() {
            if commit.parent_ids[..i].contains(parent) {
                return Err(GraphError::DuplicateParent {
                    commit: commit.id.clone(),
                    parent: parent.clone(),
                });
            }
            if !self.commits.contains_key(parent) {
                return Err(GraphError::DanglingParent {
                    commit: commit.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up a commit. A missing id is a normal outcome (e.g. a stale
    /// pointer), never an error.
    pub fn get(&self, id: &str) -> Option<&Commit> {
        self.commits.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commits.contains_key(id)
    }

    /// True only before the root has been inserted.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn root_id(&self) -> Option<&CommitId> {
        self.root.as_ref()
    }

    pub fn root(&self) -> Option<&Commit> {
        self.root.as_ref().and_then(|id| self.get(id.as_str()))
    }

    /// All commits in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Commit> {
        self.order.iter().filter_map(|id| self.commits.get(id))
    }
}

/// Serializes as a list of commits in insertion order.
impl Serialize for CommitGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
