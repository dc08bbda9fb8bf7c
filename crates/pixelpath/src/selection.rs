//! Two-slot selection used to pick merge parents.

use crate::types::{Commit, CommitId};
use serde::{Deserialize, Serialize};

/// Ordered selection of up to two commit ids, oldest first.
///
/// Toggling works like a checkbox list with a sliding window: selecting a
/// third commit evicts the oldest selection.
///
/// ```
/// use pixelpath::v1::MergeSelection;
///
/// let mut sel = MergeSelection::new();
/// sel.toggle("a");
/// sel.toggle("b");
/// sel.toggle("c");
/// assert_eq!(sel.ids(), ["b", "c"]);
///
/// sel.toggle("b");
/// assert_eq!(sel.ids(), ["c"]);
/// assert!(!sel.is_merge_ready());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeSelection {
    ids: Vec<CommitId>,
}

impl MergeSelection {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id`, or deselect it if it is already selected.
    pub fn toggle(&mut self, id: impl Into<CommitId>) {
        let id = id.into();
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else if self.ids.len() < Self::CAPACITY {
            self.ids.push(id);
        } else {
            self.ids.remove(0);
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// True iff exactly two commits are selected.
    pub fn is_merge_ready(&self) -> bool {
        self.ids.len() == Self::CAPACITY
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> &[CommitId] {
        &self.ids
    }

    /// The two selections in selection order, when merge-ready.
    pub fn pair(&self) -> Option<(&CommitId, &CommitId)> {
        match self.ids.as_slice() {
            [first, second] => Some((first, second)),
            _ => None,
        }
    }
}

/// Choose which of two merge parents supplies the base image.
///
/// The later timestamp wins. On an exact tie the first-selected commit
/// (`first`) wins, so the choice never depends on comparison order.
pub fn merge_base<'a>(first: &'a Commit, second: &'a Commit) -> &'a Commit {
    if second.timestamp > first.timestamp {
        second
    } else {
        first
    }
}
