//! Graph traversal and query operations for commit graphs.

use crate::store::CommitGraph;
use crate::types::{Commit, CommitId};
use std::collections::HashSet;

/// One entry of a render order: a commit and its nesting depth in the tree
/// projection (the root is depth 0).
#[derive(Debug, Clone, Copy)]
pub struct RenderEntry<'a> {
    pub commit: &'a Commit,
    pub depth: usize,
}

/// Depth-first, parent-to-child display order starting at `root_id`.
///
/// Children are visited in insertion order. A commit reachable along more
/// than one path (a merge, or anything below one) is emitted once, under the
/// first path that reaches it; later inbound edges are dropped. The display
/// is therefore a tree projection of the DAG.
///
/// # Examples
///
/// ```
/// use pixelpath::v1::{Commit, CommitGraph, query};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let mut graph = CommitGraph::new();
/// graph.insert(Commit::new("r", now)).unwrap();
/// graph.insert(Commit::new("a", now).with_parent("r")).unwrap();
/// graph.insert(Commit::new("b", now).with_parent("r")).unwrap();
/// graph.insert(Commit::new("m", now).with_parent("a").with_parent("b")).unwrap();
///
/// let order: Vec<&str> = query::render_order(&graph, "r")
///     .iter()
///     .map(|e| e.commit.id.as_str())
///     .collect();
/// assert_eq!(order, ["r", "a", "m", "b"]);
/// ```
pub fn render_order<'a>(graph: &'a CommitGraph, root_id: &str) -> Vec<RenderEntry<'a>> {
    let mut visited = HashSet::new();
    render_order_with(graph, root_id, &mut visited)
}

/// [`render_order`] with a caller-owned visited set.
///
/// Ids already in `visited` are treated as rendered and skipped, together
/// with anything only reachable through them. Every emitted id is added.
pub fn render_order_with<'a>(
    graph: &'a CommitGraph,
    root_id: &str,
    visited: &mut HashSet<CommitId>,
) -> Vec<RenderEntry<'a>> {
    let mut out = Vec::new();
    let mut stack: Vec<(&str, usize)> = vec![(root_id, 0)];

    while let Some((id, depth)) = stack.pop() {
        if visited.contains(id) {
            continue;
        }
        let Some(commit) = graph.get(id) else {
            continue;
        };
        visited.insert(commit.id.clone());
        out.push(RenderEntry { commit, depth });

        // Reversed so the first child is popped first.
        for child in commit.children_ids().iter().rev() {
            stack.push((child.as_str(), depth + 1));
        }
    }

    out
}

/// Walk parent links from `head_id`, returning all ancestor ids (inclusive).
pub fn ancestors(graph: &CommitGraph, head_id: &str) -> HashSet<CommitId> {
    let mut result = HashSet::new();
    let mut stack = vec![head_id];

    while let Some(id) = stack.pop() {
        if let Some(commit) = graph.get(id)
            && result.insert(commit.id.clone())
        {
            for parent in &commit.parent_ids {
                stack.push(parent.as_str());
            }
        }
    }

    result
}

/// Commits nobody builds on yet (no children), in insertion order.
pub fn heads(graph: &CommitGraph) -> Vec<&Commit> {
    graph
        .iter()
        .filter(|c| c.children_ids().is_empty())
        .collect()
}

/// Merge commits, in insertion order.
pub fn merges(graph: &CommitGraph) -> Vec<&Commit> {
    graph.iter().filter(|c| c.is_merge()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn build(edges: &[(&str, &[&str])]) -> CommitGraph {
        let ts = Utc.with_ymd_and_hms(2026, 1, 29, 10, 0, 0).unwrap();
        let mut graph = CommitGraph::new();
        for (id, parents) in edges {
            let mut commit = Commit::new(*id, ts);
            for p in *parents {
                commit = commit.with_parent(*p);
            }
            graph.insert(commit).unwrap();
        }
        graph
    }

    fn order(graph: &CommitGraph, root: &str) -> Vec<(String, usize)> {
        render_order(graph, root)
            .into_iter()
            .map(|e| (e.commit.id.to_string(), e.depth))
            .collect()
    }

    fn diamond() -> CommitGraph {
        build(&[("r", &[]), ("a", &["r"]), ("b", &["r"]), ("m", &["a", "b"])])
    }

    // ── render_order ───────────────────────────────────────────────────

    #[test]
    fn test_render_order_linear() {
        let graph = build(&[("r", &[]), ("c1", &["r"]), ("c2", &["c1"])]);
        assert_eq!(
            order(&graph, "r"),
            vec![("r".into(), 0), ("c1".into(), 1), ("c2".into(), 2)]
        );
    }

    #[test]
    fn test_render_order_children_in_insertion_order() {
        let graph = build(&[("r", &[]), ("z", &["r"]), ("a", &["r"]), ("z1", &["z"])]);
        let ids: Vec<String> = order(&graph, "r").into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["r", "z", "z1", "a"]);
    }

    #[test]
    fn test_render_order_diamond_emits_merge_once() {
        let graph = diamond();
        assert_eq!(
            order(&graph, "r"),
            vec![
                ("r".into(), 0),
                ("a".into(), 1),
                ("m".into(), 2),
                ("b".into(), 1)
            ]
        );
    }

    #[test]
    fn test_render_order_shared_descendants_once() {
        // Everything below the merge is reached twice as well.
        let graph = build(&[
            ("r", &[]),
            ("a", &["r"]),
            ("b", &["r"]),
            ("m", &["a", "b"]),
            ("m1", &["m"]),
            ("m2", &["m1"]),
        ]);
        let entries = order(&graph, "r");
        assert_eq!(entries.len(), graph.len());
        let unique: HashSet<&String> = entries.iter().map(|(id, _)| id).collect();
        assert_eq!(unique.len(), graph.len());
    }

    #[test]
    fn test_render_order_unknown_root_is_empty() {
        assert!(render_order(&diamond(), "nope").is_empty());
    }

    #[test]
    fn test_render_order_with_preseeded_visited() {
        let graph = diamond();
        let mut visited: HashSet<CommitId> = HashSet::new();
        visited.insert("a".into());
        let ids: Vec<&str> = render_order_with(&graph, "r", &mut visited)
            .iter()
            .map(|e| e.commit.id.as_str())
            .collect();
        // m is now first reached through b.
        assert_eq!(ids, vec!["r", "b", "m"]);
        assert_eq!(visited.len(), 4);
    }

    #[test]
    fn test_render_order_deep_chain_does_not_recurse() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 29, 10, 0, 0).unwrap();
        let mut graph = CommitGraph::new();
        graph.insert(Commit::new("c0", ts)).unwrap();
        for i in 1..20_000 {
            let commit = Commit::new(format!("c{i}"), ts).with_parent(format!("c{}", i - 1));
            graph.insert(commit).unwrap();
        }
        let entries = render_order(&graph, "c0");
        assert_eq!(entries.len(), 20_000);
        assert_eq!(entries.last().unwrap().depth, 19_999);
    }

    // ── ancestors / heads / merges ─────────────────────────────────────

    #[test]
    fn test_ancestors_through_merge() {
        let graph = build(&[
            ("r", &[]),
            ("a", &["r"]),
            ("b", &["r"]),
            ("x", &["r"]),
            ("m", &["a", "b"]),
        ]);
        let anc = ancestors(&graph, "m");
        assert_eq!(anc.len(), 4);
        assert!(anc.contains("r"));
        assert!(anc.contains("b"));
        assert!(!anc.contains("x"));
    }

    #[test]
    fn test_ancestors_of_missing_is_empty() {
        assert!(ancestors(&diamond(), "ghost").is_empty());
    }

    #[test]
    fn test_heads() {
        let graph = build(&[("r", &[]), ("a", &["r"]), ("b", &["r"]), ("a1", &["a"])]);
        let ids: Vec<&str> = heads(&graph).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a1"]);
    }

    #[test]
    fn test_merges() {
        let graph = diamond();
        let found = merges(&graph);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "m");
    }
}
