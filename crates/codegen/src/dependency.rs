//! Dependency lookup, reference resolution and block ordering.
//!
//! Edges point from the upstream node (`source`) to the node that depends on
//! it (`target`). Duplicated edges and self-loops are legitimate and are kept
//! in `depends_on` as-is.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::{DependencyEdge, ResourceKind, ResourceNode};
use crate::sanitize::NameCache;

/// Upstream node ids of `node_id`, in edge-list order.
///
/// Not deduplicated: two edges from the same source yield that source twice.
#[must_use]
pub fn dependencies_of<'e>(node_id: &str, edges: &'e [DependencyEdge]) -> Vec<&'e str> {
    edges
        .iter()
        .filter(|edge| edge.target == node_id)
        .map(|edge| edge.source.as_str())
        .collect()
}

/// Maps node ids to `decl_type.name` references.
///
/// Only nodes that were actually emitted are registered, so a reference can
/// never point at a block that is missing from the output.
#[derive(Debug, Default)]
pub struct ReferenceResolver<'n> {
    targets: HashMap<&'n str, (&'static str, &'n str)>,
}

impl<'n> ReferenceResolver<'n> {
    /// Index the given emitted nodes. The first node wins on a repeated id.
    pub fn new(nodes: impl IntoIterator<Item = (ResourceKind, &'n ResourceNode)>) -> Self {
        let mut targets = HashMap::new();
        for (kind, node) in nodes {
            targets
                .entry(node.id.as_str())
                .or_insert((kind.declaration_type(), node.naming_source()));
        }
        Self { targets }
    }

    /// Resolve upstream ids into qualified references, dropping unknown ids.
    ///
    /// Names come from the same cache that named the declarations, so a
    /// reference always matches its target's header.
    pub fn to_references(&self, upstream: &[&str], names: &mut NameCache) -> Vec<String> {
        upstream
            .iter()
            .filter_map(|id| match self.targets.get(id) {
                Some((declaration_type, source)) => {
                    Some(format!("{declaration_type}.{}", names.name_for(source)))
                }
                None => {
                    tracing::debug!(upstream = %id, "Dropping unresolved dependency reference");
                    None
                }
            })
            .collect()
    }
}

/// Order `ids` so that every upstream node comes before its dependents.
///
/// Ties are broken by position in `ids`, so an edge-free graph keeps input
/// order. Self-loops and edges touching unknown ids are ignored. Returns the
/// permutation as indices into `ids`, or `None` when the remaining graph has
/// a cycle.
#[must_use]
pub fn dependency_order(ids: &[&str], edges: &[DependencyEdge]) -> Option<Vec<usize>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(ids.len(), edges.len());
    let mut index_of: HashMap<&str, NodeIndex> = HashMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        let index = graph.add_node(position);
        index_of.entry(*id).or_insert(index);
    }

    for edge in edges {
        if edge.source == edge.target {
            continue;
        }
        if let (Some(&from), Some(&to)) = (
            index_of.get(edge.source.as_str()),
            index_of.get(edge.target.as_str()),
        ) {
            graph.add_edge(from, to, ());
        }
    }

    if is_cyclic_directed(&graph) {
        return None;
    }

    // Kahn's algorithm with a min-heap on input position keeps the order stable.
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|index| graph.neighbors_directed(index, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(position, _)| Reverse(position))
        .collect();

    let mut order = Vec::with_capacity(ids.len());
    while let Some(Reverse(position)) = ready.pop() {
        order.push(position);
        for next in graph.neighbors_directed(NodeIndex::new(position), Direction::Outgoing) {
            let degree = &mut in_degree[next.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse(next.index()));
            }
        }
    }

    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: &str, target: &str) -> DependencyEdge {
        DependencyEdge::new(format!("{source}->{target}"), source, target)
    }

    #[test]
    fn test_dependencies_in_edge_order_with_duplicates() {
        let edges = vec![
            edge("b", "app"),
            edge("a", "app"),
            edge("b", "app"),
            edge("app", "other"),
            edge("app", "app"),
        ];
        assert_eq!(dependencies_of("app", &edges), vec!["b", "a", "b", "app"]);
        assert!(dependencies_of("a", &edges).is_empty());
    }

    #[test]
    fn test_references_drop_unknown_ids() {
        let vpc = ResourceNode::new("v1", "vpc", "Main VPC");
        let db = ResourceNode::new("d1", "rds", "  ");
        let resolver =
            ReferenceResolver::new([(ResourceKind::Vpc, &vpc), (ResourceKind::Rds, &db)]);
        let mut names = NameCache::new();

        assert_eq!(
            resolver.to_references(&["v1", "ghost", "d1", "v1"], &mut names),
            vec!["aws_vpc.main_vpc", "aws_db_instance.d1", "aws_vpc.main_vpc"]
        );
    }

    #[test]
    fn test_references_empty_when_nothing_resolves() {
        let resolver = ReferenceResolver::default();
        assert!(resolver.to_references(&["x"], &mut NameCache::new()).is_empty());
    }

    #[test]
    fn test_dependency_order_moves_upstream_first() {
        let ids = ["app", "db", "vpc"];
        let edges = vec![edge("vpc", "db"), edge("db", "app")];
        assert_eq!(dependency_order(&ids, &edges), Some(vec![2, 1, 0]));
    }

    #[test]
    fn test_dependency_order_is_stable_without_edges() {
        let ids = ["c", "a", "b"];
        assert_eq!(dependency_order(&ids, &[]), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_dependency_order_ties_by_input_position() {
        // `x` must follow `z`; `y` is free and keeps its place ahead of `z`.
        let ids = ["x", "y", "z"];
        let edges = vec![edge("z", "x")];
        assert_eq!(dependency_order(&ids, &edges), Some(vec![1, 2, 0]));
    }

    #[test]
    fn test_dependency_order_ignores_self_loops_and_unknown_ids() {
        let ids = ["a", "b"];
        let edges = vec![edge("a", "a"), edge("ghost", "b"), edge("a", "b"), edge("a", "b")];
        assert_eq!(dependency_order(&ids, &edges), Some(vec![0, 1]));
    }

    #[test]
    fn test_dependency_order_detects_cycles() {
        let ids = ["a", "b", "c"];
        let edges = vec![edge("a", "b"), edge("b", "c"), edge("c", "a")];
        assert_eq!(dependency_order(&ids, &edges), None);
    }
}
