//! Property-based tests for naming, escaping and generation invariants.
//!
//! These tests verify the behavioral contracts of the generator:
//! - Sanitized names are valid, stable identifiers
//! - Escaping leaves plain text alone
//! - Every supported node yields exactly one primary declaration
//! - Every resolvable edge shows up as a `depends_on` reference

use infragraph_codegen::{
    BlockOrdering, DependencyEdge, Generator, GeneratorConfig, GraphSnapshot, ResourceKind,
    ResourceNode, escape, generate, sanitize,
};
use proptest::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Arbitrary printable label, including punctuation and digits.
fn label_strategy() -> impl Strategy<Value = String> {
    "[ -~]{0,24}".prop_map(String::from)
}

/// A kind tag: mostly supported kinds, sometimes one the generator has never heard of.
fn kind_tag_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => proptest::sample::select(ResourceKind::ALL.to_vec()).prop_map(|k| k.tag().to_string()),
        1 => "[a-z]{3,8}_unknown".prop_map(String::from),
    ]
}

/// Edges between `count` nodes named `n0..n{count-1}`, self-loops and repeats included.
fn edges_strategy(count: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0..count, 0..count), 0..=count * 2)
}

/// Acyclic edges: sources always have a lower index than targets.
fn dag_edges_strategy(count: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((0..count, 0..count), 0..=count * 2).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect()
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn count_headers(text: &str) -> usize {
    text.lines().filter(|l| l.starts_with("resource \"")).count()
}

fn vpc_nodes(count: usize) -> Vec<ResourceNode> {
    (0..count)
        .map(|i| ResourceNode::new(format!("n{i}"), "vpc", format!("Node {i}")))
        .collect()
}

fn to_edges(pairs: &[(usize, usize)]) -> Vec<DependencyEdge> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, (s, t))| DependencyEdge::new(format!("e{i}"), format!("n{s}"), format!("n{t}")))
        .collect()
}

/// Body of each `aws_vpc` block keyed by its name, without the trailing separator.
fn vpc_blocks(text: &str) -> HashMap<String, String> {
    text.split("resource \"aws_vpc\" \"")
        .skip(1)
        .filter_map(|segment| {
            let (name, body) = segment.split_once('"')?;
            Some((name.to_string(), body.trim_end().to_string()))
        })
        .collect()
}

// =============================================================================
// Property Tests: Sanitizer and Escaper
// =============================================================================

proptest! {
    /// Contract: sanitize is idempotent.
    #[test]
    fn sanitize_is_idempotent(raw in label_strategy()) {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    /// Contract: sanitized names are non-empty identifiers that never start with a digit.
    #[test]
    fn sanitize_produces_identifiers(raw in "\\PC{0,24}") {
        let name = sanitize(&raw);
        prop_assert!(!name.is_empty());
        prop_assert!(!name.starts_with(|c: char| c.is_ascii_digit()));
        prop_assert!(is_identifier(&name), "`{}` from `{}` is not an identifier", name, raw);
        prop_assert!(!name.contains("__"));
    }

    /// Contract: labels already in identifier form only get lowercased.
    #[test]
    fn sanitize_keeps_identifier_labels(
        label in "[A-Za-z_][A-Za-z0-9_]{0,20}"
            .prop_filter("no underscore runs", |s| !s.contains("__"))
    ) {
        prop_assert_eq!(sanitize(&label), label.to_lowercase());
    }

    /// Contract: escape leaves text without reserved characters untouched,
    /// template-looking sequences included.
    #[test]
    fn escape_is_identity_on_plain_text(text in "[a-zA-Z0-9 .,:;/_=+$%{}-]{0,40}") {
        prop_assert_eq!(escape(&text), text);
    }
}

// =============================================================================
// Property Tests: Generation
// =============================================================================

proptest! {
    /// Contract: exactly one declaration header per node of a supported kind.
    ///
    /// Nodes carry no properties, so no kind emits auxiliary blocks.
    #[test]
    fn one_header_per_supported_node(
        nodes in proptest::collection::vec((kind_tag_strategy(), label_strategy()), 0..20)
    ) {
        let nodes: Vec<ResourceNode> = nodes
            .into_iter()
            .enumerate()
            .map(|(i, (kind, label))| ResourceNode::new(format!("n{i}"), kind, label))
            .collect();
        let supported = nodes.iter().filter(|n| n.resource_kind().is_some()).count();

        let output = generate(&nodes, &[]);
        prop_assert_eq!(count_headers(&output.text), supported);
        prop_assert_eq!(output.blocks, supported);
        prop_assert_eq!(output.is_empty_graph(), nodes.is_empty());
        prop_assert_eq!(output.has_no_valid_resources(), !nodes.is_empty() && supported == 0);
    }

    /// Contract: every edge between emitted nodes appears as a reference in the
    /// target's block, once per edge, self-loops included.
    #[test]
    fn every_edge_becomes_a_reference(
        (count, pairs) in (1..8_usize).prop_flat_map(|n| (Just(n), edges_strategy(n)))
    ) {
        let output = generate(&vpc_nodes(count), &to_edges(&pairs));
        let blocks = vpc_blocks(&output.text);
        prop_assert_eq!(blocks.len(), count);

        for target in 0..count {
            let body = &blocks[&format!("node_{target}")];
            let expected: Vec<String> = pairs
                .iter()
                .filter(|(_, t)| *t == target)
                .map(|(s, _)| format!("aws_vpc.node_{s}"))
                .collect();

            if expected.is_empty() {
                prop_assert!(!body.contains("depends_on"));
            } else {
                let line = format!("depends_on = [{}]", expected.join(", "));
                prop_assert!(body.contains(&line), "missing `{}` in {}", line, body);
            }
        }
    }

    /// Contract: dependency ordering puts upstream blocks first without
    /// changing what any block says.
    #[test]
    fn dependency_ordering_respects_edges(
        (count, pairs) in (1..8_usize).prop_flat_map(|n| (Just(n), dag_edges_strategy(n)))
    ) {
        let snapshot = GraphSnapshot::new(vpc_nodes(count).into_iter().rev(), to_edges(&pairs));
        let config = GeneratorConfig::default().with_ordering(BlockOrdering::Dependency);
        let ordered = Generator::new(config).generate(&snapshot);
        let unordered = Generator::default().generate(&snapshot);

        prop_assert!(ordered.warnings.is_empty());
        prop_assert_eq!(vpc_blocks(&ordered.text), vpc_blocks(&unordered.text));

        for (s, t) in &pairs {
            let upstream = ordered.text.find(&format!("\"node_{s}\" {{")).unwrap();
            let downstream = ordered.text.find(&format!("\"node_{t}\" {{")).unwrap();
            prop_assert!(upstream < downstream, "node_{} should precede node_{}", s, t);
        }
    }
}
