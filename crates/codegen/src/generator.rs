//! Graph-to-Terraform generation.
//!
//! A run is linear: validate nodes, optionally reorder them, emit blocks for
//! each supported node, then attach tags and dependency references and join
//! everything into one text. Per-node problems are recorded as warnings and
//! the node is skipped; nothing short of a malformed snapshot aborts a run.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{BlockOrdering, GeneratorConfig};
use crate::dependency::{ReferenceResolver, dependencies_of, dependency_order};
use crate::diagnostics::{GenerationWarning, WarningKind};
use crate::emit::{emit, finish_primary};
use crate::error::Result;
use crate::hcl::Block;
use crate::model::{DependencyEdge, GraphSnapshot, ResourceKind, ResourceNode};
use crate::sanitize::NameCache;
use crate::{
    emit_generation_block, emit_generation_completed, emit_generation_started,
    emit_generation_warning,
};

/// Output for a graph with no nodes.
pub const EMPTY_GRAPH_MARKER: &str = "# No resources to generate";

/// Output for a graph whose nodes all had to be skipped.
pub const NO_VALID_RESOURCES_MARKER: &str = "# No valid resources to generate";

const BLOCK_SEPARATOR: &str = "\n\n";

/// Result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedOutput {
    /// Terraform text, or one of the two marker strings
    pub text: String,
    /// Everything that was skipped or needs attention
    pub warnings: Vec<GenerationWarning>,
    /// Number of declaration blocks in `text`
    pub blocks: usize,
}

impl GeneratedOutput {
    /// Whether the graph had no nodes at all.
    #[must_use]
    pub fn is_empty_graph(&self) -> bool {
        self.text == EMPTY_GRAPH_MARKER
    }

    /// Whether the graph had nodes but none produced a block.
    #[must_use]
    pub fn has_no_valid_resources(&self) -> bool {
        self.text == NO_VALID_RESOURCES_MARKER
    }

    /// Whether `text` is real configuration rather than a marker.
    #[must_use]
    pub fn has_blocks(&self) -> bool {
        self.blocks > 0
    }
}

/// A node that made it through emission.
struct Emitted {
    kind: ResourceKind,
    node: ResourceNode,
    name: String,
}

/// Terraform generator.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator with the given configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parse a JSON snapshot and generate from it.
    ///
    /// # Errors
    ///
    /// Returns an error only when the text is not a graph snapshot; see
    /// [`GraphSnapshot::from_json`].
    pub fn generate_json(&self, text: &str) -> Result<GeneratedOutput> {
        let snapshot = GraphSnapshot::from_json(text)?;
        Ok(self.generate(&snapshot))
    }

    /// Generate Terraform for every supported node in `snapshot`.
    #[tracing::instrument(
        name = "generate",
        fields(
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            ordering = %self.config.ordering,
            operation_id = %uuid::Uuid::new_v4(),
        ),
        skip(self, snapshot)
    )]
    pub fn generate(&self, snapshot: &GraphSnapshot) -> GeneratedOutput {
        emit_generation_started!(snapshot.nodes.len(), snapshot.edges.len());
        let mut warnings = snapshot.load_warnings.clone();

        // Node elements dropped while loading still count as "the graph had nodes".
        let dropped_nodes = warnings
            .iter()
            .any(|w| w.kind == WarningKind::MalformedNode);
        if snapshot.nodes.is_empty() && !dropped_nodes {
            return finish(EMPTY_GRAPH_MARKER.to_string(), warnings, 0);
        }

        let mut candidates = validate(snapshot, &mut warnings);
        if self.config.ordering == BlockOrdering::Dependency {
            candidates = order_by_dependency(candidates, &snapshot.edges, &mut warnings);
        }

        // One cache per run names both declarations and references.
        let mut names = NameCache::new();
        let mut emitted = Vec::with_capacity(candidates.len());
        let mut block_lists: Vec<Vec<Block>> = Vec::with_capacity(candidates.len());
        for (kind, node) in candidates {
            let name = names.name_for(node.naming_source());
            match emit(kind, &node, &name) {
                Ok(blocks) => {
                    emitted.push(Emitted { kind, node, name });
                    block_lists.push(blocks);
                }
                Err(e) => warnings.push(GenerationWarning::for_node(
                    &node.id,
                    WarningKind::EmissionFailed,
                    e.to_string(),
                )),
            }
        }

        if emitted.is_empty() {
            return finish(NO_VALID_RESOURCES_MARKER.to_string(), warnings, 0);
        }

        report_duplicate_names(&emitted, &mut warnings);

        let resolver = ReferenceResolver::new(emitted.iter().map(|e| (e.kind, &e.node)));
        let mut rendered = Vec::new();
        for (entry, blocks) in emitted.iter().zip(block_lists.iter_mut()) {
            let upstream = dependencies_of(&entry.node.id, &snapshot.edges);
            let references = resolver.to_references(&upstream, &mut names);
            if let Some(primary) = blocks.first_mut() {
                finish_primary(primary, self.tags_for(entry), references);
            }
            for block in blocks.iter() {
                emit_generation_block!(
                    block.declaration_type().unwrap_or_default(),
                    block.name().unwrap_or_default()
                );
                rendered.push(block.render());
            }
        }

        let count = rendered.len();
        finish(rendered.join(BLOCK_SEPARATOR), warnings, count)
    }

    /// Name tag first, then configured default tags in key order.
    fn tags_for(&self, entry: &Emitted) -> Vec<(String, String)> {
        let name_value = if entry.node.label.trim().is_empty() {
            entry.name.clone()
        } else {
            entry.node.label.clone()
        };
        std::iter::once((self.config.name_tag_key.clone(), name_value))
            .chain(
                self.config
                    .default_tags
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            )
            .collect()
    }
}

/// Generate with the default configuration.
#[must_use]
pub fn generate(nodes: &[ResourceNode], edges: &[DependencyEdge]) -> GeneratedOutput {
    Generator::default().generate(&GraphSnapshot::new(nodes.iter().cloned(), edges.to_vec()))
}

/// Keep well-formed nodes of supported kinds, in input order.
fn validate(
    snapshot: &GraphSnapshot,
    warnings: &mut Vec<GenerationWarning>,
) -> Vec<(ResourceKind, ResourceNode)> {
    let mut candidates = Vec::with_capacity(snapshot.nodes.len());
    for record in &snapshot.nodes {
        let node = match record.to_node() {
            Ok(node) => node,
            Err(message) => {
                warnings.push(GenerationWarning::new(
                    record.id.clone(),
                    WarningKind::MalformedNode,
                    message,
                ));
                continue;
            }
        };
        match node.resource_kind() {
            Some(kind) => candidates.push((kind, node)),
            None => warnings.push(GenerationWarning::for_node(
                &node.id,
                WarningKind::UnsupportedKind,
                format!("unsupported resource kind `{}`", node.kind),
            )),
        }
    }
    candidates
}

fn order_by_dependency(
    candidates: Vec<(ResourceKind, ResourceNode)>,
    edges: &[DependencyEdge],
    warnings: &mut Vec<GenerationWarning>,
) -> Vec<(ResourceKind, ResourceNode)> {
    let ids: Vec<&str> = candidates.iter().map(|(_, node)| node.id.as_str()).collect();
    let Some(order) = dependency_order(&ids, edges) else {
        warnings.push(GenerationWarning::new(
            None,
            WarningKind::DependencyCycle,
            "dependency graph has a cycle; keeping input order",
        ));
        return candidates;
    };

    let mut slots: Vec<Option<_>> = candidates.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|position| slots.get_mut(position).and_then(Option::take))
        .collect()
}

fn report_duplicate_names(emitted: &[Emitted], warnings: &mut Vec<GenerationWarning>) {
    let mut first_seen: HashMap<(&str, &str), &str> = HashMap::new();
    for entry in emitted {
        let declaration_type = entry.kind.declaration_type();
        let key = (declaration_type, entry.name.as_str());
        if let Some(first) = first_seen.get(&key) {
            warnings.push(GenerationWarning::for_node(
                &entry.node.id,
                WarningKind::DuplicateName,
                format!(
                    "`{declaration_type}.{}` is already declared by node `{first}`",
                    entry.name
                ),
            ));
        } else {
            first_seen.insert(key, &entry.node.id);
        }
    }
}

fn finish(text: String, warnings: Vec<GenerationWarning>, blocks: usize) -> GeneratedOutput {
    for warning in &warnings {
        emit_generation_warning!(warning);
    }
    emit_generation_completed!(blocks, warnings.len());
    GeneratedOutput {
        text,
        warnings,
        blocks,
    }
}
