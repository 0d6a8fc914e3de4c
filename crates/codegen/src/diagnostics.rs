//! Warnings collected while generating.
//!
//! A run that skips nodes still succeeds; the skipped work is described here
//! so the caller can show it next to the generated text.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Category of a generation warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Node element missing its id, kind or label, or otherwise undecodable
    MalformedNode,
    /// Edge element that could not be decoded
    MalformedEdge,
    /// Node kind the generator has no emitter for
    UnsupportedKind,
    /// Emitter rejected one of the node's property values
    EmissionFailed,
    /// Two emitted resources share a declaration type and name
    DuplicateName,
    /// Dependency ordering was requested but the graph has a cycle
    DependencyCycle,
}

impl WarningKind {
    /// Tracing `event_type` for warnings of this kind.
    #[must_use]
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::MalformedNode | Self::UnsupportedKind | Self::EmissionFailed => {
                "generation.node_skipped"
            }
            Self::MalformedEdge => "generation.edge_skipped",
            Self::DuplicateName => "generation.duplicate_name",
            Self::DependencyCycle => "generation.dependency_cycle",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MalformedNode => "malformed_node",
            Self::MalformedEdge => "malformed_edge",
            Self::UnsupportedKind => "unsupported_kind",
            Self::EmissionFailed => "emission_failed",
            Self::DuplicateName => "duplicate_name",
            Self::DependencyCycle => "dependency_cycle",
        };
        f.write_str(s)
    }
}

/// One degraded-but-recovered condition from a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationWarning {
    /// Node the warning is about, when there is one
    pub node_id: Option<String>,
    /// Warning category
    pub kind: WarningKind,
    /// Human-readable detail
    pub message: String,
}

impl GenerationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(node_id: Option<String>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            node_id,
            kind,
            message: message.into(),
        }
    }

    /// Create a warning about a specific node.
    #[must_use]
    pub fn for_node(node_id: &str, kind: WarningKind, message: impl Into<String>) -> Self {
        Self::new(Some(node_id.to_string()), kind, message)
    }
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "[{}] {}: {}", self.kind, id, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning =
            GenerationWarning::for_node("n1", WarningKind::UnsupportedKind, "kind `k8s`");
        assert_eq!(warning.to_string(), "[unsupported_kind] n1: kind `k8s`");

        let warning = GenerationWarning::new(None, WarningKind::MalformedEdge, "edges[0]");
        assert_eq!(warning.to_string(), "[malformed_edge] edges[0]");
    }

    #[test]
    fn test_event_type_only_says_skipped_for_skipped_nodes() {
        assert_eq!(WarningKind::EmissionFailed.event_type(), "generation.node_skipped");
        assert_eq!(WarningKind::MalformedEdge.event_type(), "generation.edge_skipped");
        assert_eq!(WarningKind::DuplicateName.event_type(), "generation.duplicate_name");
        assert_eq!(WarningKind::DependencyCycle.event_type(), "generation.dependency_cycle");
    }

    #[test]
    fn test_warning_kind_serde() {
        let json = serde_json::to_string(&WarningKind::DependencyCycle).unwrap();
        assert_eq!(json, r#""dependency_cycle""#);
    }
}
