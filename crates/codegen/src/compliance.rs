//! Property compliance checks against the schema registry.
//!
//! Advisory only: the generator is permissive about missing optional fields
//! and never calls into this module. The property panel uses it to flag
//! nodes before the user exports.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::{GenerationWarning, WarningKind};
use crate::model::{GraphSnapshot, ResourceNode};
use crate::properties::{coerce, coerce_text};
use crate::schema::{FieldType, schema};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth a look; does not make the node non-compliant
    Warning,
    /// The node does not satisfy its schema
    Error,
}

/// One finding about one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ComplianceIssue {
    /// A required field is absent
    MissingRequired {
        /// Field name
        field: String,
    },
    /// A select field holds a value outside its options
    InvalidOption {
        /// Field name
        field: String,
        /// Value found
        value: String,
        /// Allowed options
        allowed: Vec<String>,
    },
    /// A value cannot be read as its field type
    TypeMismatch {
        /// Field name
        field: String,
        /// Declared field type
        expected: FieldType,
        /// Coercion failure
        message: String,
    },
    /// A property not declared for the kind
    UnknownProperty {
        /// Field name
        field: String,
    },
    /// The node's kind has no schema
    UnsupportedKind {
        /// Kind tag found
        kind: String,
    },
}

impl ComplianceIssue {
    /// Severity of this issue.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnknownProperty { .. } => Severity::Warning,
            Self::MissingRequired { .. }
            | Self::InvalidOption { .. }
            | Self::TypeMismatch { .. }
            | Self::UnsupportedKind { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired { field } => write!(f, "required field `{field}` is not set"),
            Self::InvalidOption {
                field,
                value,
                allowed,
            } => write!(
                f,
                "`{field}` is \"{value}\", expected one of: {}",
                allowed.join(", ")
            ),
            Self::TypeMismatch { field, message, .. } => write!(f, "`{field}`: {message}"),
            Self::UnknownProperty { field } => write!(f, "unknown property `{field}`"),
            Self::UnsupportedKind { kind } => write!(f, "unsupported resource kind `{kind}`"),
        }
    }
}

/// Check one node's properties against its kind's schema.
#[must_use]
pub fn check_node(node: &ResourceNode) -> Vec<ComplianceIssue> {
    let Some(kind) = node.resource_kind() else {
        return vec![ComplianceIssue::UnsupportedKind {
            kind: node.kind.clone(),
        }];
    };
    let schema = schema(kind);
    let mut issues = Vec::new();

    for field in &schema.fields {
        let value = node.properties.get(field.name).unwrap_or(&Value::Null);
        match coerce(field.field_type, value) {
            Err(message) => issues.push(ComplianceIssue::TypeMismatch {
                field: field.name.to_string(),
                expected: field.field_type,
                message,
            }),
            Ok(None) if field.required => issues.push(ComplianceIssue::MissingRequired {
                field: field.name.to_string(),
            }),
            Ok(None) => {}
            Ok(Some(_)) if field.field_type == FieldType::Select => {
                if let Ok(Some(text)) = coerce_text(value)
                    && !field.options.contains(&text.as_str())
                {
                    issues.push(ComplianceIssue::InvalidOption {
                        field: field.name.to_string(),
                        value: text,
                        allowed: field.options.iter().map(ToString::to_string).collect(),
                    });
                }
            }
            Ok(Some(_)) => {}
        }
    }

    for key in node.properties.keys() {
        if schema.field(key).is_none() {
            issues.push(ComplianceIssue::UnknownProperty { field: key.clone() });
        }
    }

    issues
}

/// Issues found on one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeCompliance {
    /// Node id
    pub node_id: String,
    /// Findings, in schema field order then unknown keys
    pub issues: Vec<ComplianceIssue>,
}

/// Result of checking a whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    /// Nodes with at least one issue
    pub nodes: Vec<NodeCompliance>,
    /// Records that could not be checked at all
    pub skipped: Vec<GenerationWarning>,
}

impl ComplianceReport {
    /// True when no error-severity issue exists and every record was checkable.
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.skipped.is_empty()
            && self
                .nodes
                .iter()
                .flat_map(|n| &n.issues)
                .all(|issue| issue.severity() < Severity::Error)
    }

    /// Number of error-severity issues.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| &n.issues)
            .filter(|issue| issue.severity() == Severity::Error)
            .count()
    }
}

/// Check every node in `snapshot`.
#[tracing::instrument(skip(snapshot), fields(nodes = snapshot.nodes.len()))]
#[must_use]
pub fn check_snapshot(snapshot: &GraphSnapshot) -> ComplianceReport {
    let mut report = ComplianceReport {
        skipped: snapshot.load_warnings.clone(),
        ..ComplianceReport::default()
    };

    for record in &snapshot.nodes {
        match record.to_node() {
            Ok(node) => {
                let issues = check_node(&node);
                if !issues.is_empty() {
                    report.nodes.push(NodeCompliance {
                        node_id: node.id,
                        issues,
                    });
                }
            }
            Err(message) => report.skipped.push(GenerationWarning::new(
                record.id.clone(),
                WarningKind::MalformedNode,
                message,
            )),
        }
    }

    tracing::debug!(
        flagged = report.nodes.len(),
        errors = report.error_count(),
        "Compliance check finished"
    );
    report
}
