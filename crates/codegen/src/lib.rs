//! # infragraph-codegen
//!
//! Compiles a visual graph of cloud resources into Terraform (HCL).
//!
//! The editor hands over a snapshot of nodes (one per placed resource) and
//! edges (dependencies between them). Each node of a supported kind becomes
//! one or more `resource` blocks; each edge becomes a `depends_on` reference
//! from the dependent block to its upstream block.
//!
//! Generation never fails on a bad node. Malformed records, unsupported kinds
//! and unreadable property values are skipped and reported in
//! [`GeneratedOutput::warnings`]; only a snapshot that is not shaped like a
//! graph is an error.
//!
//! ## Example
//!
//! ```rust
//! use infragraph_codegen::{DependencyEdge, ResourceNode, generate};
//!
//! let nodes = vec![
//!     ResourceNode::new("n1", "vpc", "Main VPC").with_property("cidr_block", "10.0.0.0/16"),
//!     ResourceNode::new("n2", "subnet", "Public A").with_property("cidr_block", "10.0.1.0/24"),
//! ];
//! let edges = vec![DependencyEdge::new("e1", "n1", "n2")];
//!
//! let output = generate(&nodes, &edges);
//! assert!(output.text.contains("resource \"aws_subnet\" \"public_a\""));
//! assert!(output.text.contains("depends_on = [aws_vpc.main_vpc]"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compliance;
pub mod config;
pub mod dependency;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod escape;
pub mod events;
pub mod generator;
pub mod hcl;
pub mod model;
pub mod properties;
pub mod sanitize;
pub mod schema;

pub use compliance::{ComplianceIssue, ComplianceReport, Severity, check_node, check_snapshot};
pub use config::{BlockOrdering, GeneratorConfig};
pub use diagnostics::{GenerationWarning, WarningKind};
pub use error::{EmitError, Error, Result};
pub use escape::escape;
pub use generator::{
    EMPTY_GRAPH_MARKER, GeneratedOutput, Generator, NO_VALID_RESOURCES_MARKER, generate,
};
pub use model::{DependencyEdge, GraphSnapshot, NodeRecord, ResourceKind, ResourceNode};
pub use sanitize::{NameCache, sanitize};
pub use schema::{FieldType, PropertyField, ResourceSchema, all_schemas, schema};
