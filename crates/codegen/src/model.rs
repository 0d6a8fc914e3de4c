//! Graph snapshot types.
//!
//! The editor hands the generator a plain snapshot of what is on the canvas:
//! a list of nodes and a list of directed edges. Nodes arrive loosely typed
//! ([`NodeRecord`]) and are validated into [`ResourceNode`]s one at a time so
//! a single broken node never poisons the rest of the graph.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::diagnostics::{GenerationWarning, WarningKind};
use crate::error::{Error, Result};

/// The closed set of resource kinds the generator knows how to emit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// EC2 compute instance
    Ec2,
    /// Lambda function
    Lambda,
    /// S3 bucket
    S3,
    /// RDS relational database instance
    Rds,
    /// DynamoDB table
    Dynamodb,
    /// Virtual private cloud
    Vpc,
    /// VPC subnet
    Subnet,
    /// Security group
    SecurityGroup,
}

impl ResourceKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 8] = [
        Self::Ec2,
        Self::Lambda,
        Self::S3,
        Self::Rds,
        Self::Dynamodb,
        Self::Vpc,
        Self::Subnet,
        Self::SecurityGroup,
    ];

    /// Position of the kind in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Ec2 => 0,
            Self::Lambda => 1,
            Self::S3 => 2,
            Self::Rds => 3,
            Self::Dynamodb => 4,
            Self::Vpc => 5,
            Self::Subnet => 6,
            Self::SecurityGroup => 7,
        }
    }

    /// Wire tag used in the snapshot's `kind` field.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ec2 => "ec2",
            Self::Lambda => "lambda",
            Self::S3 => "s3",
            Self::Rds => "rds",
            Self::Dynamodb => "dynamodb",
            Self::Vpc => "vpc",
            Self::Subnet => "subnet",
            Self::SecurityGroup => "security_group",
        }
    }

    /// Terraform resource type of the primary declaration.
    #[must_use]
    pub const fn declaration_type(self) -> &'static str {
        match self {
            Self::Ec2 => "aws_instance",
            Self::Lambda => "aws_lambda_function",
            Self::S3 => "aws_s3_bucket",
            Self::Rds => "aws_db_instance",
            Self::Dynamodb => "aws_dynamodb_table",
            Self::Vpc => "aws_vpc",
            Self::Subnet => "aws_subnet",
            Self::SecurityGroup => "aws_security_group",
        }
    }

    /// Palette category the kind belongs to.
    #[must_use]
    pub const fn category(self) -> ResourceCategory {
        match self {
            Self::Ec2 | Self::Lambda => ResourceCategory::Compute,
            Self::S3 => ResourceCategory::Storage,
            Self::Rds | Self::Dynamodb => ResourceCategory::Database,
            Self::Vpc | Self::Subnet => ResourceCategory::Network,
            Self::SecurityGroup => ResourceCategory::Security,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| format!("Unknown resource kind: {s}"))
    }
}

/// Broad grouping used by the editor palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    /// Instances and functions
    Compute,
    /// Object storage
    Storage,
    /// Relational and key-value databases
    Database,
    /// VPCs and subnets
    Network,
    /// Firewalls and access control
    Security,
}

/// A node exactly as the editor sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeRecord {
    /// Unique node identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Resource kind tag (e.g. `"s3"`)
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    /// Display label typed by the user
    #[serde(default)]
    pub label: Option<String>,
    /// Property values keyed by schema field name
    #[serde(default)]
    pub properties: Option<Value>,
}

impl NodeRecord {
    /// Validate the record into a [`ResourceNode`].
    ///
    /// # Errors
    ///
    /// Returns a description of the first defect found: a blank or missing
    /// id or kind, a missing label, or non-object properties.
    pub fn to_node(&self) -> std::result::Result<ResourceNode, String> {
        let id = match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => return Err("node has no id".to_string()),
        };
        let kind = match self.kind.as_deref() {
            Some(kind) if !kind.trim().is_empty() => kind.to_string(),
            _ => return Err(format!("node `{id}` has no kind")),
        };
        let Some(label) = self.label.clone() else {
            return Err(format!("node `{id}` has no label"));
        };
        let properties = match &self.properties {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(format!("node `{id}` has non-object properties")),
        };

        Ok(ResourceNode {
            id,
            kind,
            label,
            properties,
        })
    }
}

impl From<ResourceNode> for NodeRecord {
    fn from(node: ResourceNode) -> Self {
        Self {
            id: Some(node.id),
            kind: Some(node.kind),
            label: Some(node.label),
            properties: Some(Value::Object(node.properties)),
        }
    }
}

/// A validated node on the design surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    /// Unique node identifier
    pub id: String,
    /// Raw kind tag; may name a kind this generator does not support
    pub kind: String,
    /// Display label, possibly blank
    pub label: String,
    /// Property values keyed by schema field name
    pub properties: Map<String, Value>,
}

impl ResourceNode {
    /// Create a node with no properties.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            properties: Map::new(),
        }
    }

    /// Set a property, returning the node.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// The supported kind, if the tag names one.
    #[must_use]
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        self.kind.parse().ok()
    }

    /// Raw text naming this node: the label, or the id when the label is blank.
    #[must_use]
    pub fn naming_source(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// A directed edge: `target` depends on `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DependencyEdge {
    /// Unique edge identifier
    #[serde(default)]
    pub id: String,
    /// Upstream node id
    #[serde(alias = "sourceNodeId")]
    pub source: String,
    /// Downstream node id
    #[serde(alias = "targetNodeId")]
    pub target: String,
}

impl DependencyEdge {
    /// Create an edge.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Everything on the canvas at the moment generation was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphSnapshot {
    /// Nodes in canvas order
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    /// Edges in creation order
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
    /// Elements dropped while loading the snapshot
    #[serde(skip)]
    pub load_warnings: Vec<GenerationWarning>,
}

impl GraphSnapshot {
    /// Build a snapshot from already-validated nodes.
    #[must_use]
    pub fn new(nodes: impl IntoIterator<Item = ResourceNode>, edges: Vec<DependencyEdge>) -> Self {
        Self {
            nodes: nodes.into_iter().map(NodeRecord::from).collect(),
            edges,
            load_warnings: Vec::new(),
        }
    }

    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for unparseable text and
    /// [`Error::InvalidInput`] when the document is not a snapshot.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Build a snapshot from a JSON value.
    ///
    /// Only the outer shape is fatal. Individual node or edge elements that
    /// cannot be decoded are dropped and recorded in `load_warnings`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the value is not an object or if
    /// `nodes`/`edges` are present but not arrays.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(Error::invalid_input("snapshot is not a JSON object"));
        };

        let nodes = take_array(&mut root, "nodes")?;
        let edges = take_array(&mut root, "edges")?;
        let mut snapshot = Self::default();

        for (index, element) in nodes.into_iter().enumerate() {
            match serde_json::from_value::<NodeRecord>(element) {
                Ok(record) => snapshot.nodes.push(record),
                Err(e) => snapshot.load_warnings.push(GenerationWarning::new(
                    None,
                    WarningKind::MalformedNode,
                    format!("nodes[{index}] could not be decoded: {e}"),
                )),
            }
        }

        for (index, element) in edges.into_iter().enumerate() {
            match serde_json::from_value::<DependencyEdge>(element) {
                Ok(edge) => snapshot.edges.push(edge),
                Err(e) => snapshot.load_warnings.push(GenerationWarning::new(
                    None,
                    WarningKind::MalformedEdge,
                    format!("edges[{index}] could not be decoded: {e}"),
                )),
            }
        }

        Ok(snapshot)
    }
}

fn take_array(root: &mut Map<String, Value>, key: &str) -> Result<Vec<Value>> {
    match root.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::invalid_input(format!(
            "`{key}` must be an array, got {}",
            json_type_name(&other)
        ))),
    }
}

pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
