//! Per-kind block emitters.
//!
//! Each emitter turns one node into its primary declaration block followed by
//! any auxiliary blocks. Emitters only produce the resource-specific body;
//! tags and `depends_on` are appended to the primary block by
//! [`finish_primary`] once the generator knows which dependencies resolved.

mod compute;
mod database;
mod network;
mod security;
mod storage;

use crate::error::EmitError;
use crate::hcl::{Block, Expr};
use crate::model::{ResourceKind, ResourceNode};
use crate::properties::Properties;
use crate::schema::schema;

pub use storage::{ENCRYPTION_SUFFIX, VERSIONING_SUFFIX};

/// Emit the blocks for `node`, named `name`.
///
/// The first block is always the primary declaration.
///
/// # Errors
///
/// Returns [`EmitError`] when a property value cannot be interpreted.
pub fn emit(kind: ResourceKind, node: &ResourceNode, name: &str) -> Result<Vec<Block>, EmitError> {
    let props = Properties::new(schema(kind), &node.properties);
    match kind {
        ResourceKind::Ec2 => compute::ec2(&props, name),
        ResourceKind::Lambda => compute::lambda(&props, name),
        ResourceKind::S3 => storage::s3(&props, name),
        ResourceKind::Rds => database::rds(&props, name),
        ResourceKind::Dynamodb => database::dynamodb(&props, name),
        ResourceKind::Vpc => network::vpc(&props, name),
        ResourceKind::Subnet => network::subnet(&props, name),
        ResourceKind::SecurityGroup => security::security_group(&props, name),
    }
}

/// Append the tag map and, when there are references, `depends_on`.
pub fn finish_primary(block: &mut Block, tags: Vec<(String, String)>, references: Vec<String>) {
    block.blank().map("tags", tags);
    if !references.is_empty() {
        block.blank().attr("depends_on", Expr::ReferenceList(references));
    }
}

/// Copy each listed property, under its own name, when present.
fn copy_fields(
    block: &mut Block,
    props: &Properties<'_>,
    fields: &[&str],
) -> Result<(), EmitError> {
    for field in fields {
        block.attr_opt(field, props.expr(field)?);
    }
    Ok(())
}
