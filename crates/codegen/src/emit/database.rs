//! RDS instances and DynamoDB tables.

use super::copy_fields;
use crate::error::EmitError;
use crate::hcl::{Block, Expr};
use crate::model::ResourceKind;
use crate::properties::Properties;

const RDS_FIELDS: &[&str] = &[
    "identifier",
    "engine",
    "engine_version",
    "instance_class",
    "allocated_storage",
    "db_name",
    "username",
    "multi_az",
    "publicly_accessible",
    "skip_final_snapshot",
];

const PROVISIONED: &str = "PROVISIONED";
const DEFAULT_KEY_TYPE: &str = "S";

pub(super) fn rds(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let mut block = Block::resource(ResourceKind::Rds.declaration_type(), name);
    copy_fields(&mut block, props, RDS_FIELDS)?;
    Ok(vec![block])
}

pub(super) fn dynamodb(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let mut block = Block::resource(ResourceKind::Dynamodb.declaration_type(), name);
    copy_fields(&mut block, props, &["name", "billing_mode", "hash_key"])?;

    // Capacity is only meaningful (and only accepted by AWS) for provisioned tables.
    if props.text("billing_mode")?.as_deref() == Some(PROVISIONED) {
        copy_fields(&mut block, props, &["read_capacity", "write_capacity"])?;
    }

    if let Some(hash_key) = props.text("hash_key")? {
        let key_type = props
            .text("hash_key_type")?
            .unwrap_or_else(|| DEFAULT_KEY_TYPE.to_string());
        let mut attribute = Block::nested("attribute");
        attribute
            .attr("name", Expr::Str(hash_key))
            .attr("type", Expr::Str(key_type));
        block.block(attribute);
    }

    Ok(vec![block])
}
