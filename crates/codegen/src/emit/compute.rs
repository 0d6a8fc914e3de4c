//! EC2 instances and Lambda functions.

use super::copy_fields;
use crate::error::EmitError;
use crate::hcl::Block;
use crate::model::ResourceKind;
use crate::properties::Properties;

const EC2_FIELDS: &[&str] = &[
    "ami",
    "instance_type",
    "key_name",
    "availability_zone",
    "associate_public_ip_address",
    "monitoring",
    "vpc_security_group_ids",
    "user_data",
];

const LAMBDA_FIELDS: &[&str] = &[
    "function_name",
    "runtime",
    "handler",
    "role",
    "filename",
    "memory_size",
    "timeout",
    "layers",
];

pub(super) fn ec2(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let mut block = Block::resource(ResourceKind::Ec2.declaration_type(), name);
    copy_fields(&mut block, props, EC2_FIELDS)?;
    Ok(vec![block])
}

pub(super) fn lambda(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let mut block = Block::resource(ResourceKind::Lambda.declaration_type(), name);
    copy_fields(&mut block, props, LAMBDA_FIELDS)?;
    Ok(vec![block])
}
