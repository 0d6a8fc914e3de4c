//! S3 buckets.
//!
//! Versioning and encryption are separate provider objects in the AWS
//! provider, so an enabled capability becomes its own auxiliary block that
//! points back at the bucket.

use super::copy_fields;
use crate::error::EmitError;
use crate::hcl::{Block, Expr};
use crate::model::ResourceKind;
use crate::properties::Properties;

/// Name suffix of the versioning auxiliary block.
pub const VERSIONING_SUFFIX: &str = "_versioning";
/// Name suffix of the encryption auxiliary block.
pub const ENCRYPTION_SUFFIX: &str = "_encryption";

const DEFAULT_SSE_ALGORITHM: &str = "AES256";

pub(super) fn s3(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let declaration_type = ResourceKind::S3.declaration_type();
    let bucket_id = Expr::Reference(format!("{declaration_type}.{name}.id"));

    let mut bucket = Block::resource(declaration_type, name);
    copy_fields(&mut bucket, props, &["bucket", "force_destroy"])?;
    let mut blocks = vec![bucket];

    if props.flag("versioning")? == Some(true) {
        let mut status = Block::nested("versioning_configuration");
        status.attr("status", Expr::string("Enabled"));

        let mut versioning = Block::resource(
            "aws_s3_bucket_versioning",
            &format!("{name}{VERSIONING_SUFFIX}"),
        );
        versioning.attr("bucket", bucket_id.clone()).block(status);
        blocks.push(versioning);
    }

    if props.flag("encryption")? == Some(true) {
        let algorithm = props
            .text("sse_algorithm")?
            .unwrap_or_else(|| DEFAULT_SSE_ALGORITHM.to_string());

        let mut default = Block::nested("apply_server_side_encryption_by_default");
        default.attr("sse_algorithm", Expr::Str(algorithm));
        let mut rule = Block::nested("rule");
        rule.block(default);

        let mut encryption = Block::resource(
            "aws_s3_bucket_server_side_encryption_configuration",
            &format!("{name}{ENCRYPTION_SUFFIX}"),
        );
        encryption.attr("bucket", bucket_id).block(rule);
        blocks.push(encryption);
    }

    Ok(blocks)
}
