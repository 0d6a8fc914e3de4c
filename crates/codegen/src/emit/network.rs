use super::copy_fields;
use crate::error::EmitError;
use crate::hcl::Block;
use crate::model::ResourceKind;
use crate::properties::Properties;

const VPC_FIELDS: &[&str] = &[
    "cidr_block",
    "enable_dns_support",
    "enable_dns_hostnames",
    "instance_tenancy",
];

const SUBNET_FIELDS: &[&str] = &[
    "vpc_id",
    "cidr_block",
    "availability_zone",
    "map_public_ip_on_launch",
];

pub(super) fn vpc(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let mut block = Block::resource(ResourceKind::Vpc.declaration_type(), name);
    copy_fields(&mut block, props, VPC_FIELDS)?;
    Ok(vec![block])
}

pub(super) fn subnet(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let mut block = Block::resource(ResourceKind::Subnet.declaration_type(), name);
    copy_fields(&mut block, props, SUBNET_FIELDS)?;
    Ok(vec![block])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::emit;
    use crate::model::ResourceNode;

    #[test]
    fn test_vpc() {
        let node = ResourceNode::new("v1", "vpc", "Main VPC")
            .with_property("cidr_block", "10.0.0.0/16")
            .with_property("enable_dns_support", true)
            .with_property("enable_dns_hostnames", false);

        assert_eq!(
            emit(ResourceKind::Vpc, &node, "main_vpc").unwrap()[0].render(),
            [
                "resource \"aws_vpc\" \"main_vpc\" {",
                "  cidr_block = \"10.0.0.0/16\"",
                "  enable_dns_support = true",
                "  enable_dns_hostnames = false",
                "}",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_subnet_field_order() {
        let node = ResourceNode::new("s1", "subnet", "Public A")
            .with_property("cidr_block", "10.0.1.0/24")
            .with_property("vpc_id", "vpc-123");

        let text = emit(ResourceKind::Subnet, &node, "public_a").unwrap()[0].render();
        let vpc = text.find("vpc_id").unwrap();
        let cidr = text.find("cidr_block").unwrap();
        assert!(vpc < cidr);
    }

    #[test]
    fn test_subnet_rejects_object_cidr() {
        let node = ResourceNode::new("s1", "subnet", "Public A")
            .with_property("cidr_block", serde_json::json!({"ip": "10.0.1.0"}));
        assert!(emit(ResourceKind::Subnet, &node, "public_a").is_err());
    }
}
