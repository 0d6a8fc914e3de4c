//! Resource schema registry.
//!
//! Declares, per kind, the property fields the editor panel renders and the
//! emitters read. The registry is the single source of truth for field
//! types, defaults, select options and required-ness.

use std::sync::LazyLock;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::model::{ResourceCategory, ResourceKind};

/// Input control type of a property field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text
    Text,
    /// Numeric input
    Number,
    /// Checkbox
    Boolean,
    /// One of a fixed set of options
    Select,
    /// List of text values
    Array,
}

/// One editable property of a resource kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyField {
    /// Property key in the node's property map
    pub name: &'static str,
    /// Label shown in the panel
    pub label: &'static str,
    /// Control type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Value a freshly placed node starts with
    pub default_value: Value,
    /// Allowed values for select fields
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [&'static str],
    /// Whether the property must be set
    pub required: bool,
}

impl PropertyField {
    fn new(
        name: &'static str,
        label: &'static str,
        field_type: FieldType,
        default_value: Value,
    ) -> Self {
        Self {
            name,
            label,
            field_type,
            default_value,
            options: &[],
            required: false,
        }
    }

    fn text(name: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(name, label, FieldType::Text, json!(default))
    }

    fn number(name: &'static str, label: &'static str, default: i64) -> Self {
        Self::new(name, label, FieldType::Number, json!(default))
    }

    fn boolean(name: &'static str, label: &'static str, default: bool) -> Self {
        Self::new(name, label, FieldType::Boolean, json!(default))
    }

    fn select(
        name: &'static str,
        label: &'static str,
        default: &str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldType::Select, json!(default))
        }
    }

    fn array(name: &'static str, label: &'static str, default: &[&str]) -> Self {
        Self::new(name, label, FieldType::Array, json!(default))
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_options(options: &&'static [&'static str]) -> bool {
    options.is_empty()
}

/// Field definitions and defaults for one resource kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSchema {
    /// Kind this schema describes
    pub kind: ResourceKind,
    /// Palette label
    pub label: &'static str,
    /// Palette category
    pub category: ResourceCategory,
    /// Terraform type of the primary declaration
    pub declaration_type: &'static str,
    /// Editable fields in panel order
    pub fields: Vec<PropertyField>,
    /// Property map for a freshly placed node
    pub default_properties: Map<String, Value>,
}

impl ResourceSchema {
    fn new(kind: ResourceKind, label: &'static str, fields: Vec<PropertyField>) -> Self {
        let default_properties = fields
            .iter()
            .map(|field| (field.name.to_string(), field.default_value.clone()))
            .collect();
        Self {
            kind,
            label,
            category: kind.category(),
            declaration_type: kind.declaration_type(),
            fields,
            default_properties,
        }
    }

    /// Look up a field by property name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&PropertyField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields that must be set.
    pub fn required_fields(&self) -> impl Iterator<Item = &PropertyField> {
        self.fields.iter().filter(|field| field.required)
    }
}

const EC2_INSTANCE_TYPES: &[&str] = &[
    "t2.micro", "t2.small", "t2.medium", "t3.micro", "t3.small", "t3.medium", "m5.large",
];
const LAMBDA_RUNTIMES: &[&str] = &[
    "nodejs18.x",
    "nodejs20.x",
    "python3.11",
    "python3.12",
    "java17",
    "provided.al2023",
];
const SSE_ALGORITHMS: &[&str] = &["AES256", "aws:kms"];
const RDS_ENGINES: &[&str] = &["mysql", "postgres", "mariadb"];
const RDS_INSTANCE_CLASSES: &[&str] = &[
    "db.t3.micro",
    "db.t3.small",
    "db.t3.medium",
    "db.m5.large",
];
const DYNAMODB_BILLING_MODES: &[&str] = &["PAY_PER_REQUEST", "PROVISIONED"];
const DYNAMODB_KEY_TYPES: &[&str] = &["S", "N", "B"];
const VPC_TENANCIES: &[&str] = &["default", "dedicated"];

fn build(kind: ResourceKind) -> ResourceSchema {
    match kind {
        ResourceKind::Ec2 => ResourceSchema::new(
            kind,
            "EC2 Instance",
            vec![
                PropertyField::text("ami", "AMI ID", "ami-0c55b159cbfafe1f0").required(),
                PropertyField::select(
                    "instance_type",
                    "Instance Type",
                    "t2.micro",
                    EC2_INSTANCE_TYPES,
                )
                .required(),
                PropertyField::text("key_name", "Key Pair", ""),
                PropertyField::text("availability_zone", "Availability Zone", ""),
                PropertyField::boolean("associate_public_ip_address", "Public IP", false),
                PropertyField::boolean("monitoring", "Detailed Monitoring", false),
                PropertyField::array("vpc_security_group_ids", "Security Group IDs", &[]),
                PropertyField::text("user_data", "User Data", ""),
            ],
        ),
        ResourceKind::Lambda => ResourceSchema::new(
            kind,
            "Lambda Function",
            vec![
                PropertyField::text("function_name", "Function Name", "my-function").required(),
                PropertyField::select("runtime", "Runtime", "python3.12", LAMBDA_RUNTIMES)
                    .required(),
                PropertyField::text("handler", "Handler", "index.handler").required(),
                PropertyField::text(
                    "role",
                    "Execution Role ARN",
                    "arn:aws:iam::123456789012:role/lambda-execution",
                )
                .required(),
                PropertyField::text("filename", "Deployment Package", "lambda.zip"),
                PropertyField::number("memory_size", "Memory (MB)", 128),
                PropertyField::number("timeout", "Timeout (s)", 3),
                PropertyField::array("layers", "Layer ARNs", &[]),
            ],
        ),
        ResourceKind::S3 => ResourceSchema::new(
            kind,
            "S3 Bucket",
            vec![
                PropertyField::text("bucket", "Bucket Name", "my-bucket").required(),
                PropertyField::boolean("force_destroy", "Force Destroy", false),
                PropertyField::boolean("versioning", "Versioning", false),
                PropertyField::boolean("encryption", "Server-Side Encryption", false),
                PropertyField::select(
                    "sse_algorithm",
                    "Encryption Algorithm",
                    "AES256",
                    SSE_ALGORITHMS,
                ),
            ],
        ),
        ResourceKind::Rds => ResourceSchema::new(
            kind,
            "RDS Database",
            vec![
                PropertyField::text("identifier", "Identifier", "my-database").required(),
                PropertyField::select("engine", "Engine", "postgres", RDS_ENGINES).required(),
                PropertyField::text("engine_version", "Engine Version", ""),
                PropertyField::select(
                    "instance_class",
                    "Instance Class",
                    "db.t3.micro",
                    RDS_INSTANCE_CLASSES,
                )
                .required(),
                PropertyField::number("allocated_storage", "Storage (GB)", 20).required(),
                PropertyField::text("db_name", "Database Name", ""),
                PropertyField::text("username", "Master Username", "admin").required(),
                PropertyField::boolean("multi_az", "Multi-AZ", false),
                PropertyField::boolean("publicly_accessible", "Publicly Accessible", false),
                PropertyField::boolean("skip_final_snapshot", "Skip Final Snapshot", true),
            ],
        ),
        ResourceKind::Dynamodb => ResourceSchema::new(
            kind,
            "DynamoDB Table",
            vec![
                PropertyField::text("name", "Table Name", "my-table").required(),
                PropertyField::select(
                    "billing_mode",
                    "Billing Mode",
                    "PAY_PER_REQUEST",
                    DYNAMODB_BILLING_MODES,
                )
                .required(),
                PropertyField::text("hash_key", "Partition Key", "id").required(),
                PropertyField::select(
                    "hash_key_type",
                    "Partition Key Type",
                    "S",
                    DYNAMODB_KEY_TYPES,
                ),
                PropertyField::number("read_capacity", "Read Capacity", 5),
                PropertyField::number("write_capacity", "Write Capacity", 5),
            ],
        ),
        ResourceKind::Vpc => ResourceSchema::new(
            kind,
            "VPC",
            vec![
                PropertyField::text("cidr_block", "CIDR Block", "10.0.0.0/16").required(),
                PropertyField::boolean("enable_dns_support", "DNS Support", true),
                PropertyField::boolean("enable_dns_hostnames", "DNS Hostnames", false),
                PropertyField::select("instance_tenancy", "Tenancy", "default", VPC_TENANCIES),
            ],
        ),
        ResourceKind::Subnet => ResourceSchema::new(
            kind,
            "Subnet",
            vec![
                PropertyField::text("cidr_block", "CIDR Block", "10.0.1.0/24").required(),
                PropertyField::text("vpc_id", "VPC ID", ""),
                PropertyField::text("availability_zone", "Availability Zone", ""),
                PropertyField::boolean("map_public_ip_on_launch", "Auto-assign Public IP", false),
            ],
        ),
        ResourceKind::SecurityGroup => ResourceSchema::new(
            kind,
            "Security Group",
            vec![
                PropertyField::text("name", "Group Name", "my-security-group").required(),
                PropertyField::text("description", "Description", "Managed by infragraph"),
                PropertyField::array("ingress_ports", "Ingress Ports", &["80", "443"]),
                PropertyField::array("ingress_cidr_blocks", "Ingress CIDR Blocks", &["0.0.0.0/0"]),
                PropertyField::boolean("allow_all_egress", "Allow All Egress", true),
            ],
        ),
    }
}

static REGISTRY: LazyLock<Vec<ResourceSchema>> =
    LazyLock::new(|| ResourceKind::ALL.into_iter().map(build).collect());

/// Schema for `kind`.
#[must_use]
pub fn schema(kind: ResourceKind) -> &'static ResourceSchema {
    // REGISTRY is built in ResourceKind::ALL order.
    &REGISTRY[kind.index()]
}

/// Every schema, in palette order.
#[must_use]
pub fn all_schemas() -> &'static [ResourceSchema] {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_total() {
        assert_eq!(all_schemas().len(), ResourceKind::ALL.len());
        for kind in ResourceKind::ALL {
            assert_eq!(schema(kind).kind, kind);
            assert_eq!(schema(kind).declaration_type, kind.declaration_type());
        }
    }

    #[test]
    fn test_defaults_cover_every_field() {
        for schema in all_schemas() {
            assert_eq!(schema.default_properties.len(), schema.fields.len());
            for field in &schema.fields {
                assert!(
                    schema.default_properties.contains_key(field.name),
                    "{}: missing default for {}",
                    schema.kind,
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_field_names_are_unique() {
        for schema in all_schemas() {
            let mut names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), schema.fields.len(), "{}", schema.kind);
        }
    }

    #[test]
    fn test_select_defaults_are_allowed_options() {
        for schema in all_schemas() {
            for field in schema.fields.iter().filter(|f| f.field_type == FieldType::Select) {
                assert!(!field.options.is_empty(), "{}.{}", schema.kind, field.name);
                let default = field.default_value.as_str().unwrap();
                assert!(field.options.contains(&default), "{}.{}", schema.kind, field.name);
            }
        }
    }

    #[test]
    fn test_required_defaults_are_not_empty() {
        for schema in all_schemas() {
            for field in schema.required_fields() {
                match &field.default_value {
                    Value::String(s) => assert!(!s.is_empty(), "{}.{}", schema.kind, field.name),
                    Value::Array(items) => assert!(!items.is_empty()),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_field_serializes_for_panel() {
        let field = schema(ResourceKind::S3).field("sse_algorithm").unwrap();
        let json = serde_json::to_value(field).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["defaultValue"], "AES256");
        assert_eq!(json["options"], json!(["AES256", "aws:kms"]));
        assert_eq!(json["required"], false);

        let text = serde_json::to_value(schema(ResourceKind::S3).field("bucket").unwrap()).unwrap();
        assert!(text.get("options").is_none());
    }

    #[test]
    fn test_schema_serializes_kind_and_defaults() {
        let json = serde_json::to_value(schema(ResourceKind::Vpc)).unwrap();
        assert_eq!(json["kind"], "vpc");
        assert_eq!(json["declarationType"], "aws_vpc");
        assert_eq!(json["defaultProperties"]["cidr_block"], "10.0.0.0/16");
    }
}
