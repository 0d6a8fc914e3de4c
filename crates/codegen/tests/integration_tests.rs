use infragraph_codegen::{
    BlockOrdering, Error, GeneratedOutput, Generator, GeneratorConfig, GraphSnapshot,
    ResourceKind, WarningKind, all_schemas, check_snapshot, schema,
};
use std::io::Write;

/// A snapshot the way the editor serializes it: `type` instead of `kind`,
/// `sourceNodeId`/`targetNodeId` on edges, loosely typed property values.
const EDITOR_SNAPSHOT: &str = r#"{
    "nodes": [
        {
            "id": "vpc-1",
            "type": "vpc",
            "label": "Main VPC",
            "properties": { "cidr_block": "10.0.0.0/16", "enable_dns_support": true }
        },
        {
            "id": "subnet-1",
            "type": "subnet",
            "label": "Public A",
            "properties": { "cidr_block": "10.0.1.0/24", "map_public_ip_on_launch": "true" }
        },
        {
            "id": "sg-1",
            "type": "security_group",
            "label": "Web SG",
            "properties": {
                "name": "web",
                "ingress_ports": ["80", "443"],
                "ingress_cidr_blocks": ["0.0.0.0/0"],
                "allow_all_egress": true
            }
        },
        {
            "id": "web-1",
            "type": "ec2",
            "label": "My-Web Server 2024!",
            "properties": {
                "ami": "ami-0c55b159cbfafe1f0",
                "instance_type": "t3.micro",
                "vpc_security_group_ids": []
            }
        },
        {
            "id": "assets",
            "type": "s3",
            "label": "Assets",
            "properties": { "bucket": "acme-assets", "versioning": true, "encryption": true }
        },
        { "id": "cdn-1", "type": "cloudfront", "label": "CDN", "properties": {} }
    ],
    "edges": [
        { "id": "e1", "sourceNodeId": "vpc-1", "targetNodeId": "subnet-1" },
        { "id": "e2", "sourceNodeId": "subnet-1", "targetNodeId": "web-1" },
        { "id": "e3", "sourceNodeId": "sg-1", "targetNodeId": "web-1" },
        { "id": "e4", "sourceNodeId": "cdn-1", "targetNodeId": "assets" },
        { "id": "e5", "sourceNodeId": "deleted-node", "targetNodeId": "assets" }
    ]
}"#;

fn generate(text: &str) -> GeneratedOutput {
    Generator::default().generate_json(text).unwrap()
}

#[test]
fn test_editor_snapshot_end_to_end() {
    let output = generate(EDITOR_SNAPSHOT);

    // 5 supported nodes, the bucket contributes two auxiliary blocks.
    assert_eq!(output.blocks, 7);
    assert!(output.text.contains("resource \"aws_instance\" \"my_web_server_2024_\" {"));
    assert!(output.text.contains("  map_public_ip_on_launch = true\n"));
    assert!(!output.text.contains("vpc_security_group_ids"));
    assert!(
        output
            .text
            .contains("  depends_on = [aws_subnet.public_a, aws_security_group.web_sg]\n")
    );

    // The bucket's only upstreams are unsupported or missing.
    let start = output.text.find("resource \"aws_s3_bucket\" \"assets\"").unwrap();
    let end = output.text.find("resource \"aws_s3_bucket_versioning\"").unwrap();
    assert!(!output.text[start..end].contains("depends_on"));

    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].kind, WarningKind::UnsupportedKind);
    assert_eq!(output.warnings[0].node_id.as_deref(), Some("cdn-1"));
}

#[test]
fn test_output_braces_balance() {
    let output = generate(EDITOR_SNAPSHOT);
    let opens = output.text.matches('{').count();
    let closes = output.text.matches('}').count();
    assert_eq!(opens, closes);
}

#[test]
fn test_generation_is_deterministic() {
    assert_eq!(generate(EDITOR_SNAPSHOT), generate(EDITOR_SNAPSHOT));
}

#[test]
fn test_empty_and_missing_collections() {
    assert!(generate(r#"{"nodes": [], "edges": []}"#).is_empty_graph());
    assert!(generate("{}").is_empty_graph());
}

#[test]
fn test_top_level_shape_errors() {
    let generator = Generator::default();
    assert!(matches!(
        generator.generate_json("[]").unwrap_err(),
        Error::InvalidInput { .. }
    ));
    assert!(matches!(
        generator.generate_json(r#"{"nodes": "vpc"}"#).unwrap_err(),
        Error::InvalidInput { .. }
    ));
    assert!(matches!(
        generator.generate_json(r#"{"nodes": [], "edges": 3}"#).unwrap_err(),
        Error::InvalidInput { .. }
    ));
    assert!(matches!(
        generator.generate_json("{ not json").unwrap_err(),
        Error::Json(_)
    ));
}

#[test]
fn test_malformed_elements_degrade_gracefully() {
    let output = generate(
        r#"{
            "nodes": [
                7,
                { "id": "v", "kind": "vpc" },
                { "id": "ok", "kind": "vpc", "label": "Ok" },
                { "id": "bad-props", "kind": "vpc", "label": "Bad", "properties": [1] }
            ],
            "edges": [ { "id": "e" }, { "id": "e2", "source": "ok", "target": "ok" } ]
        }"#,
    );

    assert_eq!(output.blocks, 1);
    assert!(output.text.contains("depends_on = [aws_vpc.ok]"));
    let kinds: Vec<_> = output.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WarningKind::MalformedNode,
            WarningKind::MalformedEdge,
            WarningKind::MalformedNode,
            WarningKind::MalformedNode,
        ]
    );
}

#[test]
fn test_config_file_drives_generation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "ordering = \"dependency\"\n\n[default_tags]\nManagedBy = \"infragraph\"\n"
    )
    .unwrap();

    let config = GeneratorConfig::load(file.path()).unwrap();
    assert_eq!(config.ordering, BlockOrdering::Dependency);

    let output = Generator::new(config)
        .generate_json(
            r#"{
                "nodes": [
                    { "id": "a", "kind": "subnet", "label": "App" },
                    { "id": "n", "kind": "vpc", "label": "Net" }
                ],
                "edges": [ { "id": "e", "source": "n", "target": "a" } ]
            }"#,
        )
        .unwrap();

    assert!(output.text.starts_with("resource \"aws_vpc\" \"net\""));
    assert_eq!(output.text.matches("ManagedBy = \"infragraph\"").count(), 2);
}

#[test]
fn test_compliance_on_editor_snapshot() {
    let snapshot = GraphSnapshot::from_json(EDITOR_SNAPSHOT).unwrap();
    let report = check_snapshot(&snapshot);

    assert!(!report.is_compliant());
    let flagged: Vec<_> = report.nodes.iter().map(|n| n.node_id.as_str()).collect();
    // Everything but the unsupported cloudfront node sets its required fields.
    assert_eq!(flagged, vec!["cdn-1"]);
}

#[test]
fn test_registry_serializes_for_panel() {
    let json = serde_json::to_value(all_schemas()).unwrap();
    let kinds: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["kind"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<_> = ResourceKind::ALL.iter().map(|k| k.tag().to_string()).collect();
    assert_eq!(kinds, expected);

    let ec2 = serde_json::to_value(schema(ResourceKind::Ec2)).unwrap();
    assert_eq!(ec2["fields"][0]["name"], "ami");
    assert_eq!(ec2["fields"][0]["required"], true);
}

#[test]
fn test_snapshot_json_schema() {
    let schema = schemars::schema_for!(GraphSnapshot);
    let json = serde_json::to_value(&schema).unwrap();
    let properties = json["properties"].as_object().unwrap();
    assert!(properties.contains_key("nodes"));
    assert!(properties.contains_key("edges"));
    assert!(!properties.contains_key("load_warnings"));
}
