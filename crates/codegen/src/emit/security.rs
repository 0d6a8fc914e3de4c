//! Security groups.
//!
//! Each entry of `ingress_ports` becomes an `ingress` block. Entries are a
//! single port (`"443"`) or an inclusive range (`"8000-8080"`).

use super::copy_fields;
use crate::error::EmitError;
use crate::hcl::{Block, Expr};
use crate::model::ResourceKind;
use crate::properties::Properties;

const ANYWHERE: &str = "0.0.0.0/0";

pub(super) fn security_group(props: &Properties<'_>, name: &str) -> Result<Vec<Block>, EmitError> {
    let mut block = Block::resource(ResourceKind::SecurityGroup.declaration_type(), name);
    copy_fields(&mut block, props, &["name", "description"])?;

    let cidr_blocks = props.list("ingress_cidr_blocks")?;
    for entry in props.list("ingress_ports")? {
        let (from, to) = parse_port_range(&entry)
            .map_err(|message| EmitError::invalid("ingress_ports", message))?;
        let mut ingress = Block::nested("ingress");
        ingress
            .attr("from_port", Expr::int(i64::from(from)))
            .attr("to_port", Expr::int(i64::from(to)))
            .attr("protocol", Expr::string("tcp"));
        if !cidr_blocks.is_empty() {
            ingress.attr("cidr_blocks", Expr::StrList(cidr_blocks.clone()));
        }
        block.block(ingress);
    }

    if props.flag("allow_all_egress")? == Some(true) {
        let mut egress = Block::nested("egress");
        egress
            .attr("from_port", Expr::int(0))
            .attr("to_port", Expr::int(0))
            .attr("protocol", Expr::string("-1"))
            .attr("cidr_blocks", Expr::StrList(vec![ANYWHERE.to_string()]));
        block.block(egress);
    }

    Ok(vec![block])
}

/// Parse `"443"` or `"8000-8080"` into an inclusive port range.
fn parse_port_range(entry: &str) -> Result<(u16, u16), String> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u16>()
            .map_err(|_| format!("`{entry}` is not a port or port range"))
    };
    let entry_trimmed = entry.trim();
    match entry_trimmed.split_once('-') {
        Some((from, to)) => {
            let (from, to) = (parse(from)?, parse(to)?);
            if from > to {
                return Err(format!("port range `{entry}` is reversed"));
            }
            Ok((from, to))
        }
        None => {
            let port = parse(entry_trimmed)?;
            Ok((port, port))
        }
    }
}
