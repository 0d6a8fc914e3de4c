//! Minimal HCL block model and renderer.
//!
//! Emitters build a small tree of [`Block`]s per node; rendering turns it into
//! text with two-space indentation. Nothing here outlives a generation run.

use std::fmt::Write as _;

use serde_json::Number;

use crate::escape::quote;

const INDENT: &str = "  ";

/// Right-hand side of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Quoted, escaped string literal
    Str(String),
    /// Numeric literal
    Number(Number),
    /// `true` / `false`
    Bool(bool),
    /// List of quoted, escaped string literals
    StrList(Vec<String>),
    /// Bare expression such as `aws_s3_bucket.assets.id`
    Reference(String),
    /// List of bare expressions
    ReferenceList(Vec<String>),
}

impl Expr {
    /// Quoted string expression.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Integer expression.
    #[must_use]
    pub fn int(n: i64) -> Self {
        Self::Number(Number::from(n))
    }

    fn render(&self) -> String {
        match self {
            Self::Str(s) => quote(s),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::StrList(items) => {
                let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
                format!("[{}]", quoted.join(", "))
            }
            Self::Reference(r) => r.clone(),
            Self::ReferenceList(refs) => format!("[{}]", refs.join(", ")),
        }
    }
}

/// One line (or nested structure) inside a block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `key = value`
    Attribute(String, Expr),
    /// Nested block
    Block(Block),
    /// `key = { k = "v" ... }` with string values
    Map(String, Vec<(String, String)>),
    /// Empty separator line
    Blank,
}

/// A declaration or nested block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    keyword: String,
    labels: Vec<String>,
    items: Vec<Item>,
}

impl Block {
    /// `resource "<decl_type>" "<name>" { ... }`
    #[must_use]
    pub fn resource(declaration_type: &str, name: &str) -> Self {
        Self {
            keyword: "resource".to_string(),
            labels: vec![declaration_type.to_string(), name.to_string()],
            items: Vec::new(),
        }
    }

    /// Unlabelled nested block such as `ingress { ... }`.
    #[must_use]
    pub fn nested(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            labels: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Declaration type label, for resource blocks.
    #[must_use]
    pub fn declaration_type(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Name label, for resource blocks.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.labels.get(1).map(String::as_str)
    }

    /// Body items in order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Append `key = value`.
    pub fn attr(&mut self, key: &str, value: Expr) -> &mut Self {
        self.items.push(Item::Attribute(key.to_string(), value));
        self
    }

    /// Append `key = value` when a value is present.
    pub fn attr_opt(&mut self, key: &str, value: Option<Expr>) -> &mut Self {
        if let Some(value) = value {
            self.attr(key, value);
        }
        self
    }

    /// Append a nested block.
    pub fn block(&mut self, block: Self) -> &mut Self {
        self.items.push(Item::Block(block));
        self
    }

    /// Append a string map attribute.
    pub fn map(&mut self, key: &str, entries: Vec<(String, String)>) -> &mut Self {
        self.items.push(Item::Map(key.to_string(), entries));
        self
    }

    /// Append an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.items.push(Item::Blank);
        self
    }

    /// Render at the top level.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out.truncate(out.trim_end_matches('\n').len());
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);
        let inner = INDENT.repeat(depth + 1);

        out.push_str(&pad);
        out.push_str(&self.keyword);
        for label in &self.labels {
            out.push(' ');
            out.push_str(&quote(label));
        }
        out.push_str(" {\n");

        for item in &self.items {
            match item {
                Item::Attribute(key, value) => {
                    let _ = writeln!(out, "{inner}{key} = {}", value.render());
                }
                Item::Block(block) => block.render_into(out, depth + 1),
                Item::Map(key, entries) => {
                    let _ = writeln!(out, "{inner}{key} = {{");
                    for (k, v) in entries {
                        let _ = writeln!(out, "{inner}{INDENT}{} = {}", map_key(k), quote(v));
                    }
                    let _ = writeln!(out, "{inner}}}");
                }
                Item::Blank => out.push('\n'),
            }
        }

        out.push_str(&pad);
        out.push_str("}\n");
    }
}

/// Bare identifiers stay bare; anything else is quoted.
fn map_key(key: &str) -> String {
    let mut chars = key.chars();
    let bare = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare { key.to_string() } else { quote(key) }
}
