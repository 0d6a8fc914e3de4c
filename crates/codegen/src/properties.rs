//! Typed access to a node's property map.
//!
//! The property panel produces loosely typed JSON (numbers typed into a text
//! box arrive as strings, checkboxes sometimes as `"true"`). Values are
//! coerced according to the field type declared in the schema registry, so
//! the emitters and the compliance checker agree on what a value means.

use serde_json::{Map, Number, Value};

use crate::error::EmitError;
use crate::hcl::Expr;
use crate::model::json_type_name;
use crate::schema::{FieldType, PropertyField, ResourceSchema};

/// Coerce a text or select value. Blank text counts as unset.
///
/// # Errors
///
/// Returns a message when the value is an array or object.
pub fn coerce_text(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected text, got {}", json_type_name(other))),
    }
}

/// Coerce a number value; numeric strings are accepted.
///
/// # Errors
///
/// Returns a message when the value is not a number or numeric string.
pub fn coerce_number(value: &Value) -> Result<Option<Number>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n.clone())),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Some(Number::from(int)));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Some)
                .ok_or_else(|| format!("expected a number, got \"{s}\""))
        }
        other => Err(format!("expected a number, got {}", json_type_name(other))),
    }
}

/// Coerce a boolean value; `"true"` and `"false"` are accepted.
///
/// # Errors
///
/// Returns a message for any other value.
pub fn coerce_bool(value: &Value) -> Result<Option<bool>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::String(s) => match s.trim() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(format!("expected a boolean, got \"{s}\"")),
        },
        other => Err(format!("expected a boolean, got {}", json_type_name(other))),
    }
}

/// Coerce a list of scalars into their text forms.
///
/// # Errors
///
/// Returns a message when the value is not an array or holds nested values.
pub fn coerce_list(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                other => Err(format!(
                    "expected list items to be text, got {}",
                    json_type_name(other)
                )),
            })
            .collect(),
        other => Err(format!("expected a list, got {}", json_type_name(other))),
    }
}

/// Coerce `value` as `field_type` into an HCL expression.
///
/// `Ok(None)` means the property counts as absent: null, blank text or an
/// empty list. Zero and `false` are present.
///
/// # Errors
///
/// Returns a message when the value does not fit the field type.
pub fn coerce(field_type: FieldType, value: &Value) -> Result<Option<Expr>, String> {
    match field_type {
        FieldType::Text | FieldType::Select => Ok(coerce_text(value)?.map(Expr::Str)),
        FieldType::Number => Ok(coerce_number(value)?.map(Expr::Number)),
        FieldType::Boolean => Ok(coerce_bool(value)?.map(Expr::Bool)),
        FieldType::Array => {
            let items = coerce_list(value)?;
            Ok((!items.is_empty()).then_some(Expr::StrList(items)))
        }
    }
}

/// A node's properties viewed through its kind's schema.
#[derive(Debug, Clone, Copy)]
pub struct Properties<'a> {
    schema: &'static ResourceSchema,
    values: &'a Map<String, Value>,
}

impl<'a> Properties<'a> {
    /// View `values` through `schema`.
    #[must_use]
    pub const fn new(schema: &'static ResourceSchema, values: &'a Map<String, Value>) -> Self {
        Self { schema, values }
    }

    fn field(&self, name: &str) -> Result<&'static PropertyField, EmitError> {
        self.schema.field(name).ok_or_else(|| {
            EmitError::invalid(
                name,
                format!("not declared in the {} schema", self.schema.kind),
            )
        })
    }

    fn raw(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&Value::Null)
    }

    /// The property as an HCL expression, typed by its schema field.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::InvalidProperty`] if the value does not fit the
    /// declared type, or if `name` is not a field of this kind.
    pub fn expr(&self, name: &str) -> Result<Option<Expr>, EmitError> {
        let field = self.field(name)?;
        coerce(field.field_type, self.raw(name))
            .map_err(|message| EmitError::invalid(name, message))
    }

    /// The property as text.
    ///
    /// # Errors
    ///
    /// See [`Properties::expr`].
    pub fn text(&self, name: &str) -> Result<Option<String>, EmitError> {
        self.field(name)?;
        coerce_text(self.raw(name)).map_err(|message| EmitError::invalid(name, message))
    }

    /// The property as a boolean flag.
    ///
    /// # Errors
    ///
    /// See [`Properties::expr`].
    pub fn flag(&self, name: &str) -> Result<Option<bool>, EmitError> {
        self.field(name)?;
        coerce_bool(self.raw(name)).map_err(|message| EmitError::invalid(name, message))
    }

    /// The property as a list of text values; absent means empty.
    ///
    /// # Errors
    ///
    /// See [`Properties::expr`].
    pub fn list(&self, name: &str) -> Result<Vec<String>, EmitError> {
        self.field(name)?;
        coerce_list(self.raw(name)).map_err(|message| EmitError::invalid(name, message))
    }
}
