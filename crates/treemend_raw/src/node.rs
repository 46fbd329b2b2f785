//! Raw node model.
//!
//! A closed set of tagged variants replaces the shape-sniffing an
//! untyped wire format would otherwise force on the converter: every
//! field is a [`Scalar`], a nested node, or a list of nodes, and
//! anything else fails fast at decode time.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use treemend_ast::Location;

use crate::RawError;

/// A node of the raw tree, as received from the parser bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    /// Node-kind label (`type` on the wire).
    pub kind: String,

    /// Reported source location. Nodes without one are attribute-like
    /// and never become children of the canonical tree.
    pub loc: Option<Location>,

    /// Remaining members, in wire order.
    pub fields: IndexMap<String, RawValue>,
}

/// A raw node field value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A scalar property.
    Scalar(Scalar),
    /// A nested raw node (a child if it carries a location, an inline
    /// attribute otherwise).
    Node(Box<RawNode>),
    /// A list of child raw nodes.
    Nodes(Vec<RawNode>),
}

/// Scalar field values of the wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Null,
}

impl Scalar {
    /// Runtime type name, recorded in `attrs["type"]` when a non-string
    /// `value` field is stringified.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "str",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Null => "null",
        }
    }

    /// Returns the string if this scalar is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Null => f.write_str("null"),
        }
    }
}

impl RawNode {
    /// Decodes a raw tree from its JSON wire form.
    pub fn from_json_str(input: &str) -> Result<Self, RawError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(&value)
    }

    /// Decodes a raw node from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, RawError> {
        Self::from_value_at(value, "<root>")
    }

    fn from_value_at(value: &Value, key: &str) -> Result<Self, RawError> {
        let Some(object) = value.as_object() else {
            return Err(RawError::unexpected_shape(
                key,
                format!("expected a node object, found {}", kind_of(value)),
            ));
        };

        let kind = match object.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(RawError::unexpected_shape(
                    key,
                    format!("node 'type' must be a string, found {}", kind_of(other)),
                ));
            }
            None => {
                return Err(RawError::unexpected_shape(key, "node object without 'type'"));
            }
        };

        let loc = match object.get("loc") {
            None | Some(Value::Null) => None,
            Some(loc) => Some(
                serde_json::from_value::<Location>(loc.clone()).map_err(|e| {
                    RawError::unexpected_shape(key, format!("malformed 'loc': {e}"))
                })?,
            ),
        };

        let mut fields = IndexMap::new();
        for (field, value) in object {
            if field == "type" || field == "loc" {
                continue;
            }
            fields.insert(field.clone(), RawValue::from_value_at(value, field)?);
        }

        Ok(Self { kind, loc, fields })
    }

    /// The node's `name` scalar field, used when a loc-less node is
    /// recorded as an attribute of its owner.
    pub fn name(&self) -> Option<&str> {
        match self.fields.get("name") {
            Some(RawValue::Scalar(scalar)) => scalar.as_str(),
            _ => None,
        }
    }
}

impl RawValue {
    fn from_value_at(value: &Value, key: &str) -> Result<Self, RawError> {
        match value {
            Value::String(s) => Ok(RawValue::Scalar(Scalar::Str(s.clone()))),
            Value::Bool(b) => Ok(RawValue::Scalar(Scalar::Bool(*b))),
            Value::Null => Ok(RawValue::Scalar(Scalar::Null)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(RawValue::Scalar(Scalar::Int(i)))
                } else if let Some(x) = n.as_f64() {
                    Ok(RawValue::Scalar(Scalar::Float(x)))
                } else {
                    Err(RawError::unexpected_shape(
                        key,
                        format!("unrepresentable number {n}"),
                    ))
                }
            }
            Value::Array(items) => {
                let nodes = items
                    .iter()
                    .map(|item| RawNode::from_value_at(item, key))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(RawValue::Nodes(nodes))
            }
            Value::Object(_) => Ok(RawValue::Node(Box::new(RawNode::from_value_at(
                value, key,
            )?))),
        }
    }
}

impl<'de> Deserialize<'de> for RawNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        RawNode::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
