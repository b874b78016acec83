//! Structural value types for introspected provider schemas.
//!
//! This module defines [`ValueType`], a closed recursive description of a
//! configuration value's shape. It mirrors the type encoding used by the
//! schema-introspection JSON dump: primitives are bare strings, collections
//! and objects are tagged arrays.
//!
//! # Wire encoding
//!
//! | Shape      | JSON                                      |
//! |------------|-------------------------------------------|
//! | primitive  | `"string"`, `"number"`, `"bool"`          |
//! | dynamic    | `"dynamic"`                               |
//! | collection | `["list", T]`, `["set", T]`, `["map", T]` |
//! | object     | `["object", {"a": T}, ["a"]]` (third element optional) |
//! | tuple      | `["tuple", [T, ...]]`                     |

use std::collections::{BTreeMap, BTreeSet};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Structural type of a configuration value.
///
/// A closed recursive tagged union: primitives, collections of a single
/// element type, objects with named (and possibly optional) attributes,
/// tuples, and the dynamic pseudo-type. Tuples and dynamic values are
/// representable here but rejected by conversion.
///
/// # Examples
///
/// ```
/// use provider_schema_core::ValueType;
///
/// let vt: ValueType = serde_json::from_str(r#"["list", "string"]"#).unwrap();
/// assert_eq!(vt, ValueType::List(Box::new(ValueType::String)));
/// assert!(vt.is_collection());
/// assert_eq!(vt.element_type(), Some(&ValueType::String));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// UTF-8 string.
    String,
    /// Arbitrary-precision number.
    Number,
    /// Boolean.
    Bool,
    /// Ordered sequence of one element type.
    List(Box<ValueType>),
    /// Unordered unique collection of one element type.
    Set(Box<ValueType>),
    /// String-keyed mapping to one element type.
    Map(Box<ValueType>),
    /// Named attributes, each with its own type; `optional` lists the
    /// attribute names that may be omitted.
    Object {
        attributes: BTreeMap<String, ValueType>,
        optional: BTreeSet<String>,
    },
    /// Heterogeneous fixed-length sequence. Not convertible.
    Tuple(Vec<ValueType>),
    /// Type unknown until evaluation. Not convertible.
    Dynamic,
}

impl ValueType {
    /// Returns true for `String`, `Number`, and `Bool`.
    pub fn is_primitive(&self) -> bool {
        matches!(self, ValueType::String | ValueType::Number | ValueType::Bool)
    }

    /// Returns true for `List`, `Set`, and `Map`.
    pub fn is_collection(&self) -> bool {
        matches!(self, ValueType::List(_) | ValueType::Set(_) | ValueType::Map(_))
    }

    /// Element type of a collection, if this is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use provider_schema_core::ValueType;
    ///
    /// let vt = ValueType::Map(Box::new(ValueType::Bool));
    /// assert_eq!(vt.element_type(), Some(&ValueType::Bool));
    /// assert_eq!(ValueType::String.element_type(), None);
    /// ```
    pub fn element_type(&self) -> Option<&ValueType> {
        match self {
            ValueType::List(elem) | ValueType::Set(elem) | ValueType::Map(elem) => Some(elem),
            _ => None,
        }
    }

    /// Stable kind name, used in error messages and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Bool => "bool",
            ValueType::List(_) => "list",
            ValueType::Set(_) => "set",
            ValueType::Map(_) => "map",
            ValueType::Object { .. } => "object",
            ValueType::Tuple(_) => "tuple",
            ValueType::Dynamic => "dynamic",
        }
    }

    fn to_json(&self) -> serde_json::Value {
        use serde_json::{Value, json};
        match self {
            ValueType::String => json!("string"),
            ValueType::Number => json!("number"),
            ValueType::Bool => json!("bool"),
            ValueType::Dynamic => json!("dynamic"),
            ValueType::List(elem) => json!(["list", elem.to_json()]),
            ValueType::Set(elem) => json!(["set", elem.to_json()]),
            ValueType::Map(elem) => json!(["map", elem.to_json()]),
            ValueType::Object { attributes, optional } => {
                let attrs: serde_json::Map<String, Value> = attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                if optional.is_empty() {
                    json!(["object", attrs])
                } else {
                    json!(["object", attrs, optional])
                }
            }
            ValueType::Tuple(elems) => {
                let items: Vec<Value> = elems.iter().map(ValueType::to_json).collect();
                json!(["tuple", items])
            }
        }
    }

    fn from_json(value: &serde_json::Value) -> Result<Self, String> {
        use serde_json::Value;
        match value {
            Value::String(name) => match name.as_str() {
                "string" => Ok(ValueType::String),
                "number" => Ok(ValueType::Number),
                "bool" => Ok(ValueType::Bool),
                "dynamic" => Ok(ValueType::Dynamic),
                other => Err(format!("unknown primitive type name: {other:?}")),
            },
            Value::Array(parts) => Self::from_tagged(parts),
            other => Err(format!("expected type name or tagged array, got: {other}")),
        }
    }

    fn from_tagged(parts: &[serde_json::Value]) -> Result<Self, String> {
        use serde_json::Value;
        let tag = match parts.first() {
            Some(Value::String(tag)) => tag.as_str(),
            _ => return Err("tagged type array must start with a string tag".to_string()),
        };
        match tag {
            "list" | "set" | "map" => {
                if parts.len() != 2 {
                    return Err(format!("{tag} type must have exactly one element type"));
                }
                let elem = Box::new(Self::from_json(&parts[1])?);
                Ok(match tag {
                    "list" => ValueType::List(elem),
                    "set" => ValueType::Set(elem),
                    _ => ValueType::Map(elem),
                })
            }
            "object" => {
                let attrs = match parts.get(1) {
                    Some(Value::Object(map)) => map,
                    _ => return Err("object type must carry an attribute map".to_string()),
                };
                let mut attributes = BTreeMap::new();
                for (name, raw) in attrs {
                    attributes.insert(name.clone(), Self::from_json(raw)?);
                }
                let mut optional = BTreeSet::new();
                match parts.get(2) {
                    None => {}
                    Some(Value::Array(names)) => {
                        for raw in names {
                            match raw {
                                Value::String(name) => {
                                    optional.insert(name.clone());
                                }
                                other => {
                                    return Err(format!(
                                        "object optional-attribute list must contain names, got: {other}"
                                    ));
                                }
                            }
                        }
                    }
                    Some(other) => {
                        return Err(format!(
                            "object optional-attribute list must be an array, got: {other}"
                        ));
                    }
                }
                if parts.len() > 3 {
                    return Err("object type has trailing elements".to_string());
                }
                Ok(ValueType::Object { attributes, optional })
            }
            "tuple" => {
                let elems = match (parts.get(1), parts.len()) {
                    (Some(Value::Array(items)), 2) => items,
                    _ => return Err("tuple type must carry an element type array".to_string()),
                };
                let mut types = Vec::with_capacity(elems.len());
                for raw in elems {
                    types.push(Self::from_json(raw)?);
                }
                Ok(ValueType::Tuple(types))
            }
            other => Err(format!("unknown compound type tag: {other:?}")),
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        ValueType::from_json(&raw).map_err(D::Error::custom)
    }
}
