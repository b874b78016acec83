//! Source-side model: the schema tree emitted by provider introspection.
//!
//! These types mirror the JSON produced by an infrastructure tool's
//! schema-introspection command. They carry structural type information
//! (via [`ValueType`]) plus a handful of boolean flags; behavioral
//! metadata (config mode, cardinality, element schemas) is *not* present
//! here and is inferred during conversion.
//!
//! Every field is defaulted so that sparse dumps deserialize cleanly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ValueType;

/// Top-level schema for one resource, as introspected.
///
/// # Examples
///
/// ```
/// use provider_schema_core::SourceSchema;
///
/// let schema: SourceSchema = serde_json::from_str(r#"{
///     "version": 2,
///     "block": {
///         "attributes": {
///             "name": {"type": "string", "required": true}
///         }
///     }
/// }"#).unwrap();
///
/// assert_eq!(schema.version, 2);
/// let block = schema.block.unwrap();
/// assert!(block.attributes["name"].required);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSchema {
    /// Schema version of the resource. Must fit a 64-bit signed integer
    /// for conversion to succeed.
    #[serde(default)]
    pub version: u64,
    /// Body of the resource; absent for bodiless schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<SourceBlock>,
}

/// Body of a schema node: named attributes and nested blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceBlock {
    /// Leaf and collection-typed fields, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, SourceAttribute>,
    /// Nested block definitions, keyed by field name.
    #[serde(default, rename = "block_types", skip_serializing_if = "BTreeMap::is_empty")]
    pub nested_blocks: BTreeMap<String, SourceNestedBlock>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this block is deprecated.
    #[serde(default)]
    pub deprecated: bool,
}

/// A single introspected attribute.
///
/// `value_type` is `None` for the "nested attribute" shape some dumps
/// emit; both shapes convert identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceAttribute {
    /// Declared structural type, when present.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Must be set in configuration.
    #[serde(default)]
    pub required: bool,
    /// May be set in configuration.
    #[serde(default)]
    pub optional: bool,
    /// May be populated by the provider.
    #[serde(default)]
    pub computed: bool,
    /// Value should be redacted in output.
    #[serde(default)]
    pub sensitive: bool,
    /// Whether this attribute is deprecated.
    #[serde(default)]
    pub deprecated: bool,
}

/// How repeated instances of a nested block are collected.
///
/// Unknown modes deserialize as [`NestingMode::Other`] so a malformed
/// dump still loads; conversion then reports the contract violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NestingMode {
    /// At most one instance, addressed directly.
    #[default]
    Single,
    /// Ordered instances.
    List,
    /// Unordered unique instances.
    Set,
    /// String-keyed instances.
    Map,
    /// Any mode outside the four known values.
    #[serde(untagged)]
    Other(String),
}

/// A nested block definition: nesting mode, item bounds, and body.
///
/// The source format carries no optional/computed flags for blocks;
/// those are reconstructed from `(min_items, max_items)` during
/// conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceNestedBlock {
    /// Collection discipline for repeated instances.
    #[serde(default)]
    pub nesting_mode: NestingMode,
    /// Minimum number of instances (0 = unconstrained).
    #[serde(default)]
    pub min_items: u64,
    /// Maximum number of instances (0 = unbounded).
    #[serde(default)]
    pub max_items: u64,
    /// Body of the nested block; absent for opaque blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<SourceBlock>,
}
