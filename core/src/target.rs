//! Target-side model: the plugin-framework schema representation.
//!
//! This is what conversion produces: per-field behavioral metadata
//! (config mode, element schemas, cardinality and optionality flags)
//! layered on top of the structural information carried by the source.
//!
//! The tree is acyclic by construction and is handed to the consuming
//! plugin runtime as-is; nothing here mutates it after conversion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed deprecation message attached wherever the source marks a
/// schema element deprecated.
pub const DEPRECATED_MESSAGE: &str = "deprecated";

/// Renders the deprecation message convention: a fixed literal when
/// deprecated, the empty string otherwise.
pub fn deprecation_message(deprecated: bool) -> String {
    if deprecated {
        DEPRECATED_MESSAGE.to_string()
    } else {
        String::new()
    }
}

/// Value type tag of a converted attribute.
///
/// Numbers map uniformly to [`FieldType::Float`]; the source format does
/// not distinguish integers. [`FieldType::Invalid`] marks attributes
/// whose source carried no recognizable primitive (including the
/// declared-type-absent shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Float,
    Bool,
    List,
    Set,
    Map,
    #[default]
    Invalid,
}

/// Collection discipline of a converted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    List,
    Set,
    Map,
}

/// How a collection's elements are configured.
///
/// `Auto` means a single implicit element type; `Attr` means the
/// elements are defined by named sub-attributes (object-typed
/// collection elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMode {
    #[default]
    Auto,
    Attr,
}

/// Element descriptor of a collection-typed attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrElem {
    /// Single implicit element descriptor (primitive or nested
    /// collection element).
    Type(Box<TargetAttribute>),
    /// Named sub-attributes, used when the element type is an object.
    Object(BTreeMap<String, TargetAttribute>),
}

/// A converted attribute, with inferred behavioral metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TargetAttribute {
    /// Value type tag.
    pub field_type: FieldType,
    /// Element descriptor for collection types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<AttrElem>,
    /// Element configuration discipline.
    #[serde(default)]
    pub config_mode: ConfigMode,
    /// May be set in configuration.
    #[serde(default)]
    pub optional: bool,
    /// Must be set in configuration.
    #[serde(default)]
    pub required: bool,
    /// May be populated by the provider.
    #[serde(default)]
    pub computed: bool,
    /// Value should be redacted in output.
    #[serde(default)]
    pub sensitive: bool,
    /// Human-readable description, copied from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fixed message when deprecated, empty otherwise.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deprecation_message: String,
}

/// A converted nested block, with reconstructed cardinality flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBlock {
    /// Collection discipline.
    pub block_type: BlockType,
    /// Minimum number of instances.
    pub min_items: u64,
    /// Maximum number of instances (0 = unbounded; 1 for
    /// single-nesting blocks).
    pub max_items: u64,
    /// Inferred from `min_items == 0`.
    #[serde(default)]
    pub optional: bool,
    /// Set only for single-nesting blocks with required children.
    #[serde(default)]
    pub required: bool,
    /// Inferred from `min_items == 0 && max_items == 0`.
    #[serde(default)]
    pub computed: bool,
    /// Converted body of the nested block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<TargetSchema>,
    /// Human-readable description, copied from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fixed message when deprecated, empty otherwise.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deprecation_message: String,
}

/// A fully converted resource schema.
///
/// Produced in one pass per [`SourceSchema`](crate::SourceSchema); the
/// attribute and block maps are keyed by the same field names as the
/// source (minus the reserved timeouts key at the top level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TargetSchema {
    /// Schema version, validated to fit a signed 64-bit integer.
    pub version: i64,
    /// Converted attributes, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, TargetAttribute>,
    /// Converted nested blocks, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, TargetBlock>,
    /// Human-readable description, copied from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fixed message when deprecated, empty otherwise.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deprecation_message: String,
}
