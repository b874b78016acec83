//! Introspected provider schema model and plugin-framework conversion.
//!
//! This crate converts the provider-neutral schema description emitted by
//! an infrastructure tool's schema-introspection command into the richer
//! internal representation a plugin framework uses to validate and render
//! configuration values:
//!
//! - [`SourceSchema`] / [`SourceBlock`] / [`SourceAttribute`] /
//!   [`SourceNestedBlock`] — the introspected input tree, deserializable
//!   from the introspection JSON dump.
//! - [`ValueType`] — the recursive structural type carried by source
//!   attributes.
//! - [`TargetSchema`] / [`TargetAttribute`] / [`TargetBlock`] — the
//!   converted output tree, with inferred config modes, element schemas,
//!   and cardinality flags.
//! - [`convert_schemas`] / [`convert_schema`] — the conversion entry
//!   points. Conversion is pure, deterministic, and atomic: it either
//!   yields a complete target tree or a [`ConvertError`].
//!
//! # Example
//!
//! ```
//! use provider_schema_core::*;
//!
//! let source: SourceSchema = serde_json::from_str(r#"{
//!     "version": 1,
//!     "block": {
//!         "attributes": {
//!             "region": {"type": "string", "required": true}
//!         },
//!         "block_types": {
//!             "endpoint": {
//!                 "nesting_mode": "single",
//!                 "block": {
//!                     "attributes": {"url": {"type": "string", "required": true}}
//!                 }
//!             },
//!             "timeouts": {"nesting_mode": "single"}
//!         }
//!     }
//! }"#).unwrap();
//!
//! let target = convert_schema(&source).unwrap();
//! assert_eq!(target.attributes["region"].field_type, FieldType::String);
//! // The single-nesting endpoint block has a required child, so the
//! // block itself becomes required with exactly one instance.
//! assert!(target.blocks["endpoint"].required);
//! assert_eq!(target.blocks["endpoint"].max_items, 1);
//! // Resource-level timeouts are owned elsewhere and never emitted.
//! assert!(!target.blocks.contains_key("timeouts"));
//! ```

mod convert;
mod error;
mod source;
mod target;
mod value;

pub use convert::{
    MAX_NESTING_DEPTH, RESERVED_TIMEOUTS_KEY, convert_attribute, convert_nested_block,
    convert_schema, convert_schemas, has_required_child,
};
pub use error::{ConvertError, Result};
pub use source::{NestingMode, SourceAttribute, SourceBlock, SourceNestedBlock, SourceSchema};
pub use target::{
    AttrElem, BlockType, ConfigMode, DEPRECATED_MESSAGE, FieldType, TargetAttribute, TargetBlock,
    TargetSchema, deprecation_message,
};
pub use value::ValueType;
