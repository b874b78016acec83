//! Conversion from introspected source schemas to the plugin-framework
//! representation.
//!
//! The source format carries only structural type information plus a few
//! boolean flags; the target additionally needs per-field behavioral
//! metadata (config mode, element schemas, nesting cardinality) that is
//! inferred here from structural cues:
//!
//! - collection attributes get element descriptors that inherit the
//!   parent's computed/optional flags;
//! - object-typed collection elements switch the attribute to
//!   [`ConfigMode::Attr`] with named sub-attributes;
//! - nested-block optionality and computedness are reconstructed from
//!   `(min_items, max_items)`;
//! - single-nesting blocks become one-item lists whose requiredness is
//!   decided by a recursive scan for required children.
//!
//! Conversion is a pure function of its input and fails atomically: any
//! unsupported type, unhandled nesting mode, or version overflow aborts
//! the whole conversion with a [`ConvertError`], producing no partial
//! output.
//!
//! # Example
//!
//! ```
//! use provider_schema_core::*;
//! use std::collections::BTreeMap;
//!
//! let schema: SourceSchema = serde_json::from_str(r#"{
//!     "version": 1,
//!     "block": {
//!         "attributes": {
//!             "name": {"type": "string", "required": true},
//!             "tags": {"type": ["map", "string"], "optional": true}
//!         }
//!     }
//! }"#).unwrap();
//!
//! let target = convert_schema(&schema).unwrap();
//! assert_eq!(target.version, 1);
//! assert_eq!(target.attributes["name"].field_type, FieldType::String);
//! assert_eq!(target.attributes["tags"].field_type, FieldType::Map);
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::source::{NestingMode, SourceAttribute, SourceBlock, SourceNestedBlock, SourceSchema};
use crate::target::{
    AttrElem, BlockType, ConfigMode, FieldType, TargetAttribute, TargetBlock, TargetSchema,
    deprecation_message,
};
use crate::value::ValueType;

/// Field name of the resource-level CRUD timeouts block.
///
/// Timeouts are owned by an externally configured mechanism, so this key
/// is never emitted into a converted resource's top-level blocks. Blocks
/// nested deeper may legitimately declare their own timeouts-shaped
/// configuration and are left untouched.
pub const RESERVED_TIMEOUTS_KEY: &str = "timeouts";

/// Hardening limit on schema nesting depth.
///
/// Real schemas nest five or six levels; anything past this limit is
/// treated as pathological input rather than risking stack exhaustion.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Flags a collection element inherits from its enclosing attribute.
///
/// Threaded explicitly through the recursive type mapping so every
/// level sees the same read-only values.
#[derive(Debug, Clone, Copy, Default)]
struct Inherited {
    computed: bool,
    optional: bool,
}

/// Outcome of mapping one structural type.
struct MappedType {
    field_type: FieldType,
    elem: Option<AttrElem>,
    config_mode: ConfigMode,
}

/// Converts a whole introspection dump: resource name → source schema in,
/// resource name → target schema out.
///
/// Fails atomically on the first resource that cannot be converted.
///
/// # Examples
///
/// ```
/// use provider_schema_core::{SourceSchema, convert_schemas};
/// use std::collections::BTreeMap;
///
/// let mut sources = BTreeMap::new();
/// sources.insert("example_thing".to_string(), SourceSchema { version: 3, block: None });
///
/// let targets = convert_schemas(&sources).unwrap();
/// assert_eq!(targets["example_thing"].version, 3);
/// ```
pub fn convert_schemas(
    schemas: &BTreeMap<String, SourceSchema>,
) -> Result<BTreeMap<String, TargetSchema>> {
    let mut converted = BTreeMap::new();
    for (name, schema) in schemas {
        let target = convert_schema(schema)?;
        debug!(
            resource = %name,
            attributes = target.attributes.len(),
            blocks = target.blocks.len(),
            "Converted resource schema"
        );
        converted.insert(name.clone(), target);
    }
    Ok(converted)
}

/// Converts a single resource schema.
///
/// A schema without a body yields a target carrying only the version.
/// The reserved timeouts key is excluded from the top-level block map;
/// see [`RESERVED_TIMEOUTS_KEY`].
pub fn convert_schema(schema: &SourceSchema) -> Result<TargetSchema> {
    let version = i64::try_from(schema.version)
        .map_err(|_| ConvertError::VersionOverflow(schema.version))?;

    let Some(block) = &schema.block else {
        return Ok(TargetSchema {
            version,
            ..Default::default()
        });
    };

    let (attributes, blocks) = convert_block_body(block, true, 0)?;
    Ok(TargetSchema {
        version,
        attributes,
        blocks,
        description: block.description.clone(),
        deprecation_message: deprecation_message(block.deprecated),
    })
}

/// Converts the attributes and nested blocks of one block body.
///
/// `skip_reserved` applies the top-level timeouts exclusion; recursive
/// calls from nested blocks pass `false` so inner blocks keep any
/// timeouts-shaped configuration of their own.
fn convert_block_body(
    block: &SourceBlock,
    skip_reserved: bool,
    depth: usize,
) -> Result<(BTreeMap<String, TargetAttribute>, BTreeMap<String, TargetBlock>)> {
    let mut attributes = BTreeMap::new();
    for (name, attr) in &block.attributes {
        attributes.insert(name.clone(), convert_attribute(attr)?);
    }

    let mut blocks = BTreeMap::new();
    for (name, nested) in &block.nested_blocks {
        if skip_reserved && name == RESERVED_TIMEOUTS_KEY {
            continue;
        }
        blocks.insert(name.clone(), convert_nested_block_at(nested, depth)?);
    }

    Ok((attributes, blocks))
}

/// Converts a single attribute.
///
/// Flags and description are copied verbatim; the declared structural
/// type (when present) is mapped recursively. An attribute without a
/// declared type keeps [`FieldType::Invalid`] with no element
/// descriptor.
///
/// # Examples
///
/// ```
/// use provider_schema_core::*;
///
/// let attr: SourceAttribute = serde_json::from_str(
///     r#"{"type": ["list", "number"], "optional": true, "sensitive": true}"#,
/// ).unwrap();
///
/// let target = convert_attribute(&attr).unwrap();
/// assert_eq!(target.field_type, FieldType::List);
/// assert!(target.sensitive);
/// match target.elem.unwrap() {
///     AttrElem::Type(elem) => {
///         assert_eq!(elem.field_type, FieldType::Float);
///         assert!(elem.optional);
///     }
///     other => panic!("unexpected elem: {other:?}"),
/// }
/// ```
pub fn convert_attribute(attr: &SourceAttribute) -> Result<TargetAttribute> {
    let mut target = TargetAttribute {
        optional: attr.optional,
        required: attr.required,
        computed: attr.computed,
        sensitive: attr.sensitive,
        description: attr.description.clone(),
        deprecation_message: deprecation_message(attr.deprecated),
        ..Default::default()
    };

    if let Some(value_type) = &attr.value_type {
        let inherited = Inherited {
            computed: attr.computed,
            optional: attr.optional,
        };
        let mapped = map_type(value_type, inherited, 0)?;
        target.field_type = mapped.field_type;
        target.elem = mapped.elem;
        target.config_mode = mapped.config_mode;
    }

    Ok(target)
}

/// Maps one structural type to a target type tag, element descriptor,
/// and config mode.
///
/// `inherited` carries the enclosing attribute's computed/optional flags
/// down to every element descriptor built along the way. `depth` counts
/// type-tree levels for the hardening guard.
fn map_type(value_type: &ValueType, inherited: Inherited, depth: usize) -> Result<MappedType> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ConvertError::NestingTooDeep(MAX_NESTING_DEPTH));
    }

    match value_type {
        ValueType::String | ValueType::Number | ValueType::Bool => Ok(MappedType {
            field_type: primitive_field_type(value_type),
            elem: None,
            config_mode: ConfigMode::Auto,
        }),
        ValueType::List(element) | ValueType::Set(element) | ValueType::Map(element) => {
            let field_type = collection_field_type(value_type);
            let (elem, config_mode) = match element.as_ref() {
                ValueType::Object { attributes, optional } => {
                    // Object elements are configured through named
                    // sub-attributes rather than one implicit element
                    // type. An attribute the object marks optional is
                    // optional regardless of the inherited flag.
                    let mut fields = BTreeMap::new();
                    for (name, attr_type) in attributes {
                        let sub = Inherited {
                            computed: inherited.computed,
                            optional: inherited.optional || optional.contains(name),
                        };
                        fields.insert(name.clone(), element_attribute(attr_type, sub, depth + 1)?);
                    }
                    (AttrElem::Object(fields), ConfigMode::Attr)
                }
                ValueType::Tuple(_) | ValueType::Dynamic => {
                    return Err(ConvertError::UnsupportedType(
                        element.kind_name().to_string(),
                    ));
                }
                other => (
                    AttrElem::Type(Box::new(element_attribute(other, inherited, depth + 1)?)),
                    ConfigMode::Auto,
                ),
            };
            Ok(MappedType {
                field_type,
                elem: Some(elem),
                config_mode,
            })
        }
        // A bare object outside a collection has no target
        // representation; it keeps the invalid type tag.
        ValueType::Object { .. } => Ok(MappedType {
            field_type: FieldType::Invalid,
            elem: None,
            config_mode: ConfigMode::Auto,
        }),
        ValueType::Tuple(_) | ValueType::Dynamic => Err(ConvertError::UnsupportedType(
            value_type.kind_name().to_string(),
        )),
    }
}

/// Builds the element descriptor for a collection element or object
/// sub-attribute, carrying the inherited flags onto it.
fn element_attribute(
    value_type: &ValueType,
    inherited: Inherited,
    depth: usize,
) -> Result<TargetAttribute> {
    let mapped = map_type(value_type, inherited, depth)?;
    Ok(TargetAttribute {
        field_type: mapped.field_type,
        elem: mapped.elem,
        config_mode: mapped.config_mode,
        optional: inherited.optional,
        computed: inherited.computed,
        ..Default::default()
    })
}

fn primitive_field_type(value_type: &ValueType) -> FieldType {
    match value_type {
        ValueType::String => FieldType::String,
        // Numbers map uniformly to float; the source does not
        // distinguish integers.
        ValueType::Number => FieldType::Float,
        ValueType::Bool => FieldType::Bool,
        _ => FieldType::Invalid,
    }
}

fn collection_field_type(value_type: &ValueType) -> FieldType {
    match value_type {
        ValueType::List(_) => FieldType::List,
        ValueType::Set(_) => FieldType::Set,
        ValueType::Map(_) => FieldType::Map,
        _ => FieldType::Invalid,
    }
}

/// Converts a nested block definition.
///
/// The source format omits optional/computed flags for blocks, so they
/// are reconstructed from the item bounds:
///
/// | `(min_items, max_items)` | optional | computed |
/// |--------------------------|----------|----------|
/// | `(0, 0)`                 | true     | true     |
/// | `(0, n > 0)`             | true     | false    |
/// | `(m > 0, _)`             | false    | false    |
///
/// Single-nesting blocks become lists capped at one item; they are
/// required iff the body contains a required child (recursively), and
/// own their min/max/optional/required flags outright.
pub fn convert_nested_block(nested: &SourceNestedBlock) -> Result<TargetBlock> {
    convert_nested_block_at(nested, 0)
}

fn convert_nested_block_at(nested: &SourceNestedBlock, depth: usize) -> Result<TargetBlock> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ConvertError::NestingTooDeep(MAX_NESTING_DEPTH));
    }

    let mut min_items = nested.min_items;
    let mut max_items = nested.max_items;
    let mut optional = nested.min_items == 0;
    let mut required = false;
    // An unbounded block with no declared minimum is modeled as purely
    // computed.
    let computed = nested.min_items == 0 && nested.max_items == 0;

    let block_type = match &nested.nesting_mode {
        NestingMode::Set => BlockType::Set,
        NestingMode::List => BlockType::List,
        NestingMode::Map => BlockType::Map,
        NestingMode::Single => {
            // A single block is a one-item list. It is required exactly
            // when something inside it is mandatory; the cardinality
            // inference above does not apply to this mode.
            min_items = 0;
            required = has_required_child(nested);
            optional = !required;
            if required {
                min_items = 1;
            }
            max_items = 1;
            BlockType::List
        }
        NestingMode::Other(mode) => {
            return Err(ConvertError::UnhandledNestingMode(mode.clone()));
        }
    };

    let mut target = TargetBlock {
        block_type,
        min_items,
        max_items,
        optional,
        required,
        computed,
        elem: None,
        description: None,
        deprecation_message: String::new(),
    };

    let Some(block) = &nested.block else {
        return Ok(target);
    };

    target.description = block.description.clone();
    target.deprecation_message = deprecation_message(block.deprecated);

    // No reserved-key exclusion here: only the resource's own top-level
    // blocks drop the timeouts key.
    let (attributes, blocks) = convert_block_body(block, false, depth + 1)?;
    target.elem = Some(TargetSchema {
        version: 0,
        attributes,
        blocks,
        ..Default::default()
    });

    Ok(target)
}

/// Reports whether a nested block contains any required child.
///
/// True if any direct attribute is required, or any nested block
/// (recursively) has a required child. Used to decide requiredness for
/// single-nesting blocks.
///
/// # Examples
///
/// ```
/// use provider_schema_core::{SourceNestedBlock, has_required_child};
///
/// let nested: SourceNestedBlock = serde_json::from_str(r#"{
///     "nesting_mode": "single",
///     "block": {"attributes": {"name": {"type": "string", "required": true}}}
/// }"#).unwrap();
///
/// assert!(has_required_child(&nested));
/// ```
pub fn has_required_child(nested: &SourceNestedBlock) -> bool {
    let Some(block) = &nested.block else {
        return false;
    };
    if block.attributes.values().any(|attr| attr.required) {
        return true;
    }
    block.nested_blocks.values().any(has_required_child)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed_attr(value_type: ValueType) -> SourceAttribute {
        SourceAttribute {
            value_type: Some(value_type),
            ..Default::default()
        }
    }

    fn required_attr(value_type: ValueType) -> SourceAttribute {
        SourceAttribute {
            value_type: Some(value_type),
            required: true,
            ..Default::default()
        }
    }

    fn block_with_attr(name: &str, attr: SourceAttribute) -> SourceBlock {
        let mut block = SourceBlock::default();
        block.attributes.insert(name.to_string(), attr);
        block
    }

    fn nested(mode: NestingMode, min: u64, max: u64, block: Option<SourceBlock>) -> SourceNestedBlock {
        SourceNestedBlock {
            nesting_mode: mode,
            min_items: min,
            max_items: max,
            block,
        }
    }

    fn schema_with_block(block: SourceBlock) -> SourceSchema {
        SourceSchema {
            version: 1,
            block: Some(block),
        }
    }

    #[test]
    fn test_bodiless_schema_carries_only_version() {
        let target = convert_schema(&SourceSchema {
            version: 7,
            block: None,
        })
        .unwrap();
        assert_eq!(target.version, 7);
        assert!(target.attributes.is_empty());
        assert!(target.blocks.is_empty());
        assert!(target.description.is_none());
    }

    #[test]
    fn test_version_overflow_is_fatal() {
        let schema = SourceSchema {
            version: u64::MAX,
            block: None,
        };
        assert_eq!(
            convert_schema(&schema),
            Err(ConvertError::VersionOverflow(u64::MAX))
        );
    }

    #[test]
    fn test_primitive_type_mapping() {
        let cases = [
            (ValueType::String, FieldType::String),
            (ValueType::Number, FieldType::Float),
            (ValueType::Bool, FieldType::Bool),
        ];
        for (value_type, expected) in cases {
            let target = convert_attribute(&typed_attr(value_type)).unwrap();
            assert_eq!(target.field_type, expected);
            assert!(target.elem.is_none());
            assert_eq!(target.config_mode, ConfigMode::Auto);
        }
    }

    #[test]
    fn test_attribute_flags_copied_verbatim() {
        let attr = SourceAttribute {
            value_type: Some(ValueType::String),
            description: Some("a name".to_string()),
            optional: true,
            computed: true,
            sensitive: true,
            deprecated: true,
            ..Default::default()
        };
        let target = convert_attribute(&attr).unwrap();
        assert!(target.optional);
        assert!(target.computed);
        assert!(target.sensitive);
        assert!(!target.required);
        assert_eq!(target.description.as_deref(), Some("a name"));
        assert_eq!(target.deprecation_message, "deprecated");
    }

    #[test]
    fn test_attribute_without_declared_type_is_invalid() {
        let attr = SourceAttribute {
            optional: true,
            ..Default::default()
        };
        let target = convert_attribute(&attr).unwrap();
        assert_eq!(target.field_type, FieldType::Invalid);
        assert!(target.elem.is_none());
        assert!(target.optional);
    }

    #[test]
    fn test_collection_of_primitive_elem_inherits_flags() {
        let attr = SourceAttribute {
            value_type: Some(ValueType::Set(Box::new(ValueType::Number))),
            optional: true,
            computed: true,
            ..Default::default()
        };
        let target = convert_attribute(&attr).unwrap();
        assert_eq!(target.field_type, FieldType::Set);
        assert_eq!(target.config_mode, ConfigMode::Auto);
        match target.elem.unwrap() {
            AttrElem::Type(elem) => {
                assert_eq!(elem.field_type, FieldType::Float);
                assert!(elem.optional);
                assert!(elem.computed);
                assert!(elem.elem.is_none());
            }
            other => panic!("unexpected elem: {other:?}"),
        }
    }

    #[test]
    fn test_collection_of_collection_recurses() {
        let attr = typed_attr(ValueType::List(Box::new(ValueType::Map(Box::new(
            ValueType::String,
        )))));
        let target = convert_attribute(&attr).unwrap();
        assert_eq!(target.field_type, FieldType::List);
        let AttrElem::Type(middle) = target.elem.unwrap() else {
            panic!("expected single element descriptor");
        };
        assert_eq!(middle.field_type, FieldType::Map);
        assert_eq!(middle.config_mode, ConfigMode::Auto);
        let AttrElem::Type(inner) = middle.elem.unwrap() else {
            panic!("expected inner element descriptor");
        };
        assert_eq!(inner.field_type, FieldType::String);
    }

    #[test]
    fn test_object_element_switches_to_attr_mode() {
        let mut attributes = std::collections::BTreeMap::new();
        attributes.insert("name".to_string(), ValueType::String);
        attributes.insert("count".to_string(), ValueType::Number);
        let mut optional = std::collections::BTreeSet::new();
        optional.insert("count".to_string());

        let attr = typed_attr(ValueType::List(Box::new(ValueType::Object {
            attributes,
            optional,
        })));
        let target = convert_attribute(&attr).unwrap();
        assert_eq!(target.field_type, FieldType::List);
        assert_eq!(target.config_mode, ConfigMode::Attr);
        let AttrElem::Object(fields) = target.elem.unwrap() else {
            panic!("expected named sub-attributes");
        };
        assert!(!fields["name"].optional);
        assert!(fields["count"].optional);
        assert_eq!(fields["count"].field_type, FieldType::Float);
    }

    #[test]
    fn test_object_element_inherits_parent_optional() {
        let mut attributes = std::collections::BTreeMap::new();
        attributes.insert("name".to_string(), ValueType::String);

        let attr = SourceAttribute {
            value_type: Some(ValueType::Set(Box::new(ValueType::Object {
                attributes,
                optional: Default::default(),
            }))),
            optional: true,
            ..Default::default()
        };
        let target = convert_attribute(&attr).unwrap();
        let AttrElem::Object(fields) = target.elem.unwrap() else {
            panic!("expected named sub-attributes");
        };
        assert!(fields["name"].optional);
    }

    #[test]
    fn test_bare_object_attribute_is_invalid() {
        let attr = typed_attr(ValueType::Object {
            attributes: Default::default(),
            optional: Default::default(),
        });
        let target = convert_attribute(&attr).unwrap();
        assert_eq!(target.field_type, FieldType::Invalid);
        assert!(target.elem.is_none());
    }

    #[test]
    fn test_tuple_attribute_is_fatal() {
        let attr = typed_attr(ValueType::Tuple(vec![ValueType::String]));
        assert_eq!(
            convert_attribute(&attr),
            Err(ConvertError::UnsupportedType("tuple".to_string()))
        );
    }

    #[test]
    fn test_dynamic_attribute_is_fatal() {
        let attr = typed_attr(ValueType::Dynamic);
        assert_eq!(
            convert_attribute(&attr),
            Err(ConvertError::UnsupportedType("dynamic".to_string()))
        );
    }

    #[test]
    fn test_tuple_inside_object_element_is_fatal() {
        let mut attributes = std::collections::BTreeMap::new();
        attributes.insert("bad".to_string(), ValueType::Tuple(vec![]));
        let attr = typed_attr(ValueType::List(Box::new(ValueType::Object {
            attributes,
            optional: Default::default(),
        })));
        assert!(matches!(
            convert_attribute(&attr),
            Err(ConvertError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_tuple_anywhere_fails_whole_schema() {
        let mut block = block_with_attr("good", typed_attr(ValueType::String));
        block
            .attributes
            .insert("bad".to_string(), typed_attr(ValueType::Tuple(vec![])));
        assert!(convert_schema(&schema_with_block(block)).is_err());
    }

    #[test]
    fn test_cardinality_inference_table() {
        // (min, max) → (optional, computed)
        let cases = [
            ((0, 0), (true, true)),
            ((0, 4), (true, false)),
            ((2, 4), (false, false)),
            ((1, 0), (false, false)),
        ];
        for ((min, max), (optional, computed)) in cases {
            let target = convert_nested_block(&nested(NestingMode::List, min, max, None)).unwrap();
            assert_eq!(target.optional, optional, "min={min} max={max}");
            assert_eq!(target.computed, computed, "min={min} max={max}");
            assert_eq!(target.min_items, min);
            assert_eq!(target.max_items, max);
            assert!(!target.required);
        }
    }

    #[test]
    fn test_nesting_mode_mapping() {
        let cases = [
            (NestingMode::List, BlockType::List),
            (NestingMode::Set, BlockType::Set),
            (NestingMode::Map, BlockType::Map),
        ];
        for (mode, expected) in cases {
            let target = convert_nested_block(&nested(mode, 0, 0, None)).unwrap();
            assert_eq!(target.block_type, expected);
        }
    }

    #[test]
    fn test_unhandled_nesting_mode_is_fatal() {
        let bad = nested(NestingMode::Other("group".to_string()), 0, 0, None);
        assert_eq!(
            convert_nested_block(&bad),
            Err(ConvertError::UnhandledNestingMode("group".to_string()))
        );
    }

    #[test]
    fn test_single_mode_with_required_attribute() {
        let block = block_with_attr("name", required_attr(ValueType::String));
        let target =
            convert_nested_block(&nested(NestingMode::Single, 0, 0, Some(block))).unwrap();
        assert_eq!(target.block_type, BlockType::List);
        assert!(target.required);
        assert!(!target.optional);
        assert_eq!(target.min_items, 1);
        assert_eq!(target.max_items, 1);
    }

    #[test]
    fn test_single_mode_without_required_children() {
        let block = block_with_attr("name", typed_attr(ValueType::String));
        let target =
            convert_nested_block(&nested(NestingMode::Single, 0, 0, Some(block))).unwrap();
        assert!(!target.required);
        assert!(target.optional);
        assert_eq!(target.min_items, 0);
        assert_eq!(target.max_items, 1);
        // The computed inference still applies to single blocks.
        assert!(target.computed);
    }

    #[test]
    fn test_single_mode_required_through_nested_block() {
        let inner = block_with_attr("name", required_attr(ValueType::String));
        let mut middle = SourceBlock::default();
        middle.nested_blocks.insert(
            "inner".to_string(),
            nested(NestingMode::Single, 0, 0, Some(inner)),
        );
        let single = nested(NestingMode::Single, 0, 0, Some(middle));
        assert!(has_required_child(&single));
        let target = convert_nested_block(&single).unwrap();
        assert!(target.required);
        assert_eq!(target.min_items, 1);
    }

    #[test]
    fn test_single_mode_overrides_declared_bounds() {
        let single = nested(NestingMode::Single, 3, 9, None);
        let target = convert_nested_block(&single).unwrap();
        assert_eq!(target.min_items, 0);
        assert_eq!(target.max_items, 1);
        assert!(target.optional);
    }

    #[test]
    fn test_nested_block_body_and_deprecation() {
        let mut block = block_with_attr("name", typed_attr(ValueType::String));
        block.description = Some("inner config".to_string());
        block.deprecated = true;
        let target = convert_nested_block(&nested(NestingMode::List, 0, 2, Some(block))).unwrap();
        assert_eq!(target.description.as_deref(), Some("inner config"));
        assert_eq!(target.deprecation_message, "deprecated");
        let elem = target.elem.unwrap();
        assert_eq!(elem.version, 0);
        assert!(elem.attributes.contains_key("name"));
    }

    #[test]
    fn test_top_level_timeouts_block_is_excluded() {
        let mut block = SourceBlock::default();
        block.nested_blocks.insert(
            RESERVED_TIMEOUTS_KEY.to_string(),
            nested(NestingMode::Single, 0, 0, None),
        );
        block
            .nested_blocks
            .insert("endpoint".to_string(), nested(NestingMode::List, 0, 0, None));

        let target = convert_schema(&schema_with_block(block)).unwrap();
        assert!(!target.blocks.contains_key(RESERVED_TIMEOUTS_KEY));
        assert!(target.blocks.contains_key("endpoint"));
    }

    #[test]
    fn test_nested_timeouts_block_is_preserved() {
        let mut inner = SourceBlock::default();
        inner.nested_blocks.insert(
            RESERVED_TIMEOUTS_KEY.to_string(),
            nested(NestingMode::Single, 0, 0, None),
        );
        let mut top = SourceBlock::default();
        top.nested_blocks.insert(
            "endpoint".to_string(),
            nested(NestingMode::List, 0, 0, Some(inner)),
        );

        let target = convert_schema(&schema_with_block(top)).unwrap();
        let endpoint = &target.blocks["endpoint"];
        let body = endpoint.elem.as_ref().unwrap();
        assert!(body.blocks.contains_key(RESERVED_TIMEOUTS_KEY));
    }

    #[test]
    fn test_key_set_preserved() {
        let mut block = SourceBlock::default();
        for name in ["alpha", "beta", "gamma"] {
            block
                .attributes
                .insert(name.to_string(), typed_attr(ValueType::String));
        }
        for name in ["first", "second"] {
            block
                .nested_blocks
                .insert(name.to_string(), nested(NestingMode::List, 0, 0, None));
        }

        let target = convert_schema(&schema_with_block(block)).unwrap();
        let attr_keys: Vec<&str> = target.attributes.keys().map(String::as_str).collect();
        assert_eq!(attr_keys, vec!["alpha", "beta", "gamma"]);
        let block_keys: Vec<&str> = target.blocks.keys().map(String::as_str).collect();
        assert_eq!(block_keys, vec!["first", "second"]);
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let mut block = block_with_attr(
            "tags",
            typed_attr(ValueType::Map(Box::new(ValueType::String))),
        );
        block.nested_blocks.insert(
            "rule".to_string(),
            nested(
                NestingMode::Set,
                0,
                3,
                Some(block_with_attr("name", required_attr(ValueType::String))),
            ),
        );
        let schema = schema_with_block(block);

        let first = convert_schema(&schema).unwrap();
        let second = convert_schema(&schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_schema_map_conversion_fails_atomically() {
        let mut sources = BTreeMap::new();
        sources.insert("ok".to_string(), schema_with_block(SourceBlock::default()));
        sources.insert(
            "bad".to_string(),
            schema_with_block(block_with_attr("t", typed_attr(ValueType::Dynamic))),
        );
        assert!(convert_schemas(&sources).is_err());
    }

    #[test]
    fn test_deprecation_message_on_top_level_schema() {
        let mut block = SourceBlock::default();
        block.deprecated = true;
        let target = convert_schema(&schema_with_block(block)).unwrap();
        assert_eq!(target.deprecation_message, "deprecated");

        let target = convert_schema(&schema_with_block(SourceBlock::default())).unwrap();
        assert_eq!(target.deprecation_message, "");
    }

    #[test]
    fn test_type_nesting_depth_guard() {
        let mut value_type = ValueType::String;
        for _ in 0..(MAX_NESTING_DEPTH + 2) {
            value_type = ValueType::List(Box::new(value_type));
        }
        assert_eq!(
            convert_attribute(&typed_attr(value_type)),
            Err(ConvertError::NestingTooDeep(MAX_NESTING_DEPTH))
        );
    }

    #[test]
    fn test_block_nesting_depth_guard() {
        let mut nested_block = nested(NestingMode::List, 0, 0, None);
        for _ in 0..(MAX_NESTING_DEPTH + 2) {
            let mut block = SourceBlock::default();
            block
                .nested_blocks
                .insert("child".to_string(), nested_block);
            nested_block = nested(NestingMode::List, 0, 0, Some(block));
        }
        assert_eq!(
            convert_nested_block(&nested_block),
            Err(ConvertError::NestingTooDeep(MAX_NESTING_DEPTH))
        );
    }
}
