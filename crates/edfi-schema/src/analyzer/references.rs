//! Reference detection for schema properties
//!
//! A property is a relationship when one of three shapes carries a `$ref`.
//! The shapes are tried in a fixed order and the first match wins:
//!
//! 1. a direct `$ref`
//! 2. an `array` whose `items` has a `$ref`
//! 3. an `allOf` whose first member has a `$ref` (later members are ignored)

use serde_json::Value;

use super::graph::{ARRAY_TYPE, REFERENCE_TYPE};
use crate::core::Cardinality;

/// Which property shape produced a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Direct,
    ArrayItems,
    AllOf,
}

impl ReferenceKind {
    /// Synthetic property type tag for this shape
    pub fn property_type(self) -> &'static str {
        match self {
            ReferenceKind::Direct | ReferenceKind::AllOf => REFERENCE_TYPE,
            ReferenceKind::ArrayItems => ARRAY_TYPE,
        }
    }

    /// Relationship cardinality implied by this shape
    pub fn cardinality(self) -> Cardinality {
        match self {
            ReferenceKind::Direct | ReferenceKind::AllOf => Cardinality::OneToOne,
            ReferenceKind::ArrayItems => Cardinality::OneToMany,
        }
    }
}

/// A resolved reference: the shape that matched and the target schema name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMatch<'a> {
    pub kind: ReferenceKind,
    pub target: &'a str,
}

type Matcher = fn(&Value) -> Option<&str>;

/// Matchers in priority order
pub const MATCHERS: [(ReferenceKind, Matcher); 3] = [
    (ReferenceKind::Direct, direct_ref),
    (ReferenceKind::ArrayItems, array_items_ref),
    (ReferenceKind::AllOf, all_of_ref),
];

/// Resolve a property schema to the entity it references, if any
pub fn resolve_reference(property: &Value) -> Option<ReferenceMatch<'_>> {
    MATCHERS.iter().find_map(|(kind, matcher)| {
        matcher(property).map(|target| ReferenceMatch {
            kind: *kind,
            target,
        })
    })
}

/// Bare schema name of a `$ref` pointer (the part after the final `/`)
pub fn ref_name(pointer: &str) -> &str {
    pointer.rsplit('/').next().unwrap_or(pointer)
}

fn ref_of(value: &Value) -> Option<&str> {
    value.get("$ref").and_then(Value::as_str).map(ref_name)
}

fn direct_ref(property: &Value) -> Option<&str> {
    ref_of(property)
}

fn array_items_ref(property: &Value) -> Option<&str> {
    if property.get("type").and_then(Value::as_str) != Some("array") {
        return None;
    }
    property.get("items").and_then(ref_of)
}

fn all_of_ref(property: &Value) -> Option<&str> {
    property
        .get("allOf")
        .and_then(Value::as_array)
        .and_then(|members| members.first())
        .and_then(ref_of)
}
