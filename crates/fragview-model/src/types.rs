// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for decoded STEP/IFC data

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe entity identifier
///
/// Wraps the raw STEP entity ID (e.g., `#123` becomes `EntityId(123)`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0 as u64
    }
}

/// A single STEP attribute value
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Null value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string (unwrapping typed values like IFCLABEL('x'))
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_string(),
            _ => None,
        }
    }

    /// Try to get as float (integers coerce)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_float(),
            _ => None,
        }
    }

    /// Try to get as list slice
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Collect every entity reference inside this value, recursing into
    /// lists and typed values.
    pub fn collect_refs(&self, out: &mut Vec<EntityId>) {
        match self {
            AttributeValue::EntityRef(id) => out.push(*id),
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                for item in items {
                    item.collect_refs(out);
                }
            }
            _ => {}
        }
    }
}

/// A fully decoded STEP entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodedEntity {
    /// Entity ID (#123)
    pub id: EntityId,
    /// Uppercased type name (e.g. "IFCWALL")
    pub type_name: String,
    /// Positional attributes in declaration order
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Get attribute by index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get string attribute by index (None for `$` or non-strings)
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.attributes.get(index)?.as_string()
    }

    /// Get entity reference attribute by index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.attributes.get(index)?.as_entity_ref()
    }

    /// All entity references anywhere in the attribute tree
    pub fn all_refs(&self) -> Vec<EntityId> {
        let mut refs = Vec::new();
        for attr in &self.attributes {
            attr.collect_refs(&mut refs);
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_display() {
        assert_eq!(EntityId(42).to_string(), "#42");
    }

    #[test]
    fn string_unwraps_typed_value() {
        let v = AttributeValue::TypedValue(
            "IFCLABEL".into(),
            vec![AttributeValue::String("Wall 1".into())],
        );
        assert_eq!(v.as_string(), Some("Wall 1"));
    }

    #[test]
    fn collect_refs_recurses_into_lists() {
        let v = AttributeValue::List(vec![
            AttributeValue::EntityRef(EntityId(1)),
            AttributeValue::List(vec![AttributeValue::EntityRef(EntityId(2))]),
            AttributeValue::Null,
        ]);
        let mut refs = Vec::new();
        v.collect_refs(&mut refs);
        assert_eq!(refs, vec![EntityId(1), EntityId(2)]);
    }
}
