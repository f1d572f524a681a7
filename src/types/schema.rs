//! Core JSON Schema type definitions.
//!
//! This module contains the types for representing a dereferenced JSON
//! Schema tree:
//! - [`JsonSchema`] - a single constraint-bearing schema node
//! - [`SchemaTypeSet`] - the `type` keyword as a set of JSON type flags
//! - [`BoundOrFlag`], [`ItemsSchema`], [`AdditionalSchema`] - keywords whose
//!   JSON representation is one of two shapes

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

bitflags::bitflags! {
    /// JSON type flags declared by the `type` keyword.
    ///
    /// More than one flag means the value may be any of the listed types;
    /// an empty set means the schema places no type constraint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SchemaTypeSet: u8 {
        const ARRAY = 1;
        const BOOLEAN = 1 << 1;
        const INTEGER = 1 << 2;
        const NULL = 1 << 3;
        const NUMBER = 1 << 4;
        const OBJECT = 1 << 5;
        const STRING = 1 << 6;
    }
}

impl SchemaTypeSet {
    /// Parse a single `type` keyword name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "array" => Some(Self::ARRAY),
            "boolean" => Some(Self::BOOLEAN),
            "integer" => Some(Self::INTEGER),
            "null" => Some(Self::NULL),
            "number" => Some(Self::NUMBER),
            "object" => Some(Self::OBJECT),
            "string" => Some(Self::STRING),
            _ => None,
        }
    }

    /// Keyword name of a single flag.
    pub fn name(self) -> &'static str {
        if self == Self::ARRAY {
            "array"
        } else if self == Self::BOOLEAN {
            "boolean"
        } else if self == Self::INTEGER {
            "integer"
        } else if self == Self::NULL {
            "null"
        } else if self == Self::NUMBER {
            "number"
        } else if self == Self::OBJECT {
            "object"
        } else if self == Self::STRING {
            "string"
        } else {
            "none"
        }
    }

    /// Number of flags set.
    pub fn len(self) -> usize {
        self.bits().count_ones() as usize
    }
}

impl fmt::Display for SchemaTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for flag in self.iter() {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{}", flag.name())?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for SchemaTypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.len() == 1 {
            serializer.serialize_str(self.name())
        } else {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for flag in self.iter() {
                seq.serialize_element(flag.name())?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for SchemaTypeSet {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct TypeVisitor;

        impl<'de> Visitor<'de> for TypeVisitor {
            type Value = SchemaTypeSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a JSON type name or an array of type names")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                SchemaTypeSet::from_type_name(v)
                    .ok_or_else(|| E::custom(format!("unknown JSON type: {v}")))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut set = SchemaTypeSet::empty();
                while let Some(name) = seq.next_element::<String>()? {
                    set |= SchemaTypeSet::from_type_name(&name)
                        .ok_or_else(|| de::Error::custom(format!("unknown JSON type: {name}")))?;
                }
                Ok(set)
            }
        }

        deserializer.deserialize_any(TypeVisitor)
    }
}

/// The two JSON shapes of `exclusiveMinimum`/`exclusiveMaximum`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundOrFlag {
    /// Boolean form: flips inclusivity of the paired `minimum`/`maximum`
    Flag(bool),
    /// Numeric form: an independent strict bound
    Value(f64),
}

/// The two JSON shapes of the `items` keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsSchema {
    /// One schema applied to every item
    Single(Arc<JsonSchema>),
    /// Positional schemas for tuple typing
    Tuple(Vec<Arc<JsonSchema>>),
}

/// The two JSON shapes of `additionalItems`/`additionalProperties`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalSchema {
    /// Boolean form: whether additional content is allowed at all
    Allowed(bool),
    /// Schema form: additional content must validate against it
    Schema(Arc<JsonSchema>),
}

/// A single JSON Schema node.
///
/// The tree is consumed read-only during validation. The validator always
/// operates on [`actual_schema`](Self::actual_schema), the dereferenced form
/// of a node; `$ref` resolution itself is the job of an external resolver
/// which populates [`reference`](Self::reference).
///
/// # Example
/// ```
/// use jsonschema_engine::JsonSchema;
///
/// let schema = JsonSchema::from_json(r#"{"type": "string", "minLength": 2}"#)?;
/// assert_eq!(schema.min_length, Some(2));
/// # Ok::<(), jsonschema_engine::SchemaError>(())
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSchema {
    /// Schema title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared JSON type flags
    #[serde(rename = "type", skip_serializing_if = "SchemaTypeSet::is_empty")]
    pub schema_type: SchemaTypeSet,

    // Numeric constraints
    /// Lower bound, inclusive unless flipped by `exclusiveMinimum: true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper bound, inclusive unless flipped by `exclusiveMaximum: true`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<BoundOrFlag>,
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<BoundOrFlag>,
    /// The value must be an exact multiple of this number
    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    // String constraints
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the string must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Format name resolved against the registered format validators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    // Array constraints
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Whether items must be pairwise distinct
    #[serde(rename = "uniqueItems", skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
    /// Homogeneous item schema or positional tuple schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsSchema>,
    /// Handling of items beyond the tuple length
    #[serde(rename = "additionalItems", skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<AdditionalSchema>,

    // Object constraints
    /// Declared properties, in declaration order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Arc<JsonSchema>>,
    /// Names of required properties
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Regex-keyed schemas for undeclared properties, in declaration order
    #[serde(rename = "patternProperties", skip_serializing_if = "IndexMap::is_empty")]
    pub pattern_properties: IndexMap<String, Arc<JsonSchema>>,
    /// Handling of properties not covered by `properties`/`patternProperties`
    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalSchema>,
    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<usize>,
    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<usize>,

    // Combinators
    /// The value must match every sub-schema
    #[serde(rename = "allOf", skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Arc<JsonSchema>>,
    /// The value must match at least one sub-schema
    #[serde(rename = "anyOf", skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Arc<JsonSchema>>,
    /// The value must match exactly one sub-schema
    #[serde(rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Arc<JsonSchema>>,
    /// Schema the value must not match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Arc<JsonSchema>>,

    /// Literal values the instance must equal one of (null-inclusive)
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enumeration: Vec<serde_json::Value>,

    /// Resolution target set by an external `$ref` resolver
    #[serde(skip)]
    pub reference: Option<Arc<JsonSchema>>,
}

impl JsonSchema {
    /// Parse a schema document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema = serde_json::from_str(json)?;
        Ok(schema)
    }

    /// The dereferenced form of this node.
    pub fn actual_schema(&self) -> &JsonSchema {
        let mut schema = self;
        while let Some(reference) = &schema.reference {
            schema = reference;
        }
        schema
    }

    /// Whether `name` appears in the `required` list.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }

    /// Homogeneous item schema, when `items` is a single schema.
    pub fn item(&self) -> Option<&Arc<JsonSchema>> {
        match &self.items {
            Some(ItemsSchema::Single(schema)) => Some(schema),
            _ => None,
        }
    }

    /// Positional tuple schemas, when `items` is a list.
    pub fn tuple_items(&self) -> &[Arc<JsonSchema>] {
        match &self.items {
            Some(ItemsSchema::Tuple(schemas)) => schemas,
            _ => &[],
        }
    }

    /// Whether items beyond the tuple length are allowed.
    pub fn allow_additional_items(&self) -> bool {
        !matches!(self.additional_items, Some(AdditionalSchema::Allowed(false)))
    }

    /// Schema for items beyond the tuple length, if one is declared.
    pub fn additional_items_schema(&self) -> Option<&Arc<JsonSchema>> {
        match &self.additional_items {
            Some(AdditionalSchema::Schema(schema)) => Some(schema),
            _ => None,
        }
    }

    /// Whether undeclared properties are allowed.
    pub fn allow_additional_properties(&self) -> bool {
        !matches!(
            self.additional_properties,
            Some(AdditionalSchema::Allowed(false))
        )
    }

    /// Schema for undeclared properties, if one is declared.
    pub fn additional_properties_schema(&self) -> Option<&Arc<JsonSchema>> {
        match &self.additional_properties {
            Some(AdditionalSchema::Schema(schema)) => Some(schema),
            _ => None,
        }
    }

    /// Whether the paired `minimum` bound is strict.
    pub fn is_exclusive_minimum(&self) -> bool {
        matches!(self.exclusive_minimum, Some(BoundOrFlag::Flag(true)))
    }

    /// Whether the paired `maximum` bound is strict.
    pub fn is_exclusive_maximum(&self) -> bool {
        matches!(self.exclusive_maximum, Some(BoundOrFlag::Flag(true)))
    }

    /// Independent strict lower bound (numeric `exclusiveMinimum`).
    pub fn exclusive_minimum_value(&self) -> Option<f64> {
        match self.exclusive_minimum {
            Some(BoundOrFlag::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Independent strict upper bound (numeric `exclusiveMaximum`).
    pub fn exclusive_maximum_value(&self) -> Option<f64> {
        match self.exclusive_maximum {
            Some(BoundOrFlag::Value(value)) => Some(value),
            _ => None,
        }
    }
}
