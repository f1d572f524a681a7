//! Recursive JSON Schema validation core.
//!
//! The engine walks value and schema together depth-first, accumulating
//! every rule violation into one flat list. Combinators short-circuit only
//! their own branches; the remaining steps always run, so callers receive
//! the complete set of independent diagnostics in one pass.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Number, Value};

use super::errors::{ErrorKind, ValidationError};
use super::settings::{PropertyNameComparison, ValidatorSettings};
use crate::error::Result;
use crate::types::{JsonSchema, SchemaTypeSet};

/// JSON Schema validator.
///
/// Pure over immutable inputs: neither the value nor the schema tree is
/// mutated, so a validator may be shared across threads as long as the
/// schema tree is not concurrently mutated either.
#[derive(Debug, Default)]
pub struct SchemaValidator {
    settings: ValidatorSettings,
}

impl SchemaValidator {
    /// Create a validator with default settings.
    pub fn new() -> Self {
        Self::with_settings(ValidatorSettings::default())
    }

    /// Create a validator with custom settings.
    pub fn with_settings(settings: ValidatorSettings) -> Self {
        Self { settings }
    }

    /// Parse `json` and validate it against `schema`.
    ///
    /// Fails only when the text is not valid JSON; rule violations are
    /// returned as data.
    pub fn validate_text(
        &self,
        json: &str,
        schema: &JsonSchema,
    ) -> Result<Vec<ValidationError>> {
        let value: Value = serde_json::from_str(json)?;
        Ok(self.validate(&value, schema))
    }

    /// Validate `value` against `schema`.
    ///
    /// An empty result means the value is valid at this node and below.
    /// The list is order-stable: validating the same pair twice yields
    /// structurally identical output.
    pub fn validate(&self, value: &Value, schema: &JsonSchema) -> Vec<ValidationError> {
        tracing::trace!("validating value against schema");
        self.collect(value, schema, None, "#", 0)
    }

    /// Validate one node into a fresh list.
    fn collect(
        &self,
        value: &Value,
        schema: &JsonSchema,
        property: Option<&str>,
        path: &str,
        depth: usize,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate_value(value, schema.actual_schema(), property, path, depth, &mut errors);
        errors
    }

    /// The recursive core: every constraint check for one value/schema pair,
    /// in a fixed order. All child validation re-enters through here.
    fn validate_value(
        &self,
        value: &Value,
        schema: &JsonSchema,
        property: Option<&str>,
        path: &str,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(limit) = self.settings.max_recursion_depth
            && depth > limit
        {
            errors.push(ValidationError::new(
                ErrorKind::RecursionLimitExceeded,
                property,
                path,
                schema,
            ));
            return;
        }

        // anyOf: at least one branch must match
        if !schema.any_of.is_empty() {
            let mut groups = Vec::new();
            let mut matched = false;
            for sub_schema in &schema.any_of {
                let child = self.collect(value, sub_schema, property, path, depth + 1);
                if child.is_empty() {
                    matched = true;
                } else {
                    groups.push((Arc::clone(sub_schema), child));
                }
            }
            if !matched {
                errors.push(ValidationError::grouped_by_schema(
                    ErrorKind::NotAnyOf,
                    property,
                    path,
                    schema,
                    groups,
                ));
            }
        }

        // allOf: every branch must match
        if !schema.all_of.is_empty() {
            let mut groups = Vec::new();
            for sub_schema in &schema.all_of {
                let child = self.collect(value, sub_schema, property, path, depth + 1);
                if !child.is_empty() {
                    groups.push((Arc::clone(sub_schema), child));
                }
            }
            if !groups.is_empty() {
                errors.push(ValidationError::grouped_by_schema(
                    ErrorKind::NotAllOf,
                    property,
                    path,
                    schema,
                    groups,
                ));
            }
        }

        // oneOf: exactly one branch must match
        if !schema.one_of.is_empty() {
            let mut groups = Vec::new();
            let mut valid_count = 0usize;
            for sub_schema in &schema.one_of {
                let child = self.collect(value, sub_schema, property, path, depth + 1);
                if child.is_empty() {
                    valid_count += 1;
                } else {
                    groups.push((Arc::clone(sub_schema), child));
                }
            }
            if valid_count != 1 {
                errors.push(ValidationError::grouped_by_schema(
                    ErrorKind::NotOneOf,
                    property,
                    path,
                    schema,
                    groups,
                ));
            }
        }

        // not: the value must fail the excluded schema
        if let Some(not_schema) = &schema.not
            && self.collect(value, not_schema, property, path, depth + 1).is_empty()
        {
            errors.push(ValidationError::new(
                ErrorKind::ExcludedSchemaValidates,
                property,
                path,
                schema,
            ));
        }

        // type dispatch: one flag runs directly, several run per-candidate
        // into independent buckets that collapse into a grouped failure only
        // when no candidate validates cleanly
        let types = schema.schema_type;
        if types.len() > 1 {
            let mut buckets: Vec<(SchemaTypeSet, Vec<ValidationError>)> = Vec::new();
            for flag in types.iter() {
                let mut bucket = Vec::new();
                self.check_types(value, flag, schema, property, path, depth, &mut bucket);
                buckets.push((flag, bucket));
            }
            if buckets.iter().all(|(_, bucket)| !bucket.is_empty()) {
                errors.push(ValidationError::grouped_by_type(
                    ErrorKind::NoTypeValidates,
                    property,
                    path,
                    schema,
                    buckets,
                ));
            }
        } else {
            self.check_types(value, types, schema, property, path, depth, errors);
        }

        // enum: compared through the rendered value, null-inclusive
        if !schema.enumeration.is_empty() {
            let matched = if value.is_null() {
                schema.enumeration.iter().any(Value::is_null)
            } else {
                let rendered = value.to_string();
                schema
                    .enumeration
                    .iter()
                    .any(|member| member.to_string() == rendered)
            };
            if !matched {
                errors.push(ValidationError::new(
                    ErrorKind::NotInEnumeration,
                    property,
                    path,
                    schema,
                ));
            }
        }

        // declared properties and object-level constraints
        self.validate_properties(value, schema, path, depth, errors);
    }

    /// Per-type checks for the given flag set.
    ///
    /// Constraint checks are conditioned on the value's actual kind;
    /// only the `*Expected` mismatches are conditioned on the flags.
    #[allow(clippy::too_many_arguments)]
    fn check_types(
        &self,
        value: &Value,
        flags: SchemaTypeSet,
        schema: &JsonSchema,
        property: Option<&str>,
        path: &str,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        self.validate_array(value, flags, schema, property, path, depth, errors);
        self.validate_string(value, flags, schema, property, path, errors);
        self.validate_number(value, flags, schema, property, path, errors);

        if flags.contains(SchemaTypeSet::INTEGER)
            && !matches!(value, Value::Number(number) if number.is_i64() || number.is_u64())
        {
            errors.push(ValidationError::new(
                ErrorKind::IntegerExpected,
                property,
                path,
                schema,
            ));
        }

        if flags.contains(SchemaTypeSet::BOOLEAN) && !value.is_boolean() {
            errors.push(ValidationError::new(
                ErrorKind::BooleanExpected,
                property,
                path,
                schema,
            ));
        }

        if flags.contains(SchemaTypeSet::NULL) && !value.is_null() {
            errors.push(ValidationError::new(
                ErrorKind::NullExpected,
                property,
                path,
                schema,
            ));
        }

        if flags.contains(SchemaTypeSet::OBJECT) && !value.is_object() {
            errors.push(ValidationError::new(
                ErrorKind::ObjectExpected,
                property,
                path,
                schema,
            ));
        }
    }

    /// Array bounds, uniqueness, homogeneous items and tuple typing.
    #[allow(clippy::too_many_arguments)]
    fn validate_array(
        &self,
        value: &Value,
        flags: SchemaTypeSet,
        schema: &JsonSchema,
        property: Option<&str>,
        path: &str,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        let Value::Array(items) = value else {
            if flags.contains(SchemaTypeSet::ARRAY) {
                errors.push(ValidationError::new(
                    ErrorKind::ArrayExpected,
                    property,
                    path,
                    schema,
                ));
            }
            return;
        };

        if let Some(min_items) = schema.min_items
            && items.len() < min_items
        {
            errors.push(ValidationError::new(
                ErrorKind::TooFewItems,
                property,
                path,
                schema,
            ));
        }
        if let Some(max_items) = schema.max_items
            && items.len() > max_items
        {
            errors.push(ValidationError::new(
                ErrorKind::TooManyItems,
                property,
                path,
                schema,
            ));
        }

        if schema.unique_items {
            // uniqueness through the rendered item, not deep equality
            let mut seen = HashSet::new();
            if !items.iter().all(|item| seen.insert(item.to_string())) {
                errors.push(ValidationError::new(
                    ErrorKind::ItemsNotUnique,
                    property,
                    path,
                    schema,
                ));
            }
        }

        let tuple = schema.tuple_items();
        for (index, item) in items.iter().enumerate() {
            let item_name = format!("[{index}]");
            let item_path = format!("{path}[{index}]");

            if let Some(item_schema) = schema.item() {
                let child =
                    self.collect(item, item_schema, Some(&item_name), &item_path, depth + 1);
                if !child.is_empty() {
                    errors.push(ValidationError::grouped_by_schema(
                        ErrorKind::ArrayItemNotValid,
                        Some(&item_name),
                        &item_path,
                        schema,
                        vec![(Arc::clone(item_schema), child)],
                    ));
                }
            }

            if tuple.is_empty() {
                continue;
            }
            if let Some(position_schema) = tuple.get(index) {
                let child =
                    self.collect(item, position_schema, Some(&item_name), &item_path, depth + 1);
                if !child.is_empty() {
                    errors.push(ValidationError::grouped_by_schema(
                        ErrorKind::ArrayItemNotValid,
                        Some(&item_name),
                        &item_path,
                        schema,
                        vec![(Arc::clone(position_schema), child)],
                    ));
                }
            } else if let Some(additional_schema) = schema.additional_items_schema() {
                let child = self.collect(
                    item,
                    additional_schema,
                    Some(&item_name),
                    &item_path,
                    depth + 1,
                );
                if !child.is_empty() {
                    errors.push(ValidationError::grouped_by_schema(
                        ErrorKind::AdditionalItemNotValid,
                        Some(&item_name),
                        &item_path,
                        schema,
                        vec![(Arc::clone(additional_schema), child)],
                    ));
                }
            } else if !schema.allow_additional_items() {
                errors.push(ValidationError::new(
                    ErrorKind::TooManyItemsInTuple,
                    Some(&item_name),
                    &item_path,
                    schema,
                ));
            }
        }
    }

    /// Pattern, length and format checks for string values.
    fn validate_string(
        &self,
        value: &Value,
        flags: SchemaTypeSet,
        schema: &JsonSchema,
        property: Option<&str>,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let Value::String(text) = value else {
            if flags.contains(SchemaTypeSet::STRING) {
                errors.push(ValidationError::new(
                    ErrorKind::StringExpected,
                    property,
                    path,
                    schema,
                ));
            }
            return;
        };

        if let Some(pattern) = &schema.pattern {
            match Regex::new(pattern) {
                Ok(regex) => {
                    if !regex.is_match(text) {
                        errors.push(ValidationError::new(
                            ErrorKind::PatternMismatch,
                            property,
                            path,
                            schema,
                        ));
                    }
                }
                Err(error) => {
                    tracing::warn!(%pattern, %error, "skipping unusable pattern expression");
                }
            }
        }

        if schema.min_length.is_some() || schema.max_length.is_some() {
            let length = text.chars().count();
            if let Some(min_length) = schema.min_length
                && length < min_length
            {
                errors.push(ValidationError::new(
                    ErrorKind::StringTooShort,
                    property,
                    path,
                    schema,
                ));
            }
            if let Some(max_length) = schema.max_length
                && length > max_length
            {
                errors.push(ValidationError::new(
                    ErrorKind::StringTooLong,
                    property,
                    path,
                    schema,
                ));
            }
        }

        // unknown format names are silently ignored
        if let Some(format) = &schema.format
            && let Some(validator) = self.settings.format_validator(format)
            && !validator.is_valid(text)
        {
            errors.push(ValidationError::new(
                validator.error_kind(),
                property,
                path,
                schema,
            ));
        }
    }

    /// Bound and multiple-of checks for numeric values.
    ///
    /// Integer-flagged schemas share this path: bounds and `multipleOf`
    /// are checked once, numerically, regardless of which flag fired.
    fn validate_number(
        &self,
        value: &Value,
        flags: SchemaTypeSet,
        schema: &JsonSchema,
        property: Option<&str>,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        let Value::Number(number) = value else {
            if flags.contains(SchemaTypeSet::NUMBER) {
                errors.push(ValidationError::new(
                    ErrorKind::NumberExpected,
                    property,
                    path,
                    schema,
                ));
            }
            return;
        };

        // paired bounds, inclusivity flipped by the boolean exclusive form
        if let Some(minimum) = schema.minimum {
            let ordering = compare_number(number, minimum);
            let too_small = if schema.is_exclusive_minimum() {
                ordering != Ordering::Greater
            } else {
                ordering == Ordering::Less
            };
            if too_small {
                errors.push(ValidationError::new(
                    ErrorKind::NumberTooSmall,
                    property,
                    path,
                    schema,
                ));
            }
        }
        if let Some(maximum) = schema.maximum {
            let ordering = compare_number(number, maximum);
            let too_big = if schema.is_exclusive_maximum() {
                ordering != Ordering::Less
            } else {
                ordering == Ordering::Greater
            };
            if too_big {
                errors.push(ValidationError::new(
                    ErrorKind::NumberTooBig,
                    property,
                    path,
                    schema,
                ));
            }
        }

        // independent strict bounds (numeric exclusive form), applied in
        // addition to the paired bounds when both are present
        if let Some(bound) = schema.exclusive_minimum_value()
            && compare_number(number, bound) != Ordering::Greater
        {
            errors.push(ValidationError::new(
                ErrorKind::NumberTooSmall,
                property,
                path,
                schema,
            ));
        }
        if let Some(bound) = schema.exclusive_maximum_value()
            && compare_number(number, bound) != Ordering::Less
        {
            errors.push(ValidationError::new(
                ErrorKind::NumberTooBig,
                property,
                path,
                schema,
            ));
        }

        if let Some(multiple_of) = schema.multiple_of
            && multiple_of != 0.0
            && !is_multiple_of(number, multiple_of)
        {
            errors.push(ValidationError::new(
                ErrorKind::NumberNotMultipleOf,
                property,
                path,
                schema,
            ));
        }
    }

    /// Declared properties, required checks and object-level constraints.
    ///
    /// Runs regardless of the declared type flags; a schema explicitly
    /// typed `null` tolerates the value not being an object at all.
    fn validate_properties(
        &self,
        value: &Value,
        schema: &JsonSchema,
        path: &str,
        depth: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        let object = value.as_object();
        if object.is_none() && schema.schema_type.contains(SchemaTypeSet::NULL) {
            return;
        }

        let comparison = self.settings.property_name_comparison;
        for (name, property_schema) in &schema.properties {
            let property_path = join_path(path, name);
            let found = object.and_then(|object| find_property(object, name, comparison));
            if let Some(property_value) = found {
                let child = self.collect(
                    property_value,
                    property_schema,
                    Some(name),
                    &property_path,
                    depth + 1,
                );
                errors.extend(child);
            } else if schema.is_required(name) {
                errors.push(ValidationError::new(
                    ErrorKind::PropertyRequired,
                    Some(name),
                    &property_path,
                    property_schema,
                ));
            }
        }

        let Some(object) = object else {
            return;
        };

        if let Some(max_properties) = schema.max_properties
            && object.len() > max_properties
        {
            errors.push(ValidationError::new(
                ErrorKind::TooManyProperties,
                None,
                path,
                schema,
            ));
        }
        if let Some(min_properties) = schema.min_properties
            && object.len() < min_properties
        {
            errors.push(ValidationError::new(
                ErrorKind::TooFewProperties,
                None,
                path,
                schema,
            ));
        }

        // everything not declared in `properties` is an additional property;
        // the first matching pattern claims it, the rest fall through to the
        // additionalProperties policy
        if schema.pattern_properties.is_empty() && schema.additional_properties.is_none() {
            return;
        }
        for (name, property_value) in object {
            if schema
                .properties
                .keys()
                .any(|declared| comparison.matches(declared, name))
            {
                continue;
            }
            let property_path = join_path(path, name);

            if let Some((_, pattern_schema)) = schema
                .pattern_properties
                .iter()
                .find(|(pattern, _)| regex_matches(pattern, name))
            {
                let child = self.collect(
                    property_value,
                    pattern_schema,
                    Some(name),
                    &property_path,
                    depth + 1,
                );
                if !child.is_empty() {
                    errors.push(ValidationError::grouped_by_schema(
                        ErrorKind::AdditionalPropertiesNotValid,
                        Some(name),
                        &property_path,
                        schema,
                        vec![(Arc::clone(pattern_schema), child)],
                    ));
                }
                continue;
            }

            if let Some(additional_schema) = schema.additional_properties_schema() {
                let child = self.collect(
                    property_value,
                    additional_schema,
                    Some(name),
                    &property_path,
                    depth + 1,
                );
                if !child.is_empty() {
                    errors.push(ValidationError::grouped_by_schema(
                        ErrorKind::AdditionalPropertiesNotValid,
                        Some(name),
                        &property_path,
                        schema,
                        vec![(Arc::clone(additional_schema), child)],
                    ));
                }
            } else if !schema.allow_additional_properties() {
                errors.push(ValidationError::new(
                    ErrorKind::NoAdditionalPropertiesAllowed,
                    Some(name),
                    &property_path,
                    schema,
                ));
            }
        }
    }
}

/// Extend a JSON-pointer path with a property step.
fn join_path(path: &str, name: &str) -> String {
    if path == "#" {
        format!("#/{name}")
    } else {
        format!("{path}/{name}")
    }
}

fn find_property<'a>(
    object: &'a Map<String, Value>,
    name: &str,
    comparison: PropertyNameComparison,
) -> Option<&'a Value> {
    match comparison {
        PropertyNameComparison::Exact => object.get(name),
        PropertyNameComparison::IgnoreCase => object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value),
    }
}

fn regex_matches(pattern: &str, name: &str) -> bool {
    match Regex::new(pattern) {
        Ok(regex) => regex.is_match(name),
        Err(error) => {
            tracing::warn!(%pattern, %error, "skipping unusable patternProperties expression");
            false
        }
    }
}

fn decimal_of(value: &Number) -> Option<Decimal> {
    if let Some(integer) = value.as_i64() {
        Decimal::from_i64(integer)
    } else if let Some(unsigned) = value.as_u64() {
        Decimal::from_u64(unsigned)
    } else {
        value.as_f64().and_then(Decimal::from_f64)
    }
}

/// Compare a JSON number to a schema bound: exact decimal arithmetic when
/// both operands are representable, `f64` otherwise.
fn compare_number(value: &Number, bound: f64) -> Ordering {
    if let (Some(value), Some(bound)) = (decimal_of(value), Decimal::from_f64(bound)) {
        value.cmp(&bound)
    } else {
        let value = value.as_f64().unwrap_or(f64::NAN);
        value.partial_cmp(&bound).unwrap_or(Ordering::Equal)
    }
}

/// Whether `value` is an exact multiple of `multiple`, in decimal
/// arithmetic when representable, with an epsilon-tolerant float fallback.
fn is_multiple_of(value: &Number, multiple: f64) -> bool {
    if let (Some(value), Some(multiple)) = (decimal_of(value), Decimal::from_f64(multiple))
        && multiple != Decimal::ZERO
    {
        return value % multiple == Decimal::ZERO;
    }
    let value = value.as_f64().unwrap_or(0.0);
    let remainder = (value % multiple).abs();
    remainder < 1e-9 || (multiple.abs() - remainder) < 1e-9
}
