//! Validation error taxonomy.
//!
//! Rule violations are data: every failed constraint becomes a
//! [`ValidationError`] appended to the returned collection. Composite
//! failures (combinators, array items, additional properties, multi-type
//! dispatch) carry the nested error lists that explain them, keyed by the
//! candidate sub-schema or type flag in declaration order.

use std::fmt;
use std::sync::Arc;

use crate::types::{JsonSchema, SchemaTypeSet};

/// Enumerated failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Combinators
    NotAnyOf,
    NotAllOf,
    NotOneOf,
    ExcludedSchemaValidates,
    NoTypeValidates,

    // Type mismatches
    StringExpected,
    NumberExpected,
    IntegerExpected,
    BooleanExpected,
    NullExpected,
    ObjectExpected,
    ArrayExpected,

    // String constraints
    PatternMismatch,
    StringTooShort,
    StringTooLong,
    DateTimeExpected,
    DateExpected,
    TimeExpected,
    TimeSpanExpected,
    UriExpected,
    EmailExpected,
    IpV4Expected,
    IpV6Expected,
    GuidExpected,
    HostnameExpected,
    Base64Expected,

    // Numeric constraints
    NumberTooSmall,
    NumberTooBig,
    NumberNotMultipleOf,

    // Array constraints
    TooFewItems,
    TooManyItems,
    ItemsNotUnique,
    ArrayItemNotValid,
    AdditionalItemNotValid,
    TooManyItemsInTuple,

    // Object constraints
    PropertyRequired,
    TooManyProperties,
    TooFewProperties,
    AdditionalPropertiesNotValid,
    NoAdditionalPropertiesAllowed,

    // Enumeration
    NotInEnumeration,

    // Hardening: configured recursion limit reached
    RecursionLimitExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Nested error collections of a composite failure.
///
/// The closed set of shapes a validation error can take: a plain constraint
/// violation, a group keyed by the rejecting sub-schemas, or a group keyed
/// by the candidate type flags of a multi-type schema.
#[derive(Debug, Clone, Default)]
pub enum ErrorChildren {
    /// Plain constraint violation
    #[default]
    None,
    /// Failed sub-schema branches (`anyOf`/`allOf`/`oneOf`, array items,
    /// additional and pattern properties)
    PerSchema(Vec<(Arc<JsonSchema>, Vec<ValidationError>)>),
    /// Failed candidate types of a multi-type schema
    PerType(Vec<(SchemaTypeSet, Vec<ValidationError>)>),
}

/// A single validation failure, localized by JSON-pointer path.
///
/// Created at the point of failure and never mutated afterwards; ownership
/// flows up the recursion into the caller's list.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Failure reason
    pub kind: ErrorKind,
    /// Property or item name at the failure site, `None` at the root
    pub property: Option<String>,
    /// JSON-pointer-style path (`#/a/b[2]`), `#` at the root
    pub path: String,
    /// Schema node whose rule was violated
    pub schema: Box<JsonSchema>,
    /// Nested error collections for composite failures
    pub children: ErrorChildren,
}

impl ValidationError {
    /// Plain constraint violation.
    pub fn new(
        kind: ErrorKind,
        property: Option<&str>,
        path: &str,
        schema: &JsonSchema,
    ) -> Self {
        Self {
            kind,
            property: property.map(str::to_owned),
            path: path.to_owned(),
            schema: Box::new(schema.clone()),
            children: ErrorChildren::None,
        }
    }

    /// Composite failure grouped by the sub-schemas that rejected the value.
    pub fn grouped_by_schema(
        kind: ErrorKind,
        property: Option<&str>,
        path: &str,
        schema: &JsonSchema,
        groups: Vec<(Arc<JsonSchema>, Vec<ValidationError>)>,
    ) -> Self {
        Self {
            children: ErrorChildren::PerSchema(groups),
            ..Self::new(kind, property, path, schema)
        }
    }

    /// Composite failure grouped by candidate type.
    pub fn grouped_by_type(
        kind: ErrorKind,
        property: Option<&str>,
        path: &str,
        schema: &JsonSchema,
        groups: Vec<(SchemaTypeSet, Vec<ValidationError>)>,
    ) -> Self {
        Self {
            children: ErrorChildren::PerType(groups),
            ..Self::new(kind, property, path, schema)
        }
    }

    /// Whether this error carries nested error collections.
    pub fn is_composite(&self) -> bool {
        !matches!(self.children, ErrorChildren::None)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        write!(f, "{pad}{}: {}", self.kind, self.path)?;
        match &self.children {
            ErrorChildren::None => Ok(()),
            ErrorChildren::PerSchema(groups) => {
                for (_, errors) in groups {
                    writeln!(f, "\n{pad}{{")?;
                    for error in errors {
                        error.fmt_indented(f, indent + 1)?;
                        writeln!(f)?;
                    }
                    write!(f, "{pad}}}")?;
                }
                Ok(())
            }
            ErrorChildren::PerType(groups) => {
                for (type_flag, errors) in groups {
                    writeln!(f, "\n{pad}{type_flag} {{")?;
                    for error in errors {
                        error.fmt_indented(f, indent + 1)?;
                        writeln!(f)?;
                    }
                    write!(f, "{pad}}}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_display() {
        let schema = JsonSchema::default();
        let error = ValidationError::new(
            ErrorKind::StringTooShort,
            Some("name"),
            "#/name",
            &schema,
        );
        assert_eq!(format!("{error}"), "StringTooShort: #/name");
        assert!(!error.is_composite());
    }

    #[test]
    fn test_composite_display_renders_nested_blocks() {
        let schema = Arc::new(JsonSchema::default());
        let nested = ValidationError::new(
            ErrorKind::IntegerExpected,
            None,
            "#/value",
            &schema,
        );
        let error = ValidationError::grouped_by_schema(
            ErrorKind::NotAnyOf,
            None,
            "#/value",
            &schema,
            vec![(Arc::clone(&schema), vec![nested])],
        );

        let rendered = format!("{error}");
        assert!(rendered.starts_with("NotAnyOf: #/value"));
        assert!(rendered.contains('{'));
        assert!(rendered.contains("IntegerExpected: #/value"));
        assert!(rendered.contains('}'));
    }

    #[test]
    fn test_per_type_display_names_the_candidate() {
        let schema = Arc::new(JsonSchema::default());
        let nested = ValidationError::new(ErrorKind::StringExpected, None, "#", &schema);
        let error = ValidationError::grouped_by_type(
            ErrorKind::NoTypeValidates,
            None,
            "#",
            &schema,
            vec![(SchemaTypeSet::STRING, vec![nested])],
        );

        let rendered = format!("{error}");
        assert!(rendered.contains("string {"));
    }

    #[test]
    fn test_error_kind_display_is_variant_name() {
        assert_eq!(format!("{}", ErrorKind::NotInEnumeration), "NotInEnumeration");
        assert_eq!(format!("{}", ErrorKind::IpV6Expected), "IpV6Expected");
    }
}
