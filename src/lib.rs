//! jsonschema-engine - JSON Schema validation library.
//!
//! This crate validates JSON values against draft-04-style JSON Schema
//! documents and produces a complete, order-stable list of structured
//! validation errors localized by JSON-pointer path. The schema tree is
//! consumed read-only; `$ref` resolution is the job of an external
//! resolver, the engine always works on the dereferenced form of a node.
//!
//! # Quick Start
//!
//! ```
//! use jsonschema_engine::{JsonSchema, SchemaValidator};
//! use serde_json::json;
//!
//! let schema = JsonSchema::from_json(r#"{"type": "string", "minLength": 3}"#)?;
//! let validator = SchemaValidator::new();
//!
//! let errors = validator.validate(&json!("ab"), &schema);
//! assert_eq!(errors.len(), 1);
//! assert!(validator.validate(&json!("abc"), &schema).is_empty());
//! # Ok::<(), jsonschema_engine::SchemaError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - schema object model ([`JsonSchema`], [`SchemaTypeSet`])
//! - [`validation`] - validator core, error taxonomy, formats, settings
//! - [`error`] - fatal error type for the parsing entry points

pub mod error;
pub mod types;
pub mod validation;

// Error exports
pub use error::{Result, SchemaError};

// Type exports
pub use types::{AdditionalSchema, BoundOrFlag, ItemsSchema, JsonSchema, SchemaTypeSet};

// Validation exports
pub use validation::{
    ErrorChildren, ErrorKind, FormatValidator, PropertyNameComparison, SchemaValidator,
    ValidationError, ValidatorSettings,
};

use serde_json::Value;

/// Validates `value` against `schema` with default settings.
pub fn is_valid(schema: &JsonSchema, value: &Value) -> bool {
    SchemaValidator::new().validate(value, schema).is_empty()
}
