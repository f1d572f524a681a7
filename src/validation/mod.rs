//! JSON Schema validation engine.
//!
//! - [`validator`] - the recursive validation core
//! - [`errors`] - the validation error taxonomy
//! - [`formats`] - format validators for the `format` keyword
//! - [`settings`] - validator configuration

pub mod errors;
pub mod formats;
pub mod settings;
pub mod validator;

pub use errors::{ErrorChildren, ErrorKind, ValidationError};
pub use formats::FormatValidator;
pub use settings::{PropertyNameComparison, ValidatorSettings};
pub use validator::SchemaValidator;
