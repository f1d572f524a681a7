//! Error types for the schema parsing entry points.
//!
//! Rule violations found during validation are *data* (`ValidationError`
//! values in the returned collection), never `Err`. The only fatal
//! conditions are malformed inputs that prevent validation from starting.

use thiserror::Error;

/// Result type for fallible entry points.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Fatal errors raised by the schema parsing entry points.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// JSON text that could not be parsed
    #[error("JSON parsing error: {message}")]
    Parse { message: String },

    /// Schema document with an invalid structure
    #[error("Invalid schema structure: {message}")]
    InvalidSchema { message: String },
}

impl SchemaError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::invalid_schema("unknown JSON type: whatever");
        let message = format!("{err}");
        assert!(message.contains("Invalid schema structure"));
        assert!(message.contains("whatever"));
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json");
        assert!(json_err.is_err());

        let schema_err: SchemaError = json_err.unwrap_err().into();
        assert!(matches!(schema_err, SchemaError::Parse { .. }));
    }
}
