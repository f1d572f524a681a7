//! Validator configuration.

use std::fmt;

use super::formats::{self, FormatValidator};

/// How property names are matched against the instance object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyNameComparison {
    /// Byte-for-byte equality
    #[default]
    Exact,
    /// ASCII case-insensitive equality
    IgnoreCase,
}

impl PropertyNameComparison {
    /// Whether `a` and `b` name the same property.
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            Self::Exact => a == b,
            Self::IgnoreCase => a.eq_ignore_ascii_case(b),
        }
    }
}

/// Validation configuration options.
///
/// Constructed per validator; the format registry is the extension point a
/// consumer uses to add or override format validators.
pub struct ValidatorSettings {
    /// Registered format validators, consulted newest-first
    format_validators: Vec<Box<dyn FormatValidator>>,
    /// Property name matching mode (default: exact)
    pub property_name_comparison: PropertyNameComparison,
    /// Maximum recursion depth; `None` means unbounded (default)
    pub max_recursion_depth: Option<usize>,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            format_validators: formats::built_in_validators(),
            property_name_comparison: PropertyNameComparison::default(),
            max_recursion_depth: None,
        }
    }
}

impl ValidatorSettings {
    /// Create settings with the built-in format validators registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a format validator.
    ///
    /// Later registrations take precedence, so a custom validator overrides
    /// the built-in for the same format name.
    pub fn add_format_validator(&mut self, validator: Box<dyn FormatValidator>) {
        self.format_validators.push(validator);
    }

    /// Validator registered for `format`, if any.
    pub fn format_validator(&self, format: &str) -> Option<&dyn FormatValidator> {
        self.format_validators
            .iter()
            .rev()
            .find(|validator| validator.format() == format)
            .map(|validator| validator.as_ref())
    }
}

impl fmt::Debug for ValidatorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSettings")
            .field("format_validators", &self.format_validators.len())
            .field("property_name_comparison", &self.property_name_comparison)
            .field("max_recursion_depth", &self.max_recursion_depth)
            .finish()
    }
}
