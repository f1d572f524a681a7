//! Format validators for the `format` keyword.
//!
//! Each validator is a stateless predicate over the string value, keyed by
//! its format name. The engine looks the name up in the settings registry
//! and silently ignores formats no validator is registered for.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;
use uuid::Uuid;

use super::errors::ErrorKind;

/// A named predicate checking a string against a semantic format.
pub trait FormatValidator: Send + Sync {
    /// Format name this validator responds to.
    fn format(&self) -> &'static str;

    /// Error kind reported when the check fails.
    fn error_kind(&self) -> ErrorKind;

    /// Whether `value` conforms to the format.
    fn is_valid(&self, value: &str) -> bool;
}

// [-][d.]hh:mm:ss[.fffffff]
static TIME_SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(\d+\.)?\d{1,2}:\d{2}:\d{2}(\.\d{1,7})?$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap());

// RFC 1123 labels: alphanumeric, inner hyphens, at most 63 chars each
static HOSTNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .unwrap()
});

static BASE64_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").unwrap());

fn is_base64(value: &str) -> bool {
    value.len() % 4 == 0 && BASE64_REGEX.is_match(value)
}

/// `date-time`: RFC 3339 timestamp, with a naive fallback for values
/// without an offset.
pub struct DateTimeFormatValidator;

impl FormatValidator for DateTimeFormatValidator {
    fn format(&self) -> &'static str {
        "date-time"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::DateTimeExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        DateTime::parse_from_rfc3339(value).is_ok()
            || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
    }
}

/// `date`: full-date, `YYYY-MM-DD`.
pub struct DateFormatValidator;

impl FormatValidator for DateFormatValidator {
    fn format(&self) -> &'static str {
        "date"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::DateExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
    }
}

/// `time`: `HH:MM:SS` with an optional fractional part.
pub struct TimeFormatValidator;

impl FormatValidator for TimeFormatValidator {
    fn format(&self) -> &'static str {
        "time"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::TimeExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        NaiveTime::parse_from_str(value, "%H:%M:%S%.f").is_ok()
    }
}

/// `time-span`: `[-][d.]hh:mm:ss[.fffffff]` durations.
pub struct TimeSpanFormatValidator;

impl FormatValidator for TimeSpanFormatValidator {
    fn format(&self) -> &'static str {
        "time-span"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::TimeSpanExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        TIME_SPAN_REGEX.is_match(value)
    }
}

/// `uri`: absolute URI.
pub struct UriFormatValidator;

impl FormatValidator for UriFormatValidator {
    fn format(&self) -> &'static str {
        "uri"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::UriExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        Url::parse(value).is_ok()
    }
}

/// `email`: local-part@domain.
pub struct EmailFormatValidator;

impl FormatValidator for EmailFormatValidator {
    fn format(&self) -> &'static str {
        "email"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::EmailExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        EMAIL_REGEX.is_match(value)
    }
}

/// `ipv4`: dotted-quad address.
pub struct IpV4FormatValidator;

impl FormatValidator for IpV4FormatValidator {
    fn format(&self) -> &'static str {
        "ipv4"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::IpV4Expected
    }

    fn is_valid(&self, value: &str) -> bool {
        Ipv4Addr::from_str(value).is_ok()
    }
}

/// `ipv6` address.
pub struct IpV6FormatValidator;

impl FormatValidator for IpV6FormatValidator {
    fn format(&self) -> &'static str {
        "ipv6"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::IpV6Expected
    }

    fn is_valid(&self, value: &str) -> bool {
        Ipv6Addr::from_str(value).is_ok()
    }
}

/// `guid`: hyphenated or plain UUID.
pub struct GuidFormatValidator;

impl FormatValidator for GuidFormatValidator {
    fn format(&self) -> &'static str {
        "guid"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::GuidExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        Uuid::parse_str(value).is_ok()
    }
}

/// `hostname`: RFC 1123 host name.
pub struct HostnameFormatValidator;

impl FormatValidator for HostnameFormatValidator {
    fn format(&self) -> &'static str {
        "hostname"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::HostnameExpected
    }

    fn is_valid(&self, value: &str) -> bool {
        value.len() <= 253 && HOSTNAME_REGEX.is_match(value)
    }
}

/// `byte`: base64-encoded octets.
pub struct ByteFormatValidator;

impl FormatValidator for ByteFormatValidator {
    fn format(&self) -> &'static str {
        "byte"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::Base64Expected
    }

    fn is_valid(&self, value: &str) -> bool {
        is_base64(value)
    }
}

/// `base64`: alias of `byte`.
pub struct Base64FormatValidator;

impl FormatValidator for Base64FormatValidator {
    fn format(&self) -> &'static str {
        "base64"
    }

    fn error_kind(&self) -> ErrorKind {
        ErrorKind::Base64Expected
    }

    fn is_valid(&self, value: &str) -> bool {
        is_base64(value)
    }
}

/// The default format validator registry.
pub(crate) fn built_in_validators() -> Vec<Box<dyn FormatValidator>> {
    vec![
        Box::new(DateTimeFormatValidator),
        Box::new(DateFormatValidator),
        Box::new(TimeFormatValidator),
        Box::new(TimeSpanFormatValidator),
        Box::new(UriFormatValidator),
        Box::new(EmailFormatValidator),
        Box::new(IpV4FormatValidator),
        Box::new(IpV6FormatValidator),
        Box::new(GuidFormatValidator),
        Box::new(HostnameFormatValidator),
        Box::new(ByteFormatValidator),
        Box::new(Base64FormatValidator),
    ]
}
