//! Form field sanitization and validation.
//!
//! Every form field gets an ordered rule chain. Sanitizers run in chain
//! position whether or not an earlier validator failed, so the echoed value
//! is always safe to redisplay; only the first failing validator's message
//! is kept per field. Fields are checked independently — one field's
//! failure never short-circuits another's chain.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").unwrap());

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Sanitization and validation chain for one form field
#[derive(Debug)]
pub struct Field {
    name: &'static str,
    value: String,
    error: Option<String>,
}

impl Field {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            error: None,
        }
    }

    /// Strip leading and trailing whitespace
    pub fn trim(mut self) -> Self {
        self.value = self.value.trim().to_string();
        self
    }

    /// Escape markup-significant characters
    pub fn escape(mut self) -> Self {
        self.value = tera::escape_html(&self.value);
        self
    }

    /// The value must be non-empty at this point in the chain
    pub fn required(self, message: &str) -> Self {
        let ok = !self.value.is_empty();
        self.check(ok, message)
    }

    pub fn min_length(self, min: usize, message: &str) -> Self {
        let ok = self.value.chars().count() >= min;
        self.check(ok, message)
    }

    pub fn max_length(self, max: usize, message: &str) -> Self {
        let ok = self.value.chars().count() <= max;
        self.check(ok, message)
    }

    /// ASCII letters and digits only
    pub fn alphanumeric(self, message: &str) -> Self {
        let ok = ALPHANUMERIC.is_match(&self.value);
        self.check(ok, message)
    }

    /// Empty passes; anything else must be a `YYYY-MM-DD` calendar date
    pub fn optional_iso_date(self, message: &str) -> Self {
        let ok = self.value.is_empty() || parse_optional_date(&self.value).is_some();
        self.check(ok, message)
    }

    fn check(mut self, ok: bool, message: &str) -> Self {
        if !ok && self.error.is_none() {
            self.error = Some(message.to_string());
        }
        self
    }

    /// Record any failure in `errors` and yield the sanitized value
    pub fn finish(self, errors: &mut Vec<FieldError>) -> String {
        if let Some(message) = self.error {
            errors.push(FieldError {
                field: self.name.to_string(),
                message,
            });
        }
        self.value
    }
}

/// Parse an optional `YYYY-MM-DD` form value; empty or malformed input maps to None
pub fn parse_optional_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a reference id submitted as a form value
pub fn parse_ref_id(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}
