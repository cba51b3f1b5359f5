//! Validation and parse errors for catalog records

use std::fmt;

/// One rejected field of a form or draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as it appears on the wire
    pub field: &'static str,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    /// Create field error
    #[inline]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found while validating a payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", format_fields(.fields))]
pub struct ValidationError {
    /// Rejected fields, in form order
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Check whether `field` was rejected
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// Turn collected field errors into a result
    pub fn check(fields: Vec<FieldError>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Self { fields })
        }
    }
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unknown enum value while parsing query or status strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseError {
    /// What was being parsed
    pub kind: &'static str,
    /// Offending input
    pub value: String,
}

impl ParseError {
    /// Create parse error
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_fields() {
        let err = ValidationError::check(vec![
            FieldError::new("name", "required"),
            FieldError::new("price", "must be positive"),
        ])
        .unwrap_err();

        assert!(err.has_field("name"));
        assert!(err.has_field("price"));
        assert!(!err.has_field("stock"));
        assert_eq!(
            err.to_string(),
            "validation failed: name: required, price: must be positive"
        );
    }

    #[test]
    fn validation_check_empty_is_ok() {
        assert!(ValidationError::check(Vec::new()).is_ok());
    }
}
