//! Foundation validation errors.

use thiserror::Error;

/// Validation failure for a single field of a domain value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for '{field}': {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn empty_field(field: &'static str) -> Self {
        Self::new(field, "must not be empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_field_and_message() {
        let err = ValidationError::new("total_price", "must be positive");
        assert_eq!(
            err.to_string(),
            "validation failed for 'total_price': must be positive"
        );
    }

    #[test]
    fn empty_field_has_standard_message() {
        let err = ValidationError::empty_field("user_id");
        assert_eq!(err.field, "user_id");
        assert_eq!(err.message, "must not be empty");
    }
}
