//! Request validation utilities.

use crate::InfoError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns an `InfoError` on failure.
    fn validate_request(&self) -> Result<(), InfoError> {
        self.validate().map_err(validation_errors_to_info_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `InfoError`.
#[must_use]
pub fn validation_errors_to_info_error(errors: ValidationErrors) -> InfoError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.sort();

    InfoError::Validation(messages.join("; "))
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that an amount is not zero.
    pub fn non_zero(value: i64) -> Result<(), ValidationError> {
        if value == 0 {
            return Err(ValidationError::new("non_zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Entry {
        #[validate(custom(function = "rules::not_blank"))]
        tx_id: String,
        #[validate(length(max = 4, message = "too long"))]
        memo: String,
    }

    #[test]
    fn test_valid_request() {
        let entry = Entry {
            tx_id: "tx-1".to_string(),
            memo: "ok".to_string(),
        };
        assert!(entry.validate_request().is_ok());
    }

    #[test]
    fn test_errors_are_collected() {
        let entry = Entry {
            tx_id: "  ".to_string(),
            memo: "much too long".to_string(),
        };
        let err = entry.validate_request().unwrap_err();
        assert!(matches!(
            err,
            InfoError::Validation(msg) if msg == "memo: too long; tx_id: not_blank"
        ));
    }

    #[test]
    fn test_rules() {
        assert!(rules::not_blank("x").is_ok());
        assert!(rules::not_blank(" ").is_err());
        assert!(rules::non_zero(-5).is_ok());
        assert!(rules::non_zero(0).is_err());
    }
}
