//! Validation utilities.

use crate::{FieldError, UserbookError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `UserbookError` on failure.
    fn validate_request(&self) -> Result<(), UserbookError> {
        self.validate().map_err(validation_errors_to_userbook_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
///
/// Output is sorted by field name so responses are stable.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| default_message(field, &error.code), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `UserbookError`.
#[must_use]
pub fn validation_errors_to_userbook_error(errors: ValidationErrors) -> UserbookError {
    UserbookError::Validation(field_errors(&errors))
}

fn default_message(field: &str, code: &str) -> String {
    let name = field.replace('_', " ");
    match code {
        "required" | "not_blank" => format!("The {} field is required.", name),
        "email" => format!("The {} field must be a valid email address.", name),
        _ => format!("The {} field is invalid.", name),
    }
}

/// Common validation functions.
///
/// Format rules accept blank input so a missing value is reported once,
/// by [`not_blank`](rules::not_blank), rather than by every rule on the field.
pub mod rules {
    use validator::{ValidateEmail, ValidationError};

    /// Minimum password length.
    pub const PASSWORD_MIN_LENGTH: usize = 8;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates an email address.
    pub fn email_address(value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        if value.is_empty() || value.validate_email() {
            return Ok(());
        }
        Err(ValidationError::new("email"))
    }

    /// Validates a required email address.
    pub fn required_email(value: &str) -> Result<(), ValidationError> {
        not_blank(value)?;
        email_address(value)
    }

    /// Validates the minimum password length, counted in characters.
    pub fn password_length(value: &str) -> Result<(), ValidationError> {
        if value.is_empty() || value.chars().count() >= PASSWORD_MIN_LENGTH {
            return Ok(());
        }
        Err(ValidationError::new("min").with_message(
            format!("The password field must be at least {} characters.", PASSWORD_MIN_LENGTH).into(),
        ))
    }

    /// Validates a required password of at least [`PASSWORD_MIN_LENGTH`] characters.
    pub fn required_password(value: &str) -> Result<(), ValidationError> {
        not_blank(value)?;
        password_length(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(custom(function = "rules::not_blank"))]
        first_name: String,
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, message = "The password field must be at least 8 characters."))]
        password: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(rules::not_blank("Ada").is_ok());
        assert!(rules::not_blank("   ").is_err());
        assert!(rules::not_blank("").is_err());
    }

    #[test]
    fn test_validate_request_collects_every_field() {
        let signup = Signup {
            first_name: " ".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let err = signup.validate_request().unwrap_err();
        let UserbookError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["email", "first_name", "password"]);
        assert_eq!(fields[0].message, "The email field must be a valid email address.");
        assert_eq!(fields[1].message, "The first name field is required.");
        assert_eq!(fields[2].message, "The password field must be at least 8 characters.");
    }

    #[test]
    fn test_format_rules_skip_blank_values() {
        assert!(rules::email_address("").is_ok());
        assert!(rules::email_address("ada@example.com").is_ok());
        assert!(rules::email_address("ada-at-example").is_err());
        assert!(rules::password_length("").is_ok());
        assert!(rules::password_length("1234567").is_err());
        assert!(rules::password_length("12345678").is_ok());
        assert_eq!(rules::required_email("").unwrap_err().code, "not_blank");
        assert_eq!(rules::required_password("").unwrap_err().code, "not_blank");
        assert_eq!(rules::required_password("short").unwrap_err().code, "min");
    }

    #[test]
    fn test_valid_request_passes() {
        let signup = Signup {
            first_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(signup.validate_request().is_ok());
    }
}
