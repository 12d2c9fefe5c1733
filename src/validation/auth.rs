use garde::Validate;

use crate::error::{ClientError, FieldErrors, Result};
use crate::models::user::{LoginCredentials, RegisterData};

/// The minimum password length accepted by the registration form.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Rejects empty and whitespace-only values.
pub fn not_blank(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("This field may not be blank."));
    }

    Ok(())
}

/// Validates a password's length.
pub fn password_length(value: &str, _context: &()) -> garde::Result {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(garde::Error::new(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

/// Validates that the confirmation equals the password.
pub fn matches_password<'a>(password: &'a str) -> impl FnOnce(&str, &()) -> garde::Result + 'a {
    move |value, _| {
        if value != password {
            return Err(garde::Error::new("Passwords don't match"));
        }

        Ok(())
    }
}

/// Collects a garde report into the field-error map the server also uses.
fn into_field_errors(report: garde::Report) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (path, error) in report.iter() {
        let field = path.to_string();
        let field = if field.is_empty() {
            "non_field_errors".to_string()
        } else {
            field
        };
        errors
            .entry(field)
            .or_default()
            .push(error.message().to_string());
    }
    errors
}

/// Validates a registration form.
///
/// # Arguments
///
/// * `data` - The registration form.
///
/// # Returns
///
/// A `Result<()>`; on failure a `ClientError::InvalidInput` with one entry
/// per offending field.
pub fn validate_registration(data: &RegisterData) -> Result<()> {
    data.validate().map_err(|report| {
        let errors = into_field_errors(report);
        tracing::debug!("Registration form rejected: {:?}", errors.keys());
        ClientError::InvalidInput(errors)
    })
}

/// Validates login credentials.
///
/// # Arguments
///
/// * `credentials` - The login form.
///
/// # Returns
///
/// A `Result<()>` indicating whether both fields are filled in.
pub fn validate_login(credentials: &LoginCredentials) -> Result<()> {
    credentials
        .validate()
        .map_err(|report| ClientError::InvalidInput(into_field_errors(report)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterData {
        RegisterData {
            username: "passenger1".into(),
            email: "passenger1@example.com".into(),
            password: "secret1".into(),
            password_confirm: "secret1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_complete_registration() {
        assert!(validate_registration(&registration()).is_ok());
    }

    #[test]
    fn reports_each_invalid_field() {
        let data = RegisterData {
            username: "   ".into(),
            password: "abc".into(),
            password_confirm: "abd".into(),
            ..registration()
        };

        let errors = validate_registration(&data).unwrap_err().field_errors();
        assert_eq!(errors["username"], vec!["This field may not be blank.".to_string()]);
        assert_eq!(
            errors["password"],
            vec!["Password must be at least 6 characters".to_string()]
        );
        assert_eq!(errors["password_confirm"], vec!["Passwords don't match".to_string()]);
        assert!(!errors.contains_key("email"));
    }

    #[test]
    fn rejects_malformed_email() {
        let data = RegisterData {
            email: "not-an-email".into(),
            ..registration()
        };

        let errors = validate_registration(&data).unwrap_err().field_errors();
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(&LoginCredentials::new("staff1", ""))
            .unwrap_err()
            .field_errors();
        assert!(errors.contains_key("password"));
        assert!(!errors.contains_key("username"));
    }
}
