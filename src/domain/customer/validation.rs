//! Customer validation

use thiserror::Error;

/// Errors that can occur during customer validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CustomerValidationError {
    #[error("Customer name cannot be empty")]
    EmptyName,

    #[error("Customer name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Customer email cannot be empty")]
    EmptyEmail,

    #[error("Customer email is not a valid address")]
    InvalidEmail,
}

const MAX_CUSTOMER_NAME_LENGTH: usize = 100;

pub fn validate_customer_name(name: &str) -> Result<(), CustomerValidationError> {
    if name.trim().is_empty() {
        return Err(CustomerValidationError::EmptyName);
    }

    if name.len() > MAX_CUSTOMER_NAME_LENGTH {
        return Err(CustomerValidationError::NameTooLong(
            MAX_CUSTOMER_NAME_LENGTH,
        ));
    }

    Ok(())
}

/// Validate a customer email address.
///
/// Deliberately shallow: one '@' with a non-empty local part and a domain
/// containing a dot. Deliverability is the mail system's problem.
pub fn validate_customer_email(email: &str) -> Result<(), CustomerValidationError> {
    if email.trim().is_empty() {
        return Err(CustomerValidationError::EmptyEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(CustomerValidationError::InvalidEmail);
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(CustomerValidationError::InvalidEmail);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_customer_name() {
        assert!(validate_customer_name("Ada Lovelace").is_ok());
    }

    #[test]
    fn test_empty_customer_name() {
        assert_eq!(
            validate_customer_name(""),
            Err(CustomerValidationError::EmptyName)
        );
    }

    #[test]
    fn test_customer_name_too_long() {
        let long_name = "a".repeat(101);
        assert_eq!(
            validate_customer_name(&long_name),
            Err(CustomerValidationError::NameTooLong(100))
        );
    }

    #[test]
    fn test_valid_email() {
        assert!(validate_customer_email("ada@example.com").is_ok());
        assert!(validate_customer_email("a.b+c@mail.example.org").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(
            validate_customer_email(""),
            Err(CustomerValidationError::EmptyEmail)
        );
        assert_eq!(
            validate_customer_email("not-an-email"),
            Err(CustomerValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_customer_email("@example.com"),
            Err(CustomerValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_customer_email("ada@localhost"),
            Err(CustomerValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_customer_email("ada@ex@ample.com"),
            Err(CustomerValidationError::InvalidEmail)
        );
    }
}
