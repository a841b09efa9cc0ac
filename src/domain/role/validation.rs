//! Employee role validation

use thiserror::Error;

/// Errors that can occur during role validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoleValidationError {
    #[error("Role name cannot be empty")]
    EmptyName,

    #[error("Role name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_ROLE_NAME_LENGTH: usize = 50;

/// Validate an employee role name
pub fn validate_role_name(name: &str) -> Result<(), RoleValidationError> {
    if name.trim().is_empty() {
        return Err(RoleValidationError::EmptyName);
    }

    if name.len() > MAX_ROLE_NAME_LENGTH {
        return Err(RoleValidationError::NameTooLong(MAX_ROLE_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_role_name() {
        assert!(validate_role_name("waiter").is_ok());
        assert!(validate_role_name("head-waiter").is_ok());
        assert!(validate_role_name("Shift Manager").is_ok());
    }

    #[test]
    fn test_empty_role_name() {
        assert_eq!(validate_role_name(""), Err(RoleValidationError::EmptyName));
        assert_eq!(
            validate_role_name("   "),
            Err(RoleValidationError::EmptyName)
        );
    }

    #[test]
    fn test_role_name_too_long() {
        let long_name = "a".repeat(51);
        assert_eq!(
            validate_role_name(&long_name),
            Err(RoleValidationError::NameTooLong(50))
        );
    }
}
