//! Desk validation

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeskValidationError {
    #[error("Desk name cannot be empty")]
    EmptyName,

    #[error("Desk name cannot exceed {0} characters")]
    NameTooLong(usize),
}

const MAX_DESK_NAME_LENGTH: usize = 30;

pub fn validate_desk_name(name: &str) -> Result<(), DeskValidationError> {
    if name.trim().is_empty() {
        return Err(DeskValidationError::EmptyName);
    }

    if name.len() > MAX_DESK_NAME_LENGTH {
        return Err(DeskValidationError::NameTooLong(MAX_DESK_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_desk_name() {
        assert!(validate_desk_name("terrace-1").is_ok());
        assert!(validate_desk_name("Window 4").is_ok());
    }

    #[test]
    fn test_empty_desk_name() {
        assert_eq!(validate_desk_name(""), Err(DeskValidationError::EmptyName));
    }

    #[test]
    fn test_desk_name_too_long() {
        let long_name = "d".repeat(31);
        assert_eq!(
            validate_desk_name(&long_name),
            Err(DeskValidationError::NameTooLong(30))
        );
    }
}
