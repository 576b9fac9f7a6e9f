// Registration payload validation

use thiserror::Error;

use crate::auth::models::RegisterRequest;

/// Passwords of this many UTF-16 code units or fewer are rejected.
pub const MAX_REJECTED_PASSWORD_LENGTH: usize = 5;

/// Reason a registration payload was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("first name must not be empty")]
    EmptyFirstName,
    #[error("last name must not be empty")]
    EmptyLastName,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Fields of a registration that passed every check
#[derive(Debug)]
pub struct ValidRegistration {
    pub user_name: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

fn required(field: Option<String>, missing: RegistrationError) -> Result<String, RegistrationError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(missing),
    }
}

/// Validate a registration payload.
///
/// Checks run in a fixed order and the first failure is returned:
/// presence of username, password, first name and last name, then password
/// length, then that the confirmation matches.
pub fn validate_registration(request: RegisterRequest) -> Result<ValidRegistration, RegistrationError> {
    let RegisterRequest {
        user_name,
        password,
        confirm_password,
        first_name,
        last_name,
    } = request;

    let user_name = required(user_name, RegistrationError::EmptyUsername)?;
    let password = required(password, RegistrationError::EmptyPassword)?;
    let first_name = required(first_name, RegistrationError::EmptyFirstName)?;
    let last_name = required(last_name, RegistrationError::EmptyLastName)?;

    // length in UTF-16 code units
    if password.encode_utf16().count() <= MAX_REJECTED_PASSWORD_LENGTH {
        return Err(RegistrationError::PasswordTooShort);
    }

    if confirm_password.as_deref() != Some(password.as_str()) {
        return Err(RegistrationError::PasswordMismatch);
    }

    Ok(ValidRegistration {
        user_name,
        password,
        first_name,
        last_name,
    })
}
