//! Authentication primitives such as login credentials and registrations.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use crate::domain::{USERNAME_MIN, UserValidationError, Username};

/// Minimum number of characters in a password at registration.
pub const PASSWORD_MIN: usize = 3;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use bloglist::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("root", "salainen").unwrap();
/// assert_eq!(creds.username(), "root");
/// assert_eq!(creds.password(), "salainen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when a registration payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("username missing")]
    MissingUsername,
    #[error("username shorter than the minimum allowed length ({min})")]
    UsernameTooShort { min: usize },
    #[error("password missing")]
    MissingPassword,
    #[error("password shorter than the minimum allowed length ({min})")]
    PasswordTooShort { min: usize },
}

impl RegistrationValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingUsername | Self::UsernameTooShort { .. } => "username",
            Self::MissingPassword | Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingUsername | Self::MissingPassword => "missing_field",
            Self::UsernameTooShort { .. } | Self::PasswordTooShort { .. } => "too_short",
        }
    }
}

/// Validated registration request. The password is wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    name: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration input.
    ///
    /// # Examples
    /// ```
    /// use bloglist::domain::Registration;
    ///
    /// assert!(Registration::try_from_parts(Some("test"), None, Some("testpass")).is_ok());
    /// assert!(Registration::try_from_parts(Some("test"), None, Some("pw")).is_err());
    /// ```
    pub fn try_from_parts(
        username: Option<&str>,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let username = match Username::new(username.unwrap_or_default()) {
            Ok(username) => username,
            Err(UserValidationError::UsernameTooShort { .. }) => {
                return Err(RegistrationValidationError::UsernameTooShort { min: USERNAME_MIN });
            }
            Err(_) => return Err(RegistrationValidationError::MissingUsername),
        };

        let password = password.unwrap_or_default();
        if password.is_empty() {
            return Err(RegistrationValidationError::MissingPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            username,
            name: name.unwrap_or_default().trim().to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name; may be empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(None, Some("secret"), RegistrationValidationError::MissingUsername)]
    #[case(Some("ab"), Some("secret"), RegistrationValidationError::UsernameTooShort { min: 3 })]
    #[case(Some("abc"), None, RegistrationValidationError::MissingPassword)]
    #[case(Some("abc"), Some("pw"), RegistrationValidationError::PasswordTooShort { min: 3 })]
    fn invalid_registrations(
        #[case] username: Option<&str>,
        #[case] password: Option<&str>,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = Registration::try_from_parts(username, Some("Name"), password)
            .expect_err("invalid registration");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn registration_trims_username_and_defaults_name() {
        let registration =
            Registration::try_from_parts(Some("  test "), None, Some("testpass")).expect("valid");
        assert_eq!(registration.username().as_ref(), "test");
        assert_eq!(registration.name(), "");
        assert_eq!(registration.password(), "testpass");
    }
}
