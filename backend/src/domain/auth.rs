//! Authentication primitives such as login and registration credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::Username;

/// Minimum username length accepted at registration.
pub const USERNAME_MIN: usize = 3;
/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Username is shorter than the registration minimum.
    UsernameTooShort { min: usize },
    /// Password is shorter than the registration minimum.
    PasswordTooShort { min: usize },
}

impl CredentialsValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameTooShort { .. } => "username",
            Self::EmptyPassword | Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::EmptyPassword => "required",
            Self::UsernameTooShort { .. } | Self::PasswordTooShort { .. } => "too_short",
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use schedule_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("R1", "tester").unwrap();
/// assert_eq!(creds.username().as_str(), "R1");
/// assert_eq!(creds.password(), "tester");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username =
            Username::new(username).map_err(|_| CredentialsValidationError::EmptyUsername)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username suitable for user lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
///
/// ## Invariants
/// - `username` is trimmed and at least [`USERNAME_MIN`] characters.
/// - `password` is at least [`PASSWORD_MIN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl RegistrationCredentials {
    /// Construct registration credentials, enforcing the length policy.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username =
            Username::new(username).map_err(|_| CredentialsValidationError::EmptyUsername)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if username.as_str().chars().count() < USERNAME_MIN {
            return Err(CredentialsValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
