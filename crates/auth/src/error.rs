use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing registration fields, including an unknown role
    /// or a registration number outside the allow-list.
    #[error("{0}")]
    InvalidInput(String),

    /// The email is already registered, in either collection. Uniqueness
    /// violations surfaced by the directory at insert time map here too,
    /// so the check-then-insert race has a single outcome.
    #[error("Email already in use")]
    EmailInUse,

    /// No student or teacher matches the email.
    ///
    /// Deliberately distinct from [`AuthError::InvalidCredentials`]: the
    /// lookup already reveals account existence through this path, and the
    /// source system keeps the two outcomes apart. This is a documented
    /// trade-off, not a hardened oracle.
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password or email")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    /// Directory backend failure unrelated to any domain rule.
    #[error("Directory failure: {0}")]
    Directory(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
