// Core modules
mod error;
mod jwt;
mod password;

pub mod directory;
pub mod model;
pub mod service;

// Re-export error types
pub use error::{AuthError, Result};

// Re-export crypto primitives (for standalone use)
pub use jwt::{Claims, TOKEN_TTL_SECS, issue_token, verify_token};
pub use password::{hash_password, verify_password};

pub use directory::{InMemoryDirectory, UserDirectory};
pub use model::{NewRegistration, Principal, PublicIdentity, Role, Student, Teacher};
pub use service::AuthService;
