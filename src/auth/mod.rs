//! Password hashing and bearer-token auth.

use thiserror::Error;

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Errors from hashing or token handling. The token variants map to
/// distinct 401 messages so clients can tell an expired session from a
/// bad one.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token")]
    InvalidToken,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is malformed: {0}")]
    BadStoredHash(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}
