//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::auth::TokenFingerprint;
use crate::domain::users::{EmailAddress, User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// Insert violated the unique email constraint.
    #[error("email is already registered")]
    DuplicateEmail,
}

impl UserRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// A user together with the bcrypt hash the login path verifies against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// The account.
    pub user: User,
    /// bcrypt hash of the account password.
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with their password hash.
    ///
    /// Fails with [`UserRepositoryError::DuplicateEmail`] when the email is
    /// already registered.
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError>;

    /// Fetch a user and their password hash by login email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Replace the stored bearer-token fingerprint for a user. The previous
    /// token stops authenticating.
    async fn store_token_fingerprint(
        &self,
        id: &UserId,
        fingerprint: &TokenFingerprint,
    ) -> Result<(), UserRepositoryError>;

    /// Resolve the user a presented bearer token belongs to.
    async fn find_by_token_fingerprint(
        &self,
        fingerprint: &TokenFingerprint,
    ) -> Result<Option<User>, UserRepositoryError>;
}
