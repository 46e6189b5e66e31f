//! Authentication primitives: credentials, bearer tokens, and the actor
//! identity derived from them.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a service. The
//! effective reporter identity is always an [`Actor`] produced by token
//! verification, never a caller-supplied field.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::users::{EmailAddress, PersonName, UserId, UserRole, UserValidationError};

/// Domain error returned when login or registration payload values are
/// invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// Registration name missing or malformed.
    InvalidName(UserValidationError),
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidName(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials used by the auth service.
///
/// ## Invariants
/// - `email` passes the [`EmailAddress`] structural check.
/// - `password` is non-empty but otherwise uninterpreted; surrounding
///   whitespace is preserved to avoid surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email =
            EmailAddress::new(email).map_err(|_| CredentialValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct Registration {
    name: PersonName,
    credentials: LoginCredentials,
}

impl Registration {
    /// Construct a registration from raw name/email/password inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let name = PersonName::new(name).map_err(CredentialValidationError::InvalidName)?;
        let credentials = LoginCredentials::try_from_parts(email, password)?;
        Ok(Self { name, credentials })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Login email for the new account.
    pub fn email(&self) -> &EmailAddress {
        self.credentials.email()
    }

    /// Password to hash and store.
    pub fn password(&self) -> &str {
        self.credentials.password()
    }
}

/// Opaque bearer token issued at login.
///
/// Only the SHA-256 fingerprint is persisted; the raw token exists once, in
/// the login response.
#[derive(Clone)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Mint a fresh token from 32 bytes of OS randomness.
    pub fn mint() -> Self {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Wrap a token presented by a caller.
    pub fn from_presented(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// The raw token string, for the login response only.
    pub fn reveal(&self) -> &str {
        self.0.as_str()
    }

    /// Fingerprint suitable for storage and lookup.
    pub fn fingerprint(&self) -> TokenFingerprint {
        TokenFingerprint(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never log raw tokens.
        f.write_str("BearerToken(..)")
    }
}

/// SHA-256 fingerprint of a bearer token, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Wrap a fingerprint read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for TokenFingerprint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Verified caller identity every complaint operation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The authenticated user's identifier.
    pub user_id: UserId,
    /// The authenticated user's role.
    pub role: UserRole,
}

impl Actor {
    /// Build an actor from its parts.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Whether this actor may act on complaints owned by others.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
