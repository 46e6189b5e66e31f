//! Register/login use-cases backing the auth bridge.
//!
//! Passwords are stored as bcrypt hashes. A successful login mints an opaque
//! bearer token whose SHA-256 fingerprint replaces the previous one on the
//! user row, so each user holds at most one live token.

use std::sync::Arc;

use tracing::debug;

use super::auth::{Actor, BearerToken, LoginCredentials, Registration};
use super::error::Error;
use super::ports::{UserRepository, UserRepositoryError};
use super::users::{User, UserId, UserRole};

/// Map repository failures onto transport-facing domain errors.
fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateEmail => Error::conflict("email is already registered"),
    }
}

/// One message for unknown email and wrong password alike, so login failures
/// do not reveal which emails are registered.
fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// A freshly authenticated user together with their newly minted token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// The logged-in account.
    pub user: User,
    /// The raw bearer token, revealed once in the login response.
    pub token: BearerToken,
}

/// Use-case service for registration, login, and token verification.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl AuthService {
    /// Create a service over a user repository with the default bcrypt cost.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self::with_cost(users, bcrypt::DEFAULT_COST)
    }

    /// Create a service with an explicit bcrypt cost. Tests use a low cost to
    /// stay fast; production keeps the default.
    pub fn with_cost(users: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Register a new ordinary user. Fails with `Conflict` when the email is
    /// already registered.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = bcrypt::hash(registration.password(), self.bcrypt_cost)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        let user = User::new(
            UserId::random(),
            registration.name().clone(),
            registration.email().clone(),
            UserRole::User,
        );
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_repository_error)?;
        debug!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    /// Verify credentials and mint a fresh bearer token. The previous token,
    /// if any, stops authenticating.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let stored = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(invalid_credentials)?;

        let verified = bcrypt::verify(credentials.password(), &stored.password_hash)
            .map_err(|err| Error::internal(format!("password verification failed: {err}")))?;
        if !verified {
            return Err(invalid_credentials());
        }

        let token = BearerToken::mint();
        self.users
            .store_token_fingerprint(stored.user.id(), &token.fingerprint())
            .await
            .map_err(map_repository_error)?;
        debug!(user_id = %stored.user.id(), "login issued bearer token");
        Ok(AuthenticatedSession {
            user: stored.user,
            token,
        })
    }

    /// Resolve a presented bearer token into the acting identity.
    pub async fn authenticate(&self, token: &BearerToken) -> Result<Actor, Error> {
        let user = self
            .users
            .find_by_token_fingerprint(&token.fingerprint())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("invalid or expired token"))?;
        Ok(Actor::new(*user.id(), user.role()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    //! Regression coverage for registration, login, and token verification.
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;
    use crate::domain::auth::TokenFingerprint;
    use crate::domain::ports::StoredCredentials;
    use crate::domain::users::EmailAddress;
    use crate::domain::ErrorCode;

    /// Cheap hashing keeps the suite fast; the production default stays 12.
    const TEST_COST: u32 = 4;

    struct AccountRecord {
        user: User,
        password_hash: String,
        token_fingerprint: Option<TokenFingerprint>,
    }

    /// In-memory user repository with unique-email enforcement.
    #[derive(Default)]
    pub(crate) struct InMemoryUserRepository {
        state: Mutex<HashMap<UserId, AccountRecord>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn insert(
            &self,
            user: &User,
            password_hash: &str,
        ) -> Result<(), UserRepositoryError> {
            let mut state = self.state.lock().expect("state lock");
            if state
                .values()
                .any(|record| record.user.email() == user.email())
            {
                return Err(UserRepositoryError::DuplicateEmail);
            }
            state.insert(
                *user.id(),
                AccountRecord {
                    user: user.clone(),
                    password_hash: password_hash.to_owned(),
                    token_fingerprint: None,
                },
            );
            Ok(())
        }

        async fn find_by_email(
            &self,
            email: &EmailAddress,
        ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
            let state = self.state.lock().expect("state lock");
            Ok(state
                .values()
                .find(|record| record.user.email() == email)
                .map(|record| StoredCredentials {
                    user: record.user.clone(),
                    password_hash: record.password_hash.clone(),
                }))
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
            let state = self.state.lock().expect("state lock");
            Ok(state.get(id).map(|record| record.user.clone()))
        }

        async fn store_token_fingerprint(
            &self,
            id: &UserId,
            fingerprint: &TokenFingerprint,
        ) -> Result<(), UserRepositoryError> {
            let mut state = self.state.lock().expect("state lock");
            let record = state
                .get_mut(id)
                .ok_or_else(|| UserRepositoryError::query("user not found"))?;
            record.token_fingerprint = Some(fingerprint.clone());
            Ok(())
        }

        async fn find_by_token_fingerprint(
            &self,
            fingerprint: &TokenFingerprint,
        ) -> Result<Option<User>, UserRepositoryError> {
            let state = self.state.lock().expect("state lock");
            Ok(state
                .values()
                .find(|record| record.token_fingerprint.as_ref() == Some(fingerprint))
                .map(|record| record.user.clone()))
        }
    }

    fn service() -> AuthService {
        AuthService::with_cost(Arc::new(InMemoryUserRepository::default()), TEST_COST)
    }

    fn registration(name: &str, email: &str, password: &str) -> Registration {
        Registration::try_from_parts(name, email, password).expect("valid registration")
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid credentials")
    }

    #[tokio::test]
    async fn register_then_login_returns_the_same_user_id() {
        let service = service();
        let registered = service
            .register(registration("Intan", "intan@example.com", "rahasia"))
            .await
            .expect("registration succeeds");

        let first = service
            .login(&credentials("intan@example.com", "rahasia"))
            .await
            .expect("login succeeds");
        let second = service
            .login(&credentials("intan@example.com", "rahasia"))
            .await
            .expect("repeat login succeeds");

        assert_eq!(first.user.id(), registered.id());
        assert_eq!(second.user.id(), registered.id());
        assert_eq!(first.user.role(), UserRole::User);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let service = service();
        service
            .register(registration("Intan", "intan@example.com", "rahasia"))
            .await
            .expect("first registration succeeds");

        let err = service
            .register(registration("Penyusup", "intan@example.com", "lain"))
            .await
            .expect_err("duplicate email rejected");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case("intan@example.com", "salah")]
    #[case("tidak-terdaftar@example.com", "rahasia")]
    #[tokio::test]
    async fn bad_credentials_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
        let service = service();
        service
            .register(registration("Intan", "intan@example.com", "rahasia"))
            .await
            .expect("registration succeeds");

        let err = service
            .login(&credentials(email, password))
            .await
            .expect_err("login rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[tokio::test]
    async fn issued_tokens_authenticate_and_relogin_revokes_the_old_one() {
        let service = service();
        let registered = service
            .register(registration("Intan", "intan@example.com", "rahasia"))
            .await
            .expect("registration succeeds");

        let first = service
            .login(&credentials("intan@example.com", "rahasia"))
            .await
            .expect("login succeeds");
        let actor = service
            .authenticate(&first.token)
            .await
            .expect("token authenticates");
        assert_eq!(&actor.user_id, registered.id());
        assert_eq!(actor.role, UserRole::User);

        let second = service
            .login(&credentials("intan@example.com", "rahasia"))
            .await
            .expect("second login succeeds");
        assert!(service.authenticate(&second.token).await.is_ok());

        let err = service
            .authenticate(&first.token)
            .await
            .expect_err("old token revoked");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn unknown_tokens_are_rejected() {
        let service = service();
        let err = service
            .authenticate(&BearerToken::mint())
            .await
            .expect_err("unknown token rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
