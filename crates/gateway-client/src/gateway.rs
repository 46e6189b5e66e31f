//! The gateway itself: a thin, typed wrapper over the REST surface.
//!
//! Pure translation: every method maps onto one HTTP call, attaches the
//! session's bearer token, and normalises failures into [`GatewayError`].
//! No retries, no caching.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::error::{GatewayError, api_error};
use crate::session::{Session, SessionUser};
use crate::types::{
    Complaint, ComplaintPage, ComplaintUpdate, Envelope, ListParams, NewComplaint,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct LoginData {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    token: String,
}

/// Client for the complaint service.
///
/// Unauthenticated on construction; [`Gateway::login`] or
/// [`Gateway::ensure_user`] creates the session, [`Gateway::logout`] clears
/// it. Complaint operations fail with [`GatewayError::AuthBackend`] while no
/// session is active.
pub struct Gateway {
    client: Client,
    base_url: Url,
    session: Option<Session>,
}

impl Gateway {
    /// Create an unauthenticated gateway for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: Url) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            session: None,
        })
    }

    /// Create a gateway that reuses a previously established session.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn with_session(base_url: Url, session: Session) -> Result<Self, GatewayError> {
        let mut gateway = Self::new(base_url)?;
        gateway.session = Some(session);
        Ok(gateway)
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Drop the active session; subsequent complaint calls fail until the
    /// next login.
    pub fn logout(&mut self) -> Option<Session> {
        self.session.take()
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|err| GatewayError::transport(format!("invalid endpoint {path}: {err}")))
    }

    fn active_session(&self) -> Result<&Session, GatewayError> {
        self.session
            .as_ref()
            .ok_or_else(|| GatewayError::auth_backend("no active session; log in first"))
    }

    async fn login_session(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let response = self
            .client
            .post(self.endpoint("api/users/login")?)
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        let data: LoginData = read(response).await?;
        Ok(Session::new(
            SessionUser {
                id: data.id,
                name: data.name,
                email: data.email,
                role: data.role,
            },
            data.token,
        ))
    }

    /// Create an account. The server assigns the `user` role.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Api`] with status 409 when the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, GatewayError> {
        let response = self
            .client
            .post(self.endpoint("api/users/register")?)
            .json(&json!({"name": name, "email": email, "password": password}))
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        read(response).await
    }

    /// Authenticate and store the resulting session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, GatewayError> {
        let session = self.login_session(email, password).await?;
        debug!(user = %session.user().id, "session established");
        Ok(&*self.session.insert(session))
    }

    /// Idempotent login-or-register upsert.
    ///
    /// Tries to log in; on a credential rejection it registers the account
    /// (tolerating a concurrent registration) and logs in again. Calling this
    /// twice with the same email yields a session for the same account.
    ///
    /// # Errors
    ///
    /// Failures are reported as [`GatewayError::AuthBackend`].
    pub async fn ensure_user(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<&Session, GatewayError> {
        let session = match self.login_session(email, password).await {
            Ok(session) => session,
            Err(GatewayError::Api { status: 401, .. }) => {
                match self.register(name, email, password).await {
                    Ok(_) => {}
                    Err(GatewayError::Api { status: 409, .. }) => {}
                    Err(err) => return Err(GatewayError::auth_backend(err.to_string())),
                }
                self.login_session(email, password)
                    .await
                    .map_err(|err| GatewayError::auth_backend(err.to_string()))?
            }
            Err(err) => return Err(GatewayError::auth_backend(err.to_string())),
        };
        debug!(user = %session.user().id, "session established");
        Ok(&*self.session.insert(session))
    }

    /// File a new complaint owned by the session's account.
    pub async fn create_complaint(
        &self,
        complaint: &NewComplaint,
    ) -> Result<Complaint, GatewayError> {
        let session = self.active_session()?;
        let response = self
            .client
            .post(self.endpoint("api/complaints")?)
            .bearer_auth(session.token())
            .json(complaint)
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        read(response).await
    }

    /// List complaints visible to the session, newest first.
    pub async fn list_complaints(
        &self,
        params: &ListParams,
    ) -> Result<ComplaintPage, GatewayError> {
        let session = self.active_session()?;
        let response = self
            .client
            .get(self.endpoint("api/complaints")?)
            .bearer_auth(session.token())
            .query(&params.to_query())
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        read(response).await
    }

    /// List the session account's own complaints.
    pub async fn list_own_complaints(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<ComplaintPage, GatewayError> {
        let session = self.active_session()?;
        let params = ListParams {
            reporter: Some(session.user().id),
            status: None,
            page,
            limit,
        };
        self.list_complaints(&params).await
    }

    /// Fetch one complaint by identifier.
    pub async fn get_complaint(&self, id: Uuid) -> Result<Complaint, GatewayError> {
        let session = self.active_session()?;
        let response = self
            .client
            .get(self.endpoint(&format!("api/complaints/{id}"))?)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        read(response).await
    }

    /// Merge the supplied fields into a complaint.
    pub async fn update_complaint(
        &self,
        id: Uuid,
        update: &ComplaintUpdate,
    ) -> Result<Complaint, GatewayError> {
        let session = self.active_session()?;
        let response = self
            .client
            .put(self.endpoint(&format!("api/complaints/{id}"))?)
            .bearer_auth(session.token())
            .json(update)
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        read(response).await
    }

    /// Change only the status of a complaint.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<Complaint, GatewayError> {
        let session = self.active_session()?;
        let response = self
            .client
            .patch(self.endpoint(&format!("api/complaints/{id}/status"))?)
            .bearer_auth(session.token())
            .json(&json!({"status": status}))
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        read(response).await
    }

    /// Remove a complaint.
    pub async fn delete_complaint(&self, id: Uuid) -> Result<(), GatewayError> {
        let session = self.active_session()?;
        let response = self
            .client
            .delete(self.endpoint(&format!("api/complaints/{id}"))?)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| GatewayError::transport(err.to_string()))?;
        Err(api_error(status, &body))
    }
}

/// Read a successful envelope body, or normalise the failure.
async fn read<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| GatewayError::transport(err.to_string()))?;
    if !status.is_success() {
        return Err(api_error(status, &body));
    }
    let envelope: Envelope<T> = serde_json::from_slice(&body)
        .map_err(|err| GatewayError::decode(format!("invalid response body: {err}")))?;
    envelope
        .data
        .ok_or_else(|| match envelope.message {
            Some(message) => GatewayError::decode(format!("envelope carried no data: {message}")),
            None => GatewayError::decode("envelope carried no data"),
        })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::Gateway;
    use crate::error::GatewayError;
    use crate::session::{Session, SessionUser};

    fn base_url() -> reqwest::Url {
        "http://localhost:9/".parse().expect("valid url")
    }

    fn session() -> Session {
        Session::new(
            SessionUser {
                id: Uuid::new_v4(),
                name: "Warga Uji".into(),
                email: "warga@example.com".into(),
                role: "user".into(),
            },
            "deadbeef",
        )
    }

    #[test]
    fn logout_clears_the_session() {
        let mut gateway = Gateway::with_session(base_url(), session()).expect("gateway");
        assert!(gateway.session().is_some());

        let dropped = gateway.logout();
        assert!(dropped.is_some());
        assert!(gateway.session().is_none());
        assert!(gateway.logout().is_none());
    }

    #[tokio::test]
    async fn complaint_calls_without_a_session_fail_fast() {
        let gateway = Gateway::new(base_url()).expect("gateway");
        let error = gateway
            .get_complaint(Uuid::new_v4())
            .await
            .expect_err("must fail");
        assert!(matches!(error, GatewayError::AuthBackend { .. }));
    }

    #[test]
    fn endpoints_join_onto_the_base_url() {
        let gateway = Gateway::new(base_url()).expect("gateway");
        let url = gateway.endpoint("api/complaints").expect("joins");
        assert_eq!(url.as_str(), "http://localhost:9/api/complaints");
    }
}
