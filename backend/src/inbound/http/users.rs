//! Registration and login endpoints.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::envelope::Envelope;
use super::error::ApiResult;
use super::state::HttpState;
use super::validation;
use crate::domain::{AuthenticatedSession, LoginCredentials, Registration, User};

/// Body accepted by `POST /api/users/register`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body accepted by `POST /api/users/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account representation returned after registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
        }
    }
}

/// Login payload: the account plus a freshly minted bearer token.
///
/// The raw token appears here and nowhere else; the server stores only its
/// fingerprint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
    pub token: String,
}

impl From<AuthenticatedSession> for SessionBody {
    fn from(session: AuthenticatedSession) -> Self {
        let user = UserBody::from(session.user);
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token: session.token.reveal().to_owned(),
        }
    }
}

/// Create an account with the `user` role.
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserBody),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered"),
    )
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from_parts(&payload.name, &payload.email, &payload.password)
            .map_err(|err| validation::credential_error(&err))?;
    let user = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(Envelope::message_with_data(
        "registration successful",
        UserBody::from(user),
    )))
}

/// Verify credentials and mint a bearer token.
///
/// A successful login revokes any token previously issued to the account.
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = SessionBody),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| validation::credential_error(&err))?;
    let session = state.auth.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(Envelope::message_with_data(
        "login successful",
        SessionBody::from(session),
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{
        AuthService, ComplaintService, InMemoryComplaintRepository, InMemoryUserRepository,
        MutableClock, fixture_timestamp,
    };

    const BCRYPT_TEST_COST: u32 = 4;

    fn test_state() -> HttpState {
        let complaints = ComplaintService::new(
            Arc::new(InMemoryComplaintRepository::default()),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let auth = AuthService::with_cost(
            Arc::new(InMemoryUserRepository::default()),
            BCRYPT_TEST_COST,
        );
        HttpState::new(complaints, auth)
    }

    async fn service(
        state: HttpState,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(register).service(login)),
        )
        .await
    }

    async fn post_json(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        uri: &str,
        payload: Value,
    ) -> actix_web::dev::ServiceResponse {
        test::call_service(
            app,
            test::TestRequest::post()
                .uri(uri)
                .set_json(payload)
                .to_request(),
        )
        .await
    }

    #[actix_web::test]
    async fn register_then_login_returns_a_token() {
        let app = service(test_state()).await;

        let registered = post_json(
            &app,
            "/api/users/register",
            json!({"name": "Warga Uji", "email": "warga@example.com", "password": "rahasia123"}),
        )
        .await;
        assert_eq!(registered.status().as_u16(), 201);
        let registered: Value = test::read_body_json(registered).await;
        assert_eq!(registered["success"], json!(true));
        assert_eq!(registered["data"]["role"], json!("user"));
        assert!(registered["data"].get("token").is_none());

        let logged_in = post_json(
            &app,
            "/api/users/login",
            json!({"email": "warga@example.com", "password": "rahasia123"}),
        )
        .await;
        assert_eq!(logged_in.status().as_u16(), 200);
        let logged_in: Value = test::read_body_json(logged_in).await;
        assert_eq!(logged_in["data"]["id"], registered["data"]["id"]);
        assert_eq!(
            logged_in["data"]["token"].as_str().expect("token").len(),
            64
        );
    }

    /// The login-or-register upsert the client gateway performs, replayed
    /// against the handlers: both rounds must land on the same account.
    #[actix_web::test]
    async fn login_register_login_upsert_is_idempotent() {
        let app = service(test_state()).await;
        let login_payload = json!({"email": "warga@example.com", "password": "rahasia123"});
        let register_payload =
            json!({"name": "Warga Uji", "email": "warga@example.com", "password": "rahasia123"});

        let mut seen_ids = Vec::new();
        for round in 0..2 {
            let attempt = post_json(&app, "/api/users/login", login_payload.clone()).await;
            if attempt.status().as_u16() == 401 {
                assert_eq!(round, 0, "only the first round may need registration");
                let registered =
                    post_json(&app, "/api/users/register", register_payload.clone()).await;
                assert_eq!(registered.status().as_u16(), 201);
                let retried = post_json(&app, "/api/users/login", login_payload.clone()).await;
                assert_eq!(retried.status().as_u16(), 200);
                let body: Value = test::read_body_json(retried).await;
                seen_ids.push(body["data"]["id"].clone());
            } else {
                assert_eq!(attempt.status().as_u16(), 200);
                let body: Value = test::read_body_json(attempt).await;
                seen_ids.push(body["data"]["id"].clone());
            }
        }
        assert_eq!(seen_ids[0], seen_ids[1]);
    }

    #[actix_web::test]
    async fn duplicate_registration_is_a_conflict() {
        let app = service(test_state()).await;
        let payload =
            json!({"name": "Warga Uji", "email": "warga@example.com", "password": "rahasia123"});

        let first = post_json(&app, "/api/users/register", payload.clone()).await;
        assert_eq!(first.status().as_u16(), 201);
        let second = post_json(&app, "/api/users/register", payload).await;
        assert_eq!(second.status().as_u16(), 409);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized_with_a_generic_message() {
        let app = service(test_state()).await;
        post_json(
            &app,
            "/api/users/register",
            json!({"name": "Warga Uji", "email": "warga@example.com", "password": "rahasia123"}),
        )
        .await;

        let response = post_json(
            &app,
            "/api/users/login",
            json!({"email": "warga@example.com", "password": "salah"}),
        )
        .await;
        assert_eq!(response.status().as_u16(), 401);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], json!("invalid credentials"));
    }

    #[actix_web::test]
    async fn malformed_email_names_the_field() {
        let app = service(test_state()).await;
        let response = post_json(
            &app,
            "/api/users/register",
            json!({"name": "Warga Uji", "email": "bukan-email", "password": "rahasia123"}),
        )
        .await;
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], json!("email"));
    }
}
