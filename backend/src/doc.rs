//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint together with the bearer-token
//! security scheme. The generated specification backs the Swagger UI served
//! in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::complaints::{
    ComplaintBody, CreateComplaintRequest, ListBody, LocationBody, StatusRequest,
    UpdateComplaintRequest,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, SessionBody, UserBody};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the complaint portal REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pengaduan backend API",
        description = "Citizen complaint portal: complaint CRUD plus registration and login."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::complaints::create_complaint,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::get_complaint,
        crate::inbound::http::complaints::update_complaint,
        crate::inbound::http::complaints::update_complaint_status,
        crate::inbound::http::complaints::delete_complaint,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ComplaintBody,
        CreateComplaintRequest,
        UpdateComplaintRequest,
        StatusRequest,
        ListBody,
        LocationBody,
        RegisterRequest,
        LoginRequest,
        UserBody,
        SessionBody,
    )),
    tags(
        (name = "complaints", description = "Complaint lifecycle operations"),
        (name = "users", description = "Registration and login"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;
