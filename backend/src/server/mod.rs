//! Server construction: state wiring, route registration, and startup.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::DefaultClock;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{AuthService, ComplaintService, Error};
use crate::inbound::http::complaints::{
    create_complaint, delete_complaint, get_complaint, list_complaints, update_complaint,
    update_complaint_status,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, register};
use crate::middleware::RequestId;
use crate::outbound::persistence::{
    DbPool, DieselComplaintRepository, DieselUserRepository, PoolConfig,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Reject malformed JSON bodies with the standard error envelope instead of
/// actix's plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid request body: {err}")).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("invalid query string: {err}")).into()
    })
}

/// Assemble the application: `/api` scope, health probes, middleware, and
/// (in debug builds) Swagger UI under `/docs`.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .app_data(json_config())
        .app_data(query_config())
        .service(register)
        .service(login)
        .service(create_complaint)
        .service(list_complaints)
        .service(get_complaint)
        .service(update_complaint)
        .service(update_complaint_status)
        .service(delete_complaint);

    let app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(RequestId)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Apply embedded migrations on a blocking thread; Diesel's migration
/// harness is synchronous.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
        Ok(())
    })
    .await
    .map_err(|err| std::io::Error::other(err.to_string()))?
}

/// Run migrations, build the shared pool and services, and serve until
/// shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    run_migrations(config.database_url().to_owned()).await?;

    let pool = DbPool::new(
        PoolConfig::new(config.database_url()).with_max_size(config.pool_max_size()),
    )
    .await
    .map_err(|err| std::io::Error::other(err.to_string()))?;

    let complaints = ComplaintService::new(
        Arc::new(DieselComplaintRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    );
    let auth = AuthService::new(Arc::new(DieselUserRepository::new(pool)));
    let http_state = web::Data::new(HttpState::new(complaints, auth));
    let health_state = web::Data::new(HealthState::new());

    let server_http_state = http_state.clone();
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_http_state.clone(), server_health_state.clone())
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    info!(addr = %config.bind_addr(), "listening");
    server.await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, web};
    use serde_json::{Value, json};

    use super::build_app;
    use crate::domain::{
        AuthService, ComplaintService, InMemoryComplaintRepository, InMemoryUserRepository,
        MutableClock, fixture_timestamp,
    };
    use crate::inbound::http::health::HealthState;
    use crate::inbound::http::state::HttpState;

    fn test_state() -> web::Data<HttpState> {
        let complaints = ComplaintService::new(
            Arc::new(InMemoryComplaintRepository::default()),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let auth = AuthService::with_cost(Arc::new(InMemoryUserRepository::default()), 4);
        web::Data::new(HttpState::new(complaints, auth))
    }

    #[actix_web::test]
    async fn assembled_app_serves_probes_and_protects_the_api() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let app = test::init_service(build_app(test_state(), health_state)).await;

        let live = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert!(live.status().is_success());

        let unauthorised = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/complaints").to_request(),
        )
        .await;
        assert_eq!(unauthorised.status().as_u16(), 401);
    }

    #[actix_web::test]
    async fn malformed_json_is_rejected_with_the_envelope() {
        let health_state = web::Data::new(HealthState::new());
        let app = test::init_service(build_app(test_state(), health_state)).await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/users/register")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["success"], json!(false));
    }
}
