//! HTTP adapter. Deserialises requests, delegates to the domain services,
//! and renders the response envelope shared by every endpoint.

pub mod auth;
pub mod complaints;
pub mod envelope;
pub mod error;
pub mod health;
pub mod state;
pub mod users;
pub mod validation;

pub use auth::Authenticated;
pub use envelope::Envelope;
pub use error::ApiResult;
pub use state::HttpState;
