//! Domain layer: entities, validated value types, ports, and services.
//!
//! Nothing in this module depends on actix, Diesel, or any other adapter
//! concern; inbound and outbound layers translate to and from these types at
//! the edges.

mod auth;
mod auth_service;
mod complaint_service;
mod complaints;
mod error;
pub mod ports;
mod users;

pub use auth::{
    Actor, BearerToken, CredentialValidationError, LoginCredentials, Registration,
    TokenFingerprint,
};
pub use auth_service::{AuthService, AuthenticatedSession};
pub use complaint_service::ComplaintService;
pub use complaints::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintId, ComplaintPatch, ComplaintPriority,
    ComplaintStatus, ComplaintValidationError, Description, Location, Title,
};
pub use error::{Error, ErrorCode};
pub use users::{
    EmailAddress, PersonName, User, UserId, UserRole, UserValidationError, NAME_MAX,
};

#[cfg(test)]
pub(crate) use auth_service::tests::InMemoryUserRepository;
#[cfg(test)]
pub(crate) use complaint_service::tests::{
    fixture_draft, fixture_timestamp, InMemoryComplaintRepository, MutableClock,
};
