//! Typed HTTP client for the citizen complaint portal.
//!
//! A [`Gateway`] wraps the service's REST surface: complaint CRUD plus the
//! login-or-register upsert. Session state is an explicit [`Session`] value
//! rather than ambient storage, and every failure is normalised into a
//! [`GatewayError`] carrying a displayable message.

mod error;
mod gateway;
mod session;
mod types;

pub use error::GatewayError;
pub use gateway::Gateway;
pub use pagination::PageInfo;
pub use session::{Session, SessionUser};
pub use types::{Complaint, ComplaintPage, ComplaintUpdate, ListParams, Location, NewComplaint};
