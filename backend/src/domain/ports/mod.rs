//! Port abstractions the domain services drive their adapters through.
//!
//! In hexagonal terms these are *driven* ports: the services call them and
//! the persistence layer implements them, so service tests can substitute
//! in-memory doubles instead of wiring PostgreSQL.

mod complaint_repository;
mod user_repository;

pub use complaint_repository::{
    ComplaintFilter, ComplaintRepository, ComplaintRepositoryError,
};
pub use user_repository::{StoredCredentials, UserRepository, UserRepositoryError};
