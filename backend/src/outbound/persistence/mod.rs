//! PostgreSQL persistence adapters using Diesel with async pooling.
//!
//! Repository implementations here are thin: they translate between Diesel
//! row structs and domain types and map database failures onto the port
//! error enums. No business rules live in this layer.

mod diesel_complaint_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_complaint_repository::DieselComplaintRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
