//! Citizen complaint portal backend.
//!
//! Hexagonal layout: `domain` holds the entities, ports, and services;
//! `inbound` adapts HTTP onto the services; `outbound` implements the ports
//! against PostgreSQL; `server` wires everything together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
