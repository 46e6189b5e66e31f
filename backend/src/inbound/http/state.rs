//! Shared application state handed to every HTTP handler.

use crate::domain::{AuthService, ComplaintService};

/// Services exposed to the HTTP layer. Cloning is cheap; both services hold
/// their dependencies behind `Arc`.
#[derive(Clone)]
pub struct HttpState {
    pub complaints: ComplaintService,
    pub auth: AuthService,
}

impl HttpState {
    pub fn new(complaints: ComplaintService, auth: AuthService) -> Self {
        Self { complaints, auth }
    }
}
