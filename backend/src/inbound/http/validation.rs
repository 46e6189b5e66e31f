//! Request-level validation helpers.
//!
//! Domain constructors decide what is valid; these helpers translate their
//! rejections into 400 responses that name the offending field.

use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::{
    ComplaintId, ComplaintStatus, ComplaintValidationError, CredentialValidationError, Error,
    UserId,
};

/// Build a 400 error pointing at a single field.
pub fn invalid_field(field: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

/// Parse a complaint identifier from a path segment.
pub fn parse_complaint_id(raw: &str) -> Result<ComplaintId, Error> {
    ComplaintId::new(raw).map_err(|_| invalid_field("id", "complaint id must be a valid UUID"))
}

/// Parse a reporter filter from a query parameter.
pub fn parse_reporter(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| invalid_field("reporter", "reporter must be a valid UUID"))
}

/// Parse a status token from a query parameter.
pub fn parse_status(raw: &str) -> Result<ComplaintStatus, Error> {
    ComplaintStatus::parse(raw).map_err(|_| {
        invalid_field(
            "status",
            format!("status must be one of OPEN, IN_PROGRESS, CLOSED (got {raw:?})"),
        )
    })
}

/// Validate pagination parameters from the query string.
pub fn page_request(page: Option<u32>, limit: Option<u32>) -> Result<PageRequest, Error> {
    PageRequest::new(page, limit).map_err(|err| match err {
        PageRequestError::ZeroPage => invalid_field("page", "page must be at least 1"),
        PageRequestError::ZeroLimit => invalid_field("limit", "limit must be at least 1"),
        PageRequestError::LimitTooLarge { max } => {
            invalid_field("limit", format!("limit must be at most {max}"))
        }
    })
}

/// Translate a complaint value rejection for a named request field.
pub fn complaint_field_error(field: &str, err: &ComplaintValidationError) -> Error {
    invalid_field(field, err.to_string())
}

/// Translate a credential rejection, naming the field it concerns.
pub fn credential_error(err: &CredentialValidationError) -> Error {
    let field = match err {
        CredentialValidationError::InvalidEmail => "email",
        CredentialValidationError::EmptyPassword => "password",
        CredentialValidationError::InvalidName(_) => "name",
    };
    invalid_field(field, err.to_string())
}
