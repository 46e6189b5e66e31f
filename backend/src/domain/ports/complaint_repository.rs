//! Port abstraction for complaint persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::complaints::{Complaint, ComplaintId, ComplaintPatch, ComplaintStatus};
use crate::domain::users::UserId;

/// Persistence errors raised by complaint repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplaintRepositoryError {
    /// Repository connection could not be established.
    #[error("complaint repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("complaint repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl ComplaintRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Listing filter. Empty filter (the administrator path) matches complaints
/// across all owners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Restrict to a single owner.
    pub reporter: Option<UserId>,
    /// Restrict to a single status.
    pub status: Option<ComplaintStatus>,
}

#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Persist a freshly created complaint.
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintRepositoryError>;

    /// Fetch a complaint by identifier.
    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Merge a partial update into the record, refresh its `updated_at`, and
    /// return the updated complaint. `None` when the record does not exist.
    async fn update(
        &self,
        id: &ComplaintId,
        patch: &ComplaintPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Delete the record. Returns whether a record was actually removed.
    async fn delete(&self, id: &ComplaintId) -> Result<bool, ComplaintRepositoryError>;

    /// One page of matching complaints ordered newest-first by `created_at`,
    /// plus the total match count across all pages.
    async fn list(
        &self,
        filter: &ComplaintFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Complaint>, u64), ComplaintRepositoryError>;
}
