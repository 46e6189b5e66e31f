//! Complaint lifecycle use-cases.
//!
//! Every operation runs under a verified [`Actor`]; ownership is enforced
//! here, against the token-derived identity, never against caller-supplied
//! fields. Ordinary users are scoped to complaints they own and receive
//! `NotFound` for anything else so record existence is not leaked;
//! administrators may act on any complaint.

use std::sync::Arc;

use mockable::Clock;
use pagination::{PageRequest, Paged};
use tracing::debug;

use super::auth::Actor;
use super::complaints::{
    Complaint, ComplaintDraft, ComplaintId, ComplaintPatch, ComplaintStatus,
};
use super::error::Error;
use super::ports::{ComplaintFilter, ComplaintRepository, ComplaintRepositoryError};

/// Map repository failures onto transport-facing domain errors.
fn map_repository_error(error: ComplaintRepositoryError) -> Error {
    match error {
        ComplaintRepositoryError::Connection { message } => Error::service_unavailable(message),
        ComplaintRepositoryError::Query { message } => Error::internal(message),
    }
}

fn complaint_not_found() -> Error {
    Error::not_found("complaint not found")
}

/// Use-case service for the complaint lifecycle.
#[derive(Clone)]
pub struct ComplaintService {
    repository: Arc<dyn ComplaintRepository>,
    clock: Arc<dyn Clock>,
}

impl ComplaintService {
    /// Create a service over a repository and a clock.
    pub fn new(repository: Arc<dyn ComplaintRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Submit a new complaint owned by the acting user.
    pub async fn create(&self, actor: &Actor, draft: ComplaintDraft) -> Result<Complaint, Error> {
        let complaint = Complaint::create(
            ComplaintId::random(),
            actor.user_id,
            draft,
            self.clock.utc(),
        );
        self.repository
            .insert(&complaint)
            .await
            .map_err(map_repository_error)?;
        debug!(complaint_id = %complaint.id(), reporter_id = %actor.user_id, "complaint created");
        Ok(complaint)
    }

    /// Fetch a single complaint visible to the actor.
    pub async fn get(&self, actor: &Actor, id: &ComplaintId) -> Result<Complaint, Error> {
        let complaint = self
            .repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(complaint_not_found)?;
        if !actor.is_admin() && complaint.reporter_id() != &actor.user_id {
            return Err(complaint_not_found());
        }
        Ok(complaint)
    }

    /// List complaints newest-first. Ordinary users are always scoped to
    /// their own complaints regardless of the requested filter; admins may
    /// filter freely or not at all.
    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: ComplaintFilter,
        page: PageRequest,
    ) -> Result<Paged<Complaint>, Error> {
        if !actor.is_admin() {
            filter.reporter = Some(actor.user_id);
        }
        let (items, total) = self
            .repository
            .list(&filter, &page)
            .await
            .map_err(map_repository_error)?;
        Ok(Paged::new(items, page, total))
    }

    /// Merge a partial update into a complaint the actor owns (or any
    /// complaint, for admins) and refresh `updated_at`.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &ComplaintId,
        patch: ComplaintPatch,
    ) -> Result<Complaint, Error> {
        // Visibility check first so a non-owner cannot probe for existence.
        self.get(actor, id).await?;
        self.repository
            .update(id, &patch, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(complaint_not_found)
    }

    /// Status-only update path. Identical merge and timestamp semantics to
    /// [`ComplaintService::update`], kept distinct to mirror the dedicated
    /// endpoint.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint, Error> {
        self.update(actor, id, ComplaintPatch::status_only(status))
            .await
    }

    /// Delete a complaint the actor owns (or any complaint, for admins).
    /// Deleting an already-deleted id reports `NotFound`.
    pub async fn delete(&self, actor: &Actor, id: &ComplaintId) -> Result<(), Error> {
        self.get(actor, id).await?;
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(complaint_not_found());
        }
        debug!(complaint_id = %id, "complaint deleted");
        Ok(())
    }
}
