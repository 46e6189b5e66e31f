//! PostgreSQL-backed [`ComplaintRepository`] implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{ComplaintFilter, ComplaintRepository, ComplaintRepositoryError};
use crate::domain::{Complaint, ComplaintId, ComplaintPatch};

use super::models::{ComplaintChangeset, ComplaintRow, NewComplaintRow};
use super::pool::{DbPool, PoolError};
use super::schema::complaints;

/// Diesel-backed implementation of the [`ComplaintRepository`] port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    /// Create a new repository over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ComplaintRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ComplaintRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ComplaintRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ComplaintRepositoryError::connection("database connection error")
        }
        _ => ComplaintRepositoryError::query("database error"),
    }
}

/// Apply the optional reporter and status restrictions to a query.
macro_rules! apply_filter {
    ($query:expr, $filter:expr) => {{
        let mut query = $query.into_boxed();
        if let Some(reporter) = $filter.reporter {
            query = query.filter(complaints::reporter_id.eq(*reporter.as_uuid()));
        }
        if let Some(status) = $filter.status {
            query = query.filter(complaints::status.eq(status.as_str()));
        }
        query
    }};
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn insert(&self, complaint: &Complaint) -> Result<(), ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(complaints::table)
            .values(NewComplaintRow::from_complaint(complaint))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ComplaintRow> = complaints::table
            .find(*id.as_uuid())
            .select(ComplaintRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ComplaintRow::into_complaint).transpose()
    }

    async fn update(
        &self,
        id: &ComplaintId,
        patch: &ComplaintPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ComplaintRow> = diesel::update(complaints::table.find(*id.as_uuid()))
            .set(ComplaintChangeset::from_patch(patch, updated_at))
            .returning(ComplaintRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ComplaintRow::into_complaint).transpose()
    }

    async fn delete(&self, id: &ComplaintId) -> Result<bool, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(complaints::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list(
        &self,
        filter: &ComplaintFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Complaint>, u64), ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = apply_filter!(complaints::table, filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<ComplaintRow> = apply_filter!(complaints::table, filter)
            .select(ComplaintRow::as_select())
            .order(complaints::created_at.desc())
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .limit(i64::from(page.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(ComplaintRow::into_complaint)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, u64::try_from(total).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_map_to_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(error, ComplaintRepositoryError::Connection { .. }));
    }

    #[test]
    fn closed_connections_map_to_connection_errors() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let error = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("gone".to_owned()),
        ));
        assert!(matches!(error, ComplaintRepositoryError::Connection { .. }));

        let error = map_diesel_error(DieselError::NotFound);
        assert!(matches!(error, ComplaintRepositoryError::Query { .. }));
    }
}
