//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Row-to-domain conversion trusts that writes
//! went through the validated constructors; a corrupted row is reported as a
//! query error rather than a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::{ComplaintRepositoryError, UserRepositoryError};
use crate::domain::{
    Complaint, ComplaintCategory, ComplaintId, ComplaintPatch, ComplaintPriority, ComplaintStatus,
    Description, EmailAddress, Location, PersonName, Title, User, UserId, UserRole,
};

use super::schema::{complaints, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "read via dedicated fingerprint lookups only")]
    pub token_fingerprint: Option<String>,
    #[expect(dead_code, reason = "audit column, not surfaced to the domain")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column, not surfaced to the domain")]
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert this row into a domain [`User`].
    pub(crate) fn into_user(self) -> Result<User, UserRepositoryError> {
        let name = PersonName::new(&self.name)
            .map_err(|err| corrupt_user(self.id, "name", &err.to_string()))?;
        let email = EmailAddress::new(&self.email)
            .map_err(|err| corrupt_user(self.id, "email", &err.to_string()))?;
        let role = match self.role.as_str() {
            "admin" => UserRole::Admin,
            "user" => UserRole::User,
            other => {
                tracing::warn!(value = other, user_id = %self.id, "unrecognised role, treating as user");
                UserRole::User
            }
        };
        Ok(User::new(UserId::from_uuid(self.id), name, email, role))
    }
}

fn corrupt_user(id: Uuid, column: &str, detail: &str) -> UserRepositoryError {
    tracing::error!(user_id = %id, column, detail, "stored user row failed validation");
    UserRepositoryError::query(format!("stored user {id} has an invalid {column}"))
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the complaints table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub images: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplaintRow {
    /// Convert this row into a domain [`Complaint`].
    pub(crate) fn into_complaint(self) -> Result<Complaint, ComplaintRepositoryError> {
        let title = Title::new(&self.title)
            .map_err(|err| corrupt_complaint(self.id, "title", &err.to_string()))?;
        let description = Description::new(&self.description)
            .map_err(|err| corrupt_complaint(self.id, "description", &err.to_string()))?;
        let category = ComplaintCategory::parse(&self.category)
            .map_err(|err| corrupt_complaint(self.id, "category", &err.to_string()))?;
        let priority = ComplaintPriority::parse(&self.priority)
            .map_err(|err| corrupt_complaint(self.id, "priority", &err.to_string()))?;
        let status = ComplaintStatus::parse(&self.status)
            .map_err(|err| corrupt_complaint(self.id, "status", &err.to_string()))?;
        let location = Location::new(self.latitude, self.longitude, self.address)
            .map_err(|err| corrupt_complaint(self.id, "location", &err.to_string()))?;
        Ok(Complaint::from_parts(
            ComplaintId::from_uuid(self.id),
            UserId::from_uuid(self.reporter_id),
            title,
            description,
            category,
            priority,
            location,
            self.images,
            status,
            self.created_at,
            self.updated_at,
        ))
    }
}

fn corrupt_complaint(id: Uuid, column: &str, detail: &str) -> ComplaintRepositoryError {
    tracing::error!(complaint_id = %id, column, detail, "stored complaint row failed validation");
    ComplaintRepositoryError::query(format!("stored complaint {id} has an invalid {column}"))
}

/// Insertable struct for creating new complaint records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaints)]
pub(crate) struct NewComplaintRow<'a> {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub priority: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub address: &'a str,
    pub images: &'a [String],
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewComplaintRow<'a> {
    /// Flatten a domain [`Complaint`] into column values for insert.
    pub(crate) fn from_complaint(complaint: &'a Complaint) -> Self {
        Self {
            id: *complaint.id().as_uuid(),
            reporter_id: *complaint.reporter_id().as_uuid(),
            title: complaint.title().as_ref(),
            description: complaint.description().as_ref(),
            category: complaint.category().as_str(),
            priority: complaint.priority().as_str(),
            latitude: complaint.location().latitude(),
            longitude: complaint.location().longitude(),
            address: complaint.location().address(),
            images: complaint.images(),
            status: complaint.status().as_str(),
            created_at: complaint.created_at(),
            updated_at: complaint.updated_at(),
        }
    }
}

/// Changeset applying a partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = complaints)]
pub(crate) struct ComplaintChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub images: Option<Vec<String>>,
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ComplaintChangeset {
    /// Build a changeset from a domain patch plus the refreshed timestamp.
    pub(crate) fn from_patch(patch: &ComplaintPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            title: patch.title.clone().map(String::from),
            description: patch.description.clone().map(String::from),
            category: patch.category.map(|category| category.as_str().to_owned()),
            priority: patch.priority.map(|priority| priority.as_str().to_owned()),
            latitude: patch.location.as_ref().map(Location::latitude),
            longitude: patch.location.as_ref().map(Location::longitude),
            address: patch
                .location
                .as_ref()
                .map(|location| location.address().to_owned()),
            images: patch.images.clone(),
            status: patch.status.map(|status| status.as_str().to_owned()),
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::domain::ComplaintPatch;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn complaint_row() -> ComplaintRow {
        ComplaintRow {
            id: Uuid::new_v4(),
            reporter_id: Uuid::new_v4(),
            title: "Jalan berlubang".into(),
            description: "Lubang besar di depan pasar".into(),
            category: "INFRASTRUCTURE".into(),
            priority: "HIGH".into(),
            latitude: -6.2,
            longitude: 106.8,
            address: "Jl. Merdeka 1".into(),
            images: vec!["https://img.example/1.jpg".into()],
            status: "OPEN".into(),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[rstest]
    fn complaint_row_round_trips_into_the_domain() {
        let row = complaint_row();
        let id = row.id;
        let complaint = row.into_complaint().expect("valid row");
        assert_eq!(complaint.id().as_uuid(), &id);
        assert_eq!(complaint.status(), ComplaintStatus::Open);
        assert_eq!(complaint.category(), ComplaintCategory::Infrastructure);
        assert_eq!(complaint.location().address(), "Jl. Merdeka 1");
    }

    #[rstest]
    #[case("status", "resolved")]
    #[case("category", "ROADS")]
    #[case("priority", "urgent")]
    fn unknown_tokens_are_reported_as_query_errors(#[case] column: &str, #[case] value: &str) {
        let mut row = complaint_row();
        match column {
            "status" => row.status = value.into(),
            "category" => row.category = value.into(),
            _ => row.priority = value.into(),
        }
        let error = row.into_complaint().expect_err("must reject");
        assert!(matches!(error, ComplaintRepositoryError::Query { .. }));
    }

    #[rstest]
    fn changeset_mirrors_a_status_only_patch() {
        let changeset =
            ComplaintChangeset::from_patch(&ComplaintPatch::status_only(ComplaintStatus::Closed), timestamp());
        assert_eq!(changeset.status.as_deref(), Some("CLOSED"));
        assert!(changeset.title.is_none());
        assert!(changeset.latitude.is_none());
        assert_eq!(changeset.updated_at, timestamp());
    }

    #[rstest]
    fn unknown_role_defaults_to_user() {
        let row = UserRow {
            id: Uuid::new_v4(),
            name: "Warga Uji".into(),
            email: "warga@example.com".into(),
            role: "superuser".into(),
            password_hash: "$2b$04$hash".into(),
            token_fingerprint: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        };
        let user = row.into_user().expect("valid row");
        assert_eq!(user.role(), UserRole::User);
    }
}
