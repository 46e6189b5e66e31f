//! Complaint data model: the central entity of the portal.
//!
//! A complaint always has exactly one owner (`reporter_id`), set at creation
//! and never changed. Status transitions are deliberately unconstrained; the
//! portal's workflow is advisory, not a state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::users::UserId;

/// Validation errors returned by complaint value constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum ComplaintValidationError {
    /// Identifier was not a UUID.
    InvalidId,
    /// Title was missing or blank once trimmed.
    EmptyTitle,
    /// Description was missing or blank once trimmed.
    EmptyDescription,
    /// Latitude outside [-90, 90].
    LatitudeOutOfRange {
        /// The rejected value.
        value: f64,
    },
    /// Longitude outside [-180, 180].
    LongitudeOutOfRange {
        /// The rejected value.
        value: f64,
    },
    /// Location address was blank.
    EmptyAddress,
    /// Unknown status, category, or priority token.
    UnknownToken {
        /// The rejected token.
        value: String,
    },
}

impl fmt::Display for ComplaintValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "complaint id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
            Self::EmptyAddress => write!(f, "location address must not be empty"),
            Self::UnknownToken { value } => write!(f, "unknown value: {value}"),
        }
    }
}

impl std::error::Error for ComplaintValidationError {}

/// Stable complaint identifier, server-assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(Uuid);

impl ComplaintId {
    /// Validate and construct a [`ComplaintId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ComplaintValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ComplaintValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`ComplaintId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle status of a complaint.
///
/// Single canonical vocabulary; any status may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    /// Newly submitted, default at creation.
    Open,
    /// Picked up by an administrator.
    InProgress,
    /// Resolved or rejected; no further action expected.
    Closed,
}

impl ComplaintStatus {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Closed => "CLOSED",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Result<Self, ComplaintValidationError> {
        match value {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "CLOSED" => Ok(Self::Closed),
            other => Err(ComplaintValidationError::UnknownToken {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad category a reporter files the complaint under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintCategory {
    /// Roads, bridges, drainage, street lighting.
    Infrastructure,
    /// Counter services, permits, public facilities.
    PublicService,
    /// Anything else.
    Other,
}

impl ComplaintCategory {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Infrastructure => "INFRASTRUCTURE",
            Self::PublicService => "PUBLIC_SERVICE",
            Self::Other => "OTHER",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Result<Self, ComplaintValidationError> {
        match value {
            "INFRASTRUCTURE" => Ok(Self::Infrastructure),
            "PUBLIC_SERVICE" => Ok(Self::PublicService),
            "OTHER" => Ok(Self::Other),
            other => Err(ComplaintValidationError::UnknownToken {
                value: other.to_owned(),
            }),
        }
    }
}

/// Reporter-assessed urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintPriority {
    /// Cosmetic or low-impact issue.
    Low,
    /// Default urgency.
    Medium,
    /// Safety-relevant or blocking issue.
    High,
}

impl ComplaintPriority {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> Result<Self, ComplaintValidationError> {
        match value {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(ComplaintValidationError::UnknownToken {
                value: other.to_owned(),
            }),
        }
    }
}

/// Non-empty complaint title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`].
    pub fn new(title: impl Into<String>) -> Result<Self, ComplaintValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ComplaintValidationError::EmptyTitle);
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl TryFrom<String> for Title {
    type Error = ComplaintValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-empty complaint description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    /// Validate and construct a [`Description`].
    pub fn new(description: impl Into<String>) -> Result<Self, ComplaintValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ComplaintValidationError::EmptyDescription);
        }
        Ok(Self(description))
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Description> for String {
    fn from(value: Description) -> Self {
        value.0
    }
}

impl TryFrom<String> for Description {
    type Error = ComplaintValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Where the reported issue is located.
///
/// ## Invariants
/// - `latitude` ∈ [-90, 90], `longitude` ∈ [-180, 180].
/// - `address` is non-empty; all three fields are required together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "LocationDto", into = "LocationDto")]
pub struct Location {
    latitude: f64,
    longitude: f64,
    address: String,
}

impl Location {
    /// Validate and construct a [`Location`].
    pub fn new(
        latitude: f64,
        longitude: f64,
        address: impl Into<String>,
    ) -> Result<Self, ComplaintValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ComplaintValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ComplaintValidationError::LongitudeOutOfRange { value: longitude });
        }
        let address = address.into();
        if address.trim().is_empty() {
            return Err(ComplaintValidationError::EmptyAddress);
        }
        Ok(Self {
            latitude,
            longitude,
            address,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Free-text address shown to administrators.
    pub fn address(&self) -> &str {
        self.address.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationDto {
    latitude: f64,
    longitude: f64,
    address: String,
}

impl From<Location> for LocationDto {
    fn from(value: Location) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
            address: value.address,
        }
    }
}

impl TryFrom<LocationDto> for Location {
    type Error = ComplaintValidationError;

    fn try_from(value: LocationDto) -> Result<Self, Self::Error> {
        Self::new(value.latitude, value.longitude, value.address)
    }
}

/// Validated input for creating a complaint.
///
/// The owner is not part of the draft; the service takes it from the
/// authenticated actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintDraft {
    /// Short summary of the issue.
    pub title: Title,
    /// Full description of the issue.
    pub description: Description,
    /// Filing category.
    pub category: ComplaintCategory,
    /// Reporter-assessed urgency.
    pub priority: ComplaintPriority,
    /// Where the issue is located.
    pub location: Location,
    /// Image URLs attached by the reporter; may be empty.
    pub images: Vec<String>,
}

/// Partial update merged into an existing complaint.
///
/// Only supplied fields change; everything else is left untouched. An empty
/// patch still refreshes `updated_at`, matching the original service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintPatch {
    /// Replacement title, when supplied.
    pub title: Option<Title>,
    /// Replacement description, when supplied.
    pub description: Option<Description>,
    /// Replacement category, when supplied.
    pub category: Option<ComplaintCategory>,
    /// Replacement priority, when supplied.
    pub priority: Option<ComplaintPriority>,
    /// Replacement location, when supplied (all three fields together).
    pub location: Option<Location>,
    /// Replacement image list, when supplied.
    pub images: Option<Vec<String>>,
    /// Replacement status, when supplied.
    pub status: Option<ComplaintStatus>,
}

impl ComplaintPatch {
    /// A patch that changes nothing except `updated_at`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A status-only patch, as produced by the dedicated status endpoint.
    pub fn status_only(status: ComplaintStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Citizen-submitted issue record.
///
/// ## Invariants
/// - `reporter_id` is set at creation and never changes.
/// - `created_at` is set once; `updated_at` moves on every mutation and
///   equals `created_at` until the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct Complaint {
    id: ComplaintId,
    reporter_id: UserId,
    title: Title,
    description: Description,
    category: ComplaintCategory,
    priority: ComplaintPriority,
    location: Location,
    images: Vec<String>,
    status: ComplaintStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Complaint {
    /// Create a new complaint from a draft, owned by `reporter_id`.
    ///
    /// Status starts at [`ComplaintStatus::Open`] and both timestamps are set
    /// to `created_at`.
    pub fn create(
        id: ComplaintId,
        reporter_id: UserId,
        draft: ComplaintDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            reporter_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            location: draft.location,
            images: draft.images,
            status: ComplaintStatus::Open,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rehydrate a complaint from storage. The adapter is trusted to hand
    /// back values that satisfied validation at write time.
    #[expect(clippy::too_many_arguments, reason = "storage rehydration needs every column")]
    pub fn from_parts(
        id: ComplaintId,
        reporter_id: UserId,
        title: Title,
        description: Description,
        category: ComplaintCategory,
        priority: ComplaintPriority,
        location: Location,
        images: Vec<String>,
        status: ComplaintStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            reporter_id,
            title,
            description,
            category,
            priority,
            location,
            images,
            status,
            created_at,
            updated_at,
        }
    }

    /// Merge a partial update into this complaint and refresh `updated_at`.
    pub fn apply(&mut self, patch: ComplaintPatch, updated_at: DateTime<Utc>) {
        let ComplaintPatch {
            title,
            description,
            category,
            priority,
            location,
            images,
            status,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(images) = images {
            self.images = images;
        }
        if let Some(status) = status {
            self.status = status;
        }
        self.updated_at = updated_at;
    }

    /// Stable identifier.
    pub fn id(&self) -> &ComplaintId {
        &self.id
    }

    /// Owning user's identifier.
    pub fn reporter_id(&self) -> &UserId {
        &self.reporter_id
    }

    /// Short summary of the issue.
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Full description of the issue.
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Filing category.
    pub fn category(&self) -> ComplaintCategory {
        self.category
    }

    /// Reporter-assessed urgency.
    pub fn priority(&self) -> ComplaintPriority {
        self.priority
    }

    /// Where the issue is located.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Attached image URLs, in submission order.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ComplaintStatus {
        self.status
    }

    /// Creation timestamp, immutable.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn fixture_draft() -> ComplaintDraft {
        ComplaintDraft {
            title: Title::new("Jalan berlubang").expect("valid title"),
            description: Description::new("Lubang besar di depan pasar").expect("valid"),
            category: ComplaintCategory::Other,
            priority: ComplaintPriority::Medium,
            location: Location::new(-6.2, 106.8, "Jl. Merdeka 1").expect("valid location"),
            images: Vec::new(),
        }
    }

    #[test]
    fn create_defaults_status_and_timestamps() {
        let now = fixture_timestamp();
        let complaint = Complaint::create(
            ComplaintId::random(),
            UserId::random(),
            fixture_draft(),
            now,
        );
        assert_eq!(complaint.status(), ComplaintStatus::Open);
        assert_eq!(complaint.created_at(), now);
        assert_eq!(complaint.updated_at(), now);
        assert!(complaint.images().is_empty());
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let now = fixture_timestamp();
        let later = now + chrono::TimeDelta::seconds(90);
        let mut complaint = Complaint::create(
            ComplaintId::random(),
            UserId::random(),
            fixture_draft(),
            now,
        );
        let patch = ComplaintPatch {
            description: Some(Description::new("Sudah makin dalam").expect("valid")),
            ..ComplaintPatch::default()
        };

        complaint.apply(patch, later);

        assert_eq!(complaint.description().as_ref(), "Sudah makin dalam");
        assert_eq!(complaint.title().as_ref(), "Jalan berlubang");
        assert_eq!(complaint.category(), ComplaintCategory::Other);
        assert_eq!(complaint.status(), ComplaintStatus::Open);
        assert_eq!(complaint.created_at(), now);
        assert_eq!(complaint.updated_at(), later);
    }

    #[test]
    fn status_only_patch_changes_status_and_timestamp() {
        let now = fixture_timestamp();
        let later = now + chrono::TimeDelta::seconds(5);
        let mut complaint = Complaint::create(
            ComplaintId::random(),
            UserId::random(),
            fixture_draft(),
            now,
        );

        complaint.apply(ComplaintPatch::status_only(ComplaintStatus::InProgress), later);

        assert_eq!(complaint.status(), ComplaintStatus::InProgress);
        assert_eq!(complaint.updated_at(), later);
        assert_eq!(complaint.title().as_ref(), "Jalan berlubang");
    }

    #[rstest]
    #[case(ComplaintStatus::Open, "OPEN")]
    #[case(ComplaintStatus::InProgress, "IN_PROGRESS")]
    #[case(ComplaintStatus::Closed, "CLOSED")]
    fn status_tokens_round_trip(#[case] status: ComplaintStatus, #[case] token: &str) {
        assert_eq!(status.as_str(), token);
        assert_eq!(ComplaintStatus::parse(token).expect("parses"), status);
        let json = serde_json::to_string(&status).expect("serializes");
        assert_eq!(json, format!("\"{token}\""));
    }

    #[rstest]
    #[case("open")]
    #[case("in-progress")]
    #[case("RESOLVED")]
    fn legacy_status_tokens_are_rejected(#[case] token: &str) {
        assert!(ComplaintStatus::parse(token).is_err());
    }

    #[rstest]
    #[case(91.0, 0.0, "x")]
    #[case(-91.0, 0.0, "x")]
    #[case(0.0, 181.0, "x")]
    #[case(0.0, -181.0, "x")]
    fn location_rejects_out_of_range_coordinates(
        #[case] latitude: f64,
        #[case] longitude: f64,
        #[case] address: &str,
    ) {
        assert!(Location::new(latitude, longitude, address).is_err());
    }

    #[test]
    fn location_rejects_blank_address() {
        assert_eq!(
            Location::new(0.0, 0.0, "  ").expect_err("blank address"),
            ComplaintValidationError::EmptyAddress
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn title_and_description_reject_blank_input(#[case] input: &str) {
        assert!(Title::new(input).is_err());
        assert!(Description::new(input).is_err());
    }
}
