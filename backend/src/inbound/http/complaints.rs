//! Complaint endpoints.
//!
//! Each handler resolves the caller through [`Authenticated`], so ownership
//! is always derived from the token rather than the request body.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{PageInfo, Paged};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::auth::Authenticated;
use super::envelope::Envelope;
use super::error::ApiResult;
use super::state::HttpState;
use super::validation;
use crate::domain::ports::ComplaintFilter;
use crate::domain::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintPatch, ComplaintPriority, Description,
    Error, Location, Title,
};

/// Geographic point plus the address a clerk would read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationBody {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl LocationBody {
    fn try_into_location(self, field: &str) -> Result<Location, Error> {
        Location::new(self.latitude, self.longitude, self.address)
            .map_err(|err| validation::complaint_field_error(field, &err))
    }
}

impl From<&Location> for LocationBody {
    fn from(value: &Location) -> Self {
        Self {
            latitude: value.latitude(),
            longitude: value.longitude(),
            address: value.address().to_owned(),
        }
    }
}

/// Complaint representation returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintBody {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub title: String,
    pub description: String,
    #[schema(example = "INFRASTRUCTURE")]
    pub category: String,
    #[schema(example = "MEDIUM")]
    pub priority: String,
    pub location: LocationBody,
    pub images: Vec<String>,
    #[schema(example = "OPEN")]
    pub status: String,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Complaint> for ComplaintBody {
    fn from(complaint: Complaint) -> Self {
        Self {
            id: *complaint.id().as_uuid(),
            reporter_id: *complaint.reporter_id().as_uuid(),
            title: complaint.title().as_ref().to_owned(),
            description: complaint.description().as_ref().to_owned(),
            category: complaint.category().as_str().to_owned(),
            priority: complaint.priority().as_str().to_owned(),
            location: LocationBody::from(complaint.location()),
            images: complaint.images().to_vec(),
            status: complaint.status().as_str().to_owned(),
            created_at: complaint.created_at(),
            updated_at: complaint.updated_at(),
        }
    }
}

/// Body accepted by `POST /api/complaints`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
    #[schema(example = "OTHER")]
    pub category: String,
    #[schema(example = "MEDIUM")]
    pub priority: String,
    pub location: LocationBody,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateComplaintRequest {
    fn into_draft(self) -> Result<ComplaintDraft, Error> {
        Ok(ComplaintDraft {
            title: Title::new(self.title)
                .map_err(|err| validation::complaint_field_error("title", &err))?,
            description: Description::new(self.description)
                .map_err(|err| validation::complaint_field_error("description", &err))?,
            category: ComplaintCategory::parse(&self.category)
                .map_err(|err| validation::complaint_field_error("category", &err))?,
            priority: ComplaintPriority::parse(&self.priority)
                .map_err(|err| validation::complaint_field_error("priority", &err))?,
            location: self.location.try_into_location("location")?,
            images: self.images,
        })
    }
}

/// Body accepted by `PUT /api/complaints/{id}`. Absent fields are left
/// untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComplaintRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub location: Option<LocationBody>,
    pub images: Option<Vec<String>>,
    pub status: Option<String>,
}

impl UpdateComplaintRequest {
    fn into_patch(self) -> Result<ComplaintPatch, Error> {
        Ok(ComplaintPatch {
            title: self
                .title
                .map(Title::new)
                .transpose()
                .map_err(|err| validation::complaint_field_error("title", &err))?,
            description: self
                .description
                .map(Description::new)
                .transpose()
                .map_err(|err| validation::complaint_field_error("description", &err))?,
            category: self
                .category
                .as_deref()
                .map(ComplaintCategory::parse)
                .transpose()
                .map_err(|err| validation::complaint_field_error("category", &err))?,
            priority: self
                .priority
                .as_deref()
                .map(ComplaintPriority::parse)
                .transpose()
                .map_err(|err| validation::complaint_field_error("priority", &err))?,
            location: self
                .location
                .map(|location| location.try_into_location("location"))
                .transpose()?,
            images: self.images,
            status: self
                .status
                .as_deref()
                .map(validation::parse_status)
                .transpose()?,
        })
    }
}

/// Body accepted by `PATCH /api/complaints/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    #[schema(example = "IN_PROGRESS")]
    pub status: String,
}

/// Query parameters for `GET /api/complaints`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Restrict to complaints owned by this user (admin only; other callers
    /// are always scoped to themselves).
    pub reporter: Option<String>,
    /// Restrict to a single status token.
    pub status: Option<String>,
    /// One-based page number, default 1.
    pub page: Option<u32>,
    /// Page size, default 10, maximum 100.
    pub limit: Option<u32>,
}

/// Listing payload: one page of complaints plus the pagination window.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListBody {
    pub complaints: Vec<ComplaintBody>,
    #[schema(value_type = Object)]
    pub pagination: PageInfo,
}

impl From<Paged<Complaint>> for ListBody {
    fn from(paged: Paged<Complaint>) -> Self {
        Self {
            complaints: paged.items.into_iter().map(ComplaintBody::from).collect(),
            pagination: paged.info,
        }
    }
}

/// File a new complaint owned by the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint created", body = ComplaintBody),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_token" = []))
)]
#[post("/complaints")]
pub async fn create_complaint(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreateComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let complaint = state.complaints.create(auth.actor(), draft).await?;
    Ok(HttpResponse::Created().json(Envelope::data(ComplaintBody::from(complaint))))
}

/// List complaints, newest first. Non-admin callers only ever see their own.
#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "complaints",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of complaints", body = ListBody),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_token" = []))
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let filter = ComplaintFilter {
        reporter: query
            .reporter
            .as_deref()
            .map(validation::parse_reporter)
            .transpose()?,
        status: query
            .status
            .as_deref()
            .map(validation::parse_status)
            .transpose()?,
    };
    let page = validation::page_request(query.page, query.limit)?;
    let listed = state.complaints.list(auth.actor(), filter, page).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(ListBody::from(listed))))
}

/// Fetch a single complaint visible to the caller.
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "complaints",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "The complaint", body = ComplaintBody),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "No visible complaint with this id"),
    ),
    security(("bearer_token" = []))
)]
#[get("/complaints/{id}")]
pub async fn get_complaint(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = validation::parse_complaint_id(&path)?;
    let complaint = state.complaints.get(auth.actor(), &id).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(ComplaintBody::from(complaint))))
}

/// Merge supplied fields into a complaint and refresh its `updatedAt`.
#[utoipa::path(
    put,
    path = "/api/complaints/{id}",
    tag = "complaints",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = UpdateComplaintRequest,
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintBody),
        (status = 404, description = "No visible complaint with this id"),
    ),
    security(("bearer_token" = []))
)]
#[put("/complaints/{id}")]
pub async fn update_complaint(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let id = validation::parse_complaint_id(&path)?;
    let patch = payload.into_inner().into_patch()?;
    let complaint = state.complaints.update(auth.actor(), &id, patch).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(ComplaintBody::from(complaint))))
}

/// Status-only update path used by administrator dashboards.
#[utoipa::path(
    patch,
    path = "/api/complaints/{id}/status",
    tag = "complaints",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintBody),
        (status = 400, description = "Unknown status token"),
        (status = 404, description = "No visible complaint with this id"),
    ),
    security(("bearer_token" = []))
)]
#[patch("/complaints/{id}/status")]
pub async fn update_complaint_status(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<HttpResponse> {
    let id = validation::parse_complaint_id(&path)?;
    let status = validation::parse_status(&payload.status)?;
    let complaint = state
        .complaints
        .update_status(auth.actor(), &id, status)
        .await?;
    Ok(HttpResponse::Ok().json(Envelope::data(ComplaintBody::from(complaint))))
}

/// Remove a complaint the caller is allowed to see.
#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    tag = "complaints",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 204, description = "Complaint removed"),
        (status = 404, description = "No visible complaint with this id"),
    ),
    security(("bearer_token" = []))
)]
#[delete("/complaints/{id}")]
pub async fn delete_complaint(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = validation::parse_complaint_id(&path)?;
    state.complaints.delete(auth.actor(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
