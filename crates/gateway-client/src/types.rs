//! Wire types exchanged with the complaint service.

use chrono::{DateTime, Utc};
use pagination::PageInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response envelope wrapped around every server payload.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[expect(dead_code, reason = "success is implied by the HTTP status")]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Where a reported issue is located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// A complaint as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub location: Location,
    pub images: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for filing a new complaint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// Partial update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One page of complaints.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplaintPage {
    pub complaints: Vec<Complaint>,
    pub pagination: PageInfo,
}

/// Optional restrictions and paging for a listing request.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Restrict to complaints owned by this user (admin only).
    pub reporter: Option<Uuid>,
    /// Restrict to one status token.
    pub status: Option<String>,
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

impl ListParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(reporter) = self.reporter {
            query.push(("reporter", reporter.to_string()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::{Complaint, ComplaintUpdate, Envelope, ListParams};

    #[test]
    fn complaint_envelope_deserialises() {
        let body = json!({
            "success": true,
            "data": {
                "id": "7b31e4f4-1f43-4a2e-bb94-0f24d783f5a1",
                "reporterId": "f2a62648-6e84-43ba-9a72-3b1f3a4d9f01",
                "title": "Jalan berlubang",
                "description": "Lubang besar di depan pasar",
                "category": "INFRASTRUCTURE",
                "priority": "HIGH",
                "location": {"latitude": -6.2, "longitude": 106.8, "address": "Jl. Merdeka 1"},
                "images": [],
                "status": "OPEN",
                "createdAt": "2026-08-20T09:00:00Z",
                "updatedAt": "2026-08-20T09:00:00Z"
            }
        });
        let envelope: Envelope<Complaint> =
            serde_json::from_value(body).expect("envelope parses");
        let complaint = envelope.data.expect("data present");
        assert_eq!(complaint.status, "OPEN");
        assert_eq!(complaint.location.address, "Jl. Merdeka 1");
    }

    #[test]
    fn update_serialises_only_present_fields() {
        let update = ComplaintUpdate {
            description: Some("Sudah makin dalam".into()),
            ..ComplaintUpdate::default()
        };
        let rendered = serde_json::to_value(&update).expect("serialises");
        assert_eq!(rendered, json!({"description": "Sudah makin dalam"}));
    }

    #[test]
    fn list_params_render_as_query_pairs() {
        let reporter = Uuid::new_v4();
        let params = ListParams {
            reporter: Some(reporter),
            status: Some("OPEN".into()),
            page: Some(2),
            limit: Some(10),
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("reporter", reporter.to_string()),
                ("status", "OPEN".to_string()),
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }
}
