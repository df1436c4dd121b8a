// Wire types for the equipment and auth resources.
//
// These mirror the backend JSON exactly (camelCase keys, timestamps as
// strings, equipment type as a plain string). `stockroom-core` converts
// them into domain types; nothing here interprets field values.

use serde::{Deserialize, Serialize};

// ── Equipment ───────────────────────────────────────────────────────

/// An equipment record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(rename = "type")]
    pub equipment_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub is_operational: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub validity: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /equipment`: every user-supplied field, no id or timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentRequest {
    pub name: String,
    pub code: String,
    pub quantity: f64,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub location: String,
    pub department: String,
    pub is_operational: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity: Option<String>,
}

/// Body of `PUT /equipment/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_operational: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity: Option<String>,
}

/// Query for `GET /equipment`. Every field is optional; empty values are
/// not sent at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentQuery {
    pub search: Option<String>,
    /// Wire names of the selected types, joined with `,` on the wire.
    pub types: Vec<String>,
    pub department: Option<String>,
    pub is_operational: Option<bool>,
}

impl EquipmentQuery {
    /// Query-string pairs in the order the backend documents them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_owned()));
        }
        if !self.types.is_empty() {
            pairs.push(("types", self.types.join(",")));
        }
        if let Some(department) = self.department.as_deref().filter(|d| !d.is_empty()) {
            pairs.push(("department", department.to_owned()));
        }
        if let Some(flag) = self.is_operational {
            pairs.push(("isOperational", flag.to_string()));
        }
        pairs
    }
}

// ── Auth ────────────────────────────────────────────────────────────

/// The authenticated user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Response of both `POST /auth/login` and `GET /auth/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
