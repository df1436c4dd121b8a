// ── API-to-domain type conversions ──
//
// Bridges raw `stockroom_api` wire types into canonical `crate::model`
// types and back. Parsing is lenient on the way in: unknown equipment types
// become `Generic` and unparseable timestamps become `None`, so one bad
// record never fails a whole listing.

use chrono::{DateTime, NaiveDate, Utc};

use stockroom_api::{
    CreateEquipmentRequest, EquipmentQuery, EquipmentResponse, UpdateEquipmentRequest,
    UserResponse,
};

use crate::model::{
    Equipment, EquipmentDraft, EquipmentPatch, EquipmentType, FilterConfig, User,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an optional ISO-8601 string, silently dropping unparseable values.
fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Bare calendar dates ("2027-01-31") are midnight UTC.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Wire form of a calendar validity date: midnight UTC, millisecond precision.
pub fn validity_to_wire(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).cloned()
}

// ── Inbound ─────────────────────────────────────────────────────────

impl From<EquipmentResponse> for Equipment {
    fn from(raw: EquipmentResponse) -> Self {
        Self {
            equipment_type: EquipmentType::from_wire(&raw.equipment_type),
            validity: parse_datetime(raw.validity.as_deref()),
            last_update: parse_datetime(raw.last_update.as_deref()),
            created_at: parse_datetime(raw.created_at.as_deref()),
            updated_at: parse_datetime(raw.updated_at.as_deref()),
            notes: non_blank(raw.notes.as_ref()),
            id: raw.id.into(),
            name: raw.name,
            code: raw.code,
            quantity: raw.quantity,
            location: raw.location,
            department: raw.department,
            is_operational: raw.is_operational,
        }
    }
}

impl From<UserResponse> for User {
    fn from(raw: UserResponse) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            email: raw.email,
        }
    }
}

// ── Outbound ────────────────────────────────────────────────────────

impl From<&FilterConfig> for EquipmentQuery {
    fn from(filters: &FilterConfig) -> Self {
        Self {
            search: Some(filters.search.clone()).filter(|s| !s.is_empty()),
            types: filters.types.iter().map(ToString::to_string).collect(),
            department: non_blank(filters.department.as_ref()),
            is_operational: filters.is_operational,
        }
    }
}

impl From<&EquipmentDraft> for CreateEquipmentRequest {
    fn from(draft: &EquipmentDraft) -> Self {
        Self {
            name: draft.name.trim().to_owned(),
            code: draft.code.trim().to_owned(),
            quantity: draft.quantity,
            equipment_type: draft.equipment_type.to_string(),
            location: draft.location.trim().to_owned(),
            department: draft.department.trim().to_owned(),
            is_operational: draft.is_operational,
            notes: non_blank(draft.notes.as_ref()),
            validity: draft.validity.map(validity_to_wire),
        }
    }
}

impl From<&EquipmentPatch> for UpdateEquipmentRequest {
    fn from(patch: &EquipmentPatch) -> Self {
        Self {
            name: patch.name.as_deref().map(str::trim).map(str::to_owned),
            code: patch.code.as_deref().map(str::trim).map(str::to_owned),
            quantity: patch.quantity,
            equipment_type: patch.equipment_type.map(|t| t.to_string()),
            location: patch.location.as_deref().map(str::trim).map(str::to_owned),
            department: patch.department.as_deref().map(str::trim).map(str::to_owned),
            is_operational: patch.is_operational,
            notes: patch.notes.clone(),
            validity: patch.validity.map(validity_to_wire),
        }
    }
}
