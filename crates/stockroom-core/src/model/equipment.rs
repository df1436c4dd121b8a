// ── Equipment domain types ──

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── EquipmentId ─────────────────────────────────────────────────────

/// Opaque server-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(String);

impl EquipmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EquipmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EquipmentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── EquipmentType ───────────────────────────────────────────────────

/// Equipment category. Wire names are upper-case.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EquipmentType {
    /// Personal protective equipment.
    Epi,
    /// Collective protective equipment.
    Epc,
    Tool,
    Material,
    Generic,
}

impl EquipmentType {
    /// Parse a wire name, falling back to `Generic` for anything unknown.
    pub fn from_wire(raw: &str) -> Self {
        raw.trim()
            .to_ascii_uppercase()
            .parse()
            .unwrap_or(Self::Generic)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Epi => "Personal protective",
            Self::Epc => "Collective protective",
            Self::Tool => "Tool",
            Self::Material => "Material",
            Self::Generic => "Generic",
        }
    }
}

// ── ValidityStatus ──────────────────────────────────────────────────

/// Days ahead of expiry at which a record counts as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Expiry classification of a record relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidityStatus {
    /// No validity recorded.
    None,
    Valid,
    ExpiringSoon,
    Expired,
}

impl ValidityStatus {
    pub fn classify(validity: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(validity) = validity else {
            return Self::None;
        };
        if validity < now {
            Self::Expired
        } else if validity <= now + Duration::days(EXPIRING_SOON_DAYS) {
            Self::ExpiringSoon
        } else {
            Self::Valid
        }
    }
}

// ── Equipment ───────────────────────────────────────────────────────

/// A single inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub code: String,
    pub quantity: f64,
    pub equipment_type: EquipmentType,
    pub location: String,
    pub department: String,
    pub is_operational: bool,
    pub notes: Option<String>,
    pub validity: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Equipment {
    pub fn validity_status(&self, now: DateTime<Utc>) -> ValidityStatus {
        ValidityStatus::classify(self.validity, now)
    }

    /// Calendar date of expiry, ignoring time of day.
    pub fn validity_date(&self) -> Option<NaiveDate> {
        self.validity.map(|v| v.date_naive())
    }
}
