// ── View-shaping types: filters, sort, modal ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::equipment::EquipmentType;

// ── Filters ─────────────────────────────────────────────────────────

/// Server-side filter set sent with every list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Empty means no restriction.
    pub types: BTreeSet<EquipmentType>,
    /// Exact match.
    pub department: Option<String>,
    pub is_operational: Option<bool>,
    pub search: String,
}

impl FilterConfig {
    /// Number of structured filters in effect. Search text is not counted.
    pub fn active_count(&self) -> usize {
        self.types.len()
            + usize::from(self.department.is_some())
            + usize::from(self.is_operational.is_some())
    }

    /// Whether any filter, search included, narrows the result.
    pub fn is_active(&self) -> bool {
        self.active_count() > 0 || !self.search.is_empty()
    }

    /// Fold an update into this filter set.
    pub fn apply(&mut self, update: FilterUpdate) {
        self.types = update.types;
        self.department = update.department.filter(|d| !d.is_empty());
        self.is_operational = update.is_operational;
        if let Some(search) = update.search {
            self.search = search;
        }
    }
}

/// A replacement for the structured filters.
///
/// `types`, `department` and `is_operational` always replace the current
/// values; `search: None` keeps the current search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub types: BTreeSet<EquipmentType>,
    pub department: Option<String>,
    pub is_operational: Option<bool>,
    pub search: Option<String>,
}

impl From<&FilterConfig> for FilterUpdate {
    fn from(filters: &FilterConfig) -> Self {
        Self {
            types: filters.types.clone(),
            department: filters.department.clone(),
            is_operational: filters.is_operational,
            search: Some(filters.search.clone()),
        }
    }
}

// ── Sort ────────────────────────────────────────────────────────────

/// A sortable field of `Equipment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    Id,
    Name,
    Code,
    Quantity,
    Type,
    Location,
    Department,
    IsOperational,
    Notes,
    Validity,
    LastUpdate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Client-side ordering. Defaults to name ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            direction: SortDirection::Asc,
        }
    }
}

// ── Modal ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalMode {
    #[default]
    Create,
    Edit,
    View,
}
