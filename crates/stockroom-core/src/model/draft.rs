// ── Form models and validation ──
//
// `EquipmentDraft` backs the create/edit form; `EquipmentPatch` is the
// partial update. Both are validated locally before any network call.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::equipment::{Equipment, EquipmentType};

// ── FieldErrors ─────────────────────────────────────────────────────

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_owned(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.0.values() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

// ── Rules ───────────────────────────────────────────────────────────

const NAME_REQUIRED: &str = "Name is required";
const CODE_REQUIRED: &str = "Code is required";
const QUANTITY_NEGATIVE: &str = "Quantity cannot be negative";
const LOCATION_REQUIRED: &str = "Location is required";
const DEPARTMENT_REQUIRED: &str = "Department is required";

fn check_required(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

fn check_quantity(errors: &mut FieldErrors, quantity: f64) {
    if !quantity.is_finite() || quantity < 0.0 {
        errors.insert("quantity", QUANTITY_NEGATIVE);
    }
}

// ── EquipmentDraft ──────────────────────────────────────────────────

/// Every user-editable field of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDraft {
    pub name: String,
    pub code: String,
    pub quantity: f64,
    pub equipment_type: EquipmentType,
    pub location: String,
    pub department: String,
    pub is_operational: bool,
    pub notes: Option<String>,
    pub validity: Option<NaiveDate>,
}

impl Default for EquipmentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: String::new(),
            quantity: 0.0,
            equipment_type: EquipmentType::Generic,
            location: String::new(),
            department: String::new(),
            is_operational: true,
            notes: None,
            validity: None,
        }
    }
}

impl EquipmentDraft {
    /// Pre-fill a draft from an existing record for editing.
    pub fn from_equipment(item: &Equipment) -> Self {
        Self {
            name: item.name.clone(),
            code: item.code.clone(),
            quantity: item.quantity,
            equipment_type: item.equipment_type,
            location: item.location.clone(),
            department: item.department.clone(),
            is_operational: item.is_operational,
            notes: item.notes.clone(),
            validity: item.validity_date(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "name", &self.name, NAME_REQUIRED);
        check_required(&mut errors, "code", &self.code, CODE_REQUIRED);
        check_quantity(&mut errors, self.quantity);
        check_required(&mut errors, "location", &self.location, LOCATION_REQUIRED);
        check_required(
            &mut errors,
            "department",
            &self.department,
            DEPARTMENT_REQUIRED,
        );
        errors.into_result()
    }

    /// Full patch carrying every field of the draft, for the edit form.
    ///
    /// Notes are always sent so that clearing them in the form clears them
    /// on the server. An empty validity is left untouched.
    pub fn to_patch(&self) -> EquipmentPatch {
        EquipmentPatch {
            name: Some(self.name.clone()),
            code: Some(self.code.clone()),
            quantity: Some(self.quantity),
            equipment_type: Some(self.equipment_type),
            location: Some(self.location.clone()),
            department: Some(self.department.clone()),
            is_operational: Some(self.is_operational),
            notes: Some(self.notes.clone().unwrap_or_default()),
            validity: self.validity,
        }
    }
}

// ── EquipmentPatch ──────────────────────────────────────────────────

/// Partial update. Absent fields are left untouched on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub quantity: Option<f64>,
    pub equipment_type: Option<EquipmentType>,
    pub location: Option<String>,
    pub department: Option<String>,
    pub is_operational: Option<bool>,
    pub notes: Option<String>,
    pub validity: Option<NaiveDate>,
}

impl EquipmentPatch {
    /// Validate only the fields present in the patch.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            check_required(&mut errors, "name", name, NAME_REQUIRED);
        }
        if let Some(code) = &self.code {
            check_required(&mut errors, "code", code, CODE_REQUIRED);
        }
        if let Some(quantity) = self.quantity {
            check_quantity(&mut errors, quantity);
        }
        if let Some(location) = &self.location {
            check_required(&mut errors, "location", location, LOCATION_REQUIRED);
        }
        if let Some(department) = &self.department {
            check_required(&mut errors, "department", department, DEPARTMENT_REQUIRED);
        }
        errors.into_result()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
