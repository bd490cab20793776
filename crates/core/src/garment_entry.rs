//! Garment entry sub-form and the pending entry list.
//!
//! [`GarmentEntryForm`] mirrors the inputs an operator fills in for one
//! donated item. Its measurement inputs are shown and enabled according to
//! the [`garment_schema`](crate::garment_schema) of the selected type.
//! [`PendingEntries`] holds the immutable snapshots taken each time the form
//! passes validation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::garment_schema::{fields_for, GarmentTypeCode, MeasurementField, ALL_MEASUREMENT_FIELDS};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Selectable options
// ---------------------------------------------------------------------------

/// An option picked from the garment type selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentTypeOption {
    pub code: GarmentTypeCode,
    pub label: String,
}

impl GarmentTypeOption {
    pub fn new(code: GarmentTypeCode, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }
}

/// A value/label pair picked from a choice input (gender radio, color list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// Measurement values captured with an entry. Fields the garment type does
/// not enable are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(rename = "cloth_bust")]
    pub bust: String,
    #[serde(rename = "cloth_waist")]
    pub waist: String,
    #[serde(rename = "cloth_hip")]
    pub hip: String,
    #[serde(rename = "cloth_arm")]
    pub arm: String,
    #[serde(rename = "cloth_length")]
    pub length: String,
    #[serde(rename = "cloth_foot")]
    pub foot: String,
}

impl Measurements {
    fn set(&mut self, field: MeasurementField, value: String) {
        let slot = match field {
            MeasurementField::Bust => &mut self.bust,
            MeasurementField::Waist => &mut self.waist,
            MeasurementField::Hip => &mut self.hip,
            MeasurementField::Arm => &mut self.arm,
            MeasurementField::Length => &mut self.length,
            MeasurementField::Foot => &mut self.foot,
        };
        *slot = value;
    }
}

/// One donated item, as captured when the operator pressed "add".
///
/// Serialized with the keys the intake service expects (`cloth_type`,
/// `cloth_type_str`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentEntry {
    /// Donor associated with the session when the entry was added.
    pub donor_id: Option<DbId>,
    #[serde(rename = "cloth_type")]
    pub garment_type: GarmentTypeCode,
    #[serde(rename = "cloth_type_str")]
    pub garment_type_label: String,
    #[serde(rename = "cloth_gender")]
    pub gender: Option<String>,
    #[serde(rename = "cloth_gender_str")]
    pub gender_label: Option<String>,
    #[serde(rename = "cloth_color")]
    pub color: String,
    #[serde(rename = "cloth_color_str")]
    pub color_label: String,
    #[serde(flatten)]
    pub measurements: Measurements,
}

/// Why the entry form refused to produce an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EntryRejection {
    #[error("no garment type selected")]
    NoTypeSelected,

    #[error("required garment fields are incomplete")]
    IncompleteFields,
}

impl EntryRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTypeSelected => "no-type-selected",
            Self::IncompleteFields => "incomplete-fields",
        }
    }
}

// ---------------------------------------------------------------------------
// Entry form
// ---------------------------------------------------------------------------

/// State of a single measurement input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementInput {
    pub value: String,
    pub enabled: bool,
    pub visible: bool,
}

/// Input that should receive focus next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFocus {
    GarmentType,
}

/// The garment entry sub-form.
#[derive(Debug, Clone)]
pub struct GarmentEntryForm {
    garment_type: Option<GarmentTypeOption>,
    gender: Option<Choice>,
    color: Option<Choice>,
    inputs: [MeasurementInput; 6],
    focus: Option<EntryFocus>,
}

impl Default for GarmentEntryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl GarmentEntryForm {
    /// A blank form: no type, every measurement visible but disabled.
    pub fn new() -> Self {
        let mut form = Self {
            garment_type: None,
            gender: None,
            color: None,
            inputs: Default::default(),
            focus: None,
        };
        form.clear_inputs(true);
        form
    }

    /// Change the garment type.
    ///
    /// Every measurement input is emptied, hidden and disabled (gender and
    /// color are cleared too), then the fields the schema lists for the new
    /// type are shown and enabled.
    pub fn select_type(&mut self, option: GarmentTypeOption) {
        self.clear_inputs(false);
        for field in fields_for(option.code) {
            let input = &mut self.inputs[index_of(*field)];
            input.visible = true;
            input.enabled = true;
        }
        self.garment_type = Some(option);
    }

    /// Clear the type selection and return every input to its blank state.
    pub fn reset(&mut self) {
        self.garment_type = None;
        self.clear_inputs(true);
    }

    pub fn select_gender(&mut self, gender: Choice) {
        self.gender = Some(gender);
    }

    pub fn select_color(&mut self, color: Choice) {
        self.color = Some(color);
    }

    /// Type a value into a measurement input. Disabled inputs reject input.
    pub fn set_measurement(
        &mut self,
        field: MeasurementField,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        let input = &mut self.inputs[index_of(field)];
        if !input.enabled {
            return Err(CoreError::Validation(format!(
                "Measurement field '{}' is disabled for the selected garment type",
                field.as_str()
            )));
        }
        input.value = value.into();
        Ok(())
    }

    pub fn garment_type(&self) -> Option<&GarmentTypeOption> {
        self.garment_type.as_ref()
    }

    pub fn gender(&self) -> Option<&Choice> {
        self.gender.as_ref()
    }

    pub fn color(&self) -> Option<&Choice> {
        self.color.as_ref()
    }

    pub fn input(&self, field: MeasurementField) -> &MeasurementInput {
        &self.inputs[index_of(field)]
    }

    /// Fields currently enabled, in form order.
    pub fn enabled_fields(&self) -> Vec<MeasurementField> {
        ALL_MEASUREMENT_FIELDS
            .into_iter()
            .filter(|field| self.input(*field).enabled)
            .collect()
    }

    pub fn focus(&self) -> Option<EntryFocus> {
        self.focus
    }

    /// Check the form without modifying it.
    ///
    /// A type must be selected, a color must be chosen, and every enabled
    /// measurement must hold a value greater than zero. A blank value is
    /// never greater than zero, so no separate emptiness check is needed.
    pub fn validate(&self) -> Result<(), EntryRejection> {
        if self.garment_type.is_none() {
            return Err(EntryRejection::NoTypeSelected);
        }

        let color_ok = self
            .color
            .as_ref()
            .is_some_and(|color| !color.value.is_empty());
        let measurements_ok = self
            .inputs
            .iter()
            .filter(|input| input.enabled)
            .all(|input| is_positive(&input.value));

        if color_ok && measurements_ok {
            Ok(())
        } else {
            Err(EntryRejection::IncompleteFields)
        }
    }

    /// Validate, snapshot and reset the form in one step.
    ///
    /// On success the form is back to its blank state with focus on the
    /// type selector. On rejection the form is left untouched.
    pub fn take_entry(&mut self, donor_id: Option<DbId>) -> Result<GarmentEntry, EntryRejection> {
        self.validate()?;
        let entry = self.snapshot(donor_id)?;
        self.reset();
        self.focus = Some(EntryFocus::GarmentType);
        Ok(entry)
    }

    fn snapshot(&self, donor_id: Option<DbId>) -> Result<GarmentEntry, EntryRejection> {
        let garment_type = self
            .garment_type
            .as_ref()
            .ok_or(EntryRejection::NoTypeSelected)?;
        let color = self.color.as_ref().ok_or(EntryRejection::IncompleteFields)?;

        let mut measurements = Measurements::default();
        for field in ALL_MEASUREMENT_FIELDS {
            measurements.set(field, self.input(field).value.clone());
        }

        Ok(GarmentEntry {
            donor_id,
            garment_type: garment_type.code,
            garment_type_label: garment_type.label.clone(),
            gender: self.gender.as_ref().map(|g| g.value.clone()),
            gender_label: self.gender.as_ref().map(|g| g.label.clone()),
            color: color.value.clone(),
            color_label: color.label.clone(),
            measurements,
        })
    }

    fn clear_inputs(&mut self, visible: bool) {
        self.gender = None;
        self.color = None;
        for input in &mut self.inputs {
            input.value.clear();
            input.enabled = false;
            input.visible = visible;
        }
    }
}

fn index_of(field: MeasurementField) -> usize {
    match field {
        MeasurementField::Bust => 0,
        MeasurementField::Waist => 1,
        MeasurementField::Hip => 2,
        MeasurementField::Arm => 3,
        MeasurementField::Length => 4,
        MeasurementField::Foot => 5,
    }
}

/// A measurement counts when it parses as a finite decimal number above zero.
/// Hex literals and values that overflow to infinity are rejected.
fn is_positive(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|v| v.is_finite() && v > 0.0)
}

// ---------------------------------------------------------------------------
// Pending list
// ---------------------------------------------------------------------------

/// A row of the pending list. Only checked rows are submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub entry: GarmentEntry,
    pub checked: bool,
    pub added_at: Timestamp,
}

/// Entries added during this session and not yet submitted.
#[derive(Debug, Clone, Default)]
pub struct PendingEntries {
    rows: Vec<PendingEntry>,
}

impl PendingEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take an entry from the form and append it, checked.
    ///
    /// Returns the index of the new row.
    pub fn try_add(
        &mut self,
        form: &mut GarmentEntryForm,
        donor_id: Option<DbId>,
    ) -> Result<usize, EntryRejection> {
        let entry = form.take_entry(donor_id)?;
        self.rows.push(PendingEntry {
            entry,
            checked: true,
            added_at: Utc::now(),
        });
        Ok(self.rows.len() - 1)
    }

    pub fn set_checked(&mut self, index: usize, checked: bool) -> Result<(), CoreError> {
        let row = self.rows.get_mut(index).ok_or_else(|| out_of_range(index))?;
        row.checked = checked;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<GarmentEntry, CoreError> {
        if index >= self.rows.len() {
            return Err(out_of_range(index));
        }
        Ok(self.rows.remove(index).entry)
    }

    pub fn rows(&self) -> &[PendingEntry] {
        &self.rows
    }

    /// Checked entries, in insertion order.
    pub fn checked(&self) -> impl Iterator<Item = &GarmentEntry> {
        self.rows.iter().filter(|row| row.checked).map(|row| &row.entry)
    }

    pub fn has_checked(&self) -> bool {
        self.rows.iter().any(|row| row.checked)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

fn out_of_range(index: usize) -> CoreError {
    CoreError::Validation(format!("No pending garment entry at position {index}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const UPPER_BODY: GarmentTypeCode = 0x0001;
    const JACKET_AND_PANTS: GarmentTypeCode = 0x0003;

    fn form_with_type(code: GarmentTypeCode) -> GarmentEntryForm {
        let mut form = GarmentEntryForm::new();
        form.select_type(GarmentTypeOption::new(code, "Jacket"));
        form
    }

    fn red() -> Choice {
        Choice::new("red", "Red")
    }

    // -- type selection --

    #[test]
    fn blank_form_shows_all_fields_disabled() {
        let form = GarmentEntryForm::new();
        for field in ALL_MEASUREMENT_FIELDS {
            let input = form.input(field);
            assert!(input.visible);
            assert!(!input.enabled);
            assert!(input.value.is_empty());
        }
    }

    #[test]
    fn selecting_type_enables_only_schema_fields() {
        let form = form_with_type(UPPER_BODY);
        assert_eq!(
            form.enabled_fields(),
            vec![MeasurementField::Bust, MeasurementField::Arm]
        );
        assert!(!form.input(MeasurementField::Waist).visible);
        assert!(form.input(MeasurementField::Arm).visible);
    }

    #[test]
    fn changing_type_clears_previous_values() {
        let mut form = form_with_type(JACKET_AND_PANTS);
        form.set_measurement(MeasurementField::Waist, "80").unwrap();
        form.select_color(red());

        form.select_type(GarmentTypeOption::new(UPPER_BODY, "Jacket"));

        assert!(form.input(MeasurementField::Waist).value.is_empty());
        assert!(!form.input(MeasurementField::Waist).enabled);
        assert!(form.color().is_none());
    }

    #[test]
    fn selecting_same_type_twice_is_idempotent() {
        let mut form = form_with_type(JACKET_AND_PANTS);
        let first = form.enabled_fields();
        form.select_type(GarmentTypeOption::new(JACKET_AND_PANTS, "Suit"));
        assert_eq!(form.enabled_fields(), first);
    }

    #[test]
    fn unknown_type_enables_nothing() {
        let form = form_with_type(0x0800);
        assert!(form.enabled_fields().is_empty());
    }

    #[test]
    fn disabled_field_rejects_input() {
        let mut form = form_with_type(UPPER_BODY);
        assert!(form.set_measurement(MeasurementField::Foot, "260").is_err());
    }

    // -- validation --

    #[test]
    fn rejects_without_type_even_when_complete_otherwise() {
        let mut form = GarmentEntryForm::new();
        form.select_color(red());
        assert_eq!(form.validate(), Err(EntryRejection::NoTypeSelected));
    }

    #[test]
    fn rejects_without_color() {
        let mut form = form_with_type(UPPER_BODY);
        form.set_measurement(MeasurementField::Bust, "90").unwrap();
        form.set_measurement(MeasurementField::Arm, "30").unwrap();
        assert_eq!(form.validate(), Err(EntryRejection::IncompleteFields));
    }

    #[test]
    fn rejects_color_with_empty_value() {
        let mut form = form_with_type(0x0010);
        form.select_color(Choice::new("", "--"));
        assert_eq!(form.validate(), Err(EntryRejection::IncompleteFields));
    }

    #[test]
    fn rejects_blank_zero_or_negative_measurements() {
        for bad in ["", "0", "-3", "abc", "  "] {
            let mut form = form_with_type(UPPER_BODY);
            form.select_color(red());
            form.set_measurement(MeasurementField::Bust, "90").unwrap();
            form.set_measurement(MeasurementField::Arm, bad).unwrap();
            assert_eq!(
                form.validate(),
                Err(EntryRejection::IncompleteFields),
                "arm = {bad:?}"
            );
        }
    }

    #[test]
    fn measurement_must_be_a_finite_decimal() {
        assert!(is_positive("61"));
        assert!(is_positive(" 30.5 "));
        assert!(is_positive("1e2"));
        assert!(!is_positive("0x1A"));
        assert!(!is_positive("1e400"));
        assert!(!is_positive("inf"));
        assert!(!is_positive("NaN"));
    }

    #[test]
    fn type_without_measurements_needs_only_color() {
        let mut form = form_with_type(0x0100);
        form.select_color(red());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn gender_is_optional() {
        let mut form = form_with_type(0x0008);
        form.select_color(red());
        form.set_measurement(MeasurementField::Foot, "265").unwrap();
        let entry = form.take_entry(None).unwrap();
        assert_eq!(entry.gender, None);
        assert_eq!(entry.gender_label, None);
    }

    // -- take_entry --

    #[test]
    fn take_entry_snapshots_and_resets() {
        let mut form = form_with_type(UPPER_BODY);
        form.select_gender(Choice::new("female", "Female"));
        form.select_color(red());
        form.set_measurement(MeasurementField::Bust, "90").unwrap();
        form.set_measurement(MeasurementField::Arm, "30").unwrap();

        let entry = form.take_entry(Some(12)).unwrap();

        assert_eq!(entry.donor_id, Some(12));
        assert_eq!(entry.garment_type, UPPER_BODY);
        assert_eq!(entry.garment_type_label, "Jacket");
        assert_eq!(entry.gender.as_deref(), Some("female"));
        assert_eq!(entry.color_label, "Red");
        assert_eq!(entry.measurements.bust, "90");
        assert_eq!(entry.measurements.arm, "30");
        assert_eq!(entry.measurements.waist, "");

        assert!(form.garment_type().is_none());
        assert!(form.enabled_fields().is_empty());
        assert_eq!(form.focus(), Some(EntryFocus::GarmentType));
    }

    #[test]
    fn rejected_take_leaves_form_untouched() {
        let mut form = form_with_type(UPPER_BODY);
        form.set_measurement(MeasurementField::Bust, "90").unwrap();
        assert_matches!(form.take_entry(None), Err(EntryRejection::IncompleteFields));
        assert_eq!(form.input(MeasurementField::Bust).value, "90");
        assert!(form.garment_type().is_some());
    }

    #[test]
    fn entry_serializes_with_service_keys() {
        let mut form = form_with_type(UPPER_BODY);
        form.select_color(red());
        form.set_measurement(MeasurementField::Bust, "90").unwrap();
        form.set_measurement(MeasurementField::Arm, "30").unwrap();
        let entry = form.take_entry(Some(3)).unwrap();

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["donor_id"], 3);
        assert_eq!(json["cloth_type"], 1);
        assert_eq!(json["cloth_color_str"], "Red");
        assert_eq!(json["cloth_bust"], "90");
        assert_eq!(json["cloth_foot"], "");
    }

    // -- pending list --

    #[test]
    fn pending_list_appends_checked_rows() {
        let mut pending = PendingEntries::new();
        let mut form = form_with_type(0x0100);
        form.select_color(red());

        assert_eq!(pending.try_add(&mut form, None), Ok(0));
        assert_eq!(pending.len(), 1);
        assert!(pending.has_checked());
    }

    #[test]
    fn pending_list_rejects_incomplete_form() {
        let mut pending = PendingEntries::new();
        let mut form = GarmentEntryForm::new();
        assert_eq!(
            pending.try_add(&mut form, None),
            Err(EntryRejection::NoTypeSelected)
        );
        assert!(pending.is_empty());
    }

    #[test]
    fn unchecking_and_removing_rows() {
        let mut pending = PendingEntries::new();
        for _ in 0..2 {
            let mut form = form_with_type(0x0100);
            form.select_color(red());
            pending.try_add(&mut form, None).unwrap();
        }

        pending.set_checked(0, false).unwrap();
        assert_eq!(pending.checked().count(), 1);

        pending.remove(1).unwrap();
        assert!(!pending.has_checked());
        assert!(pending.set_checked(5, true).is_err());
        assert!(pending.remove(5).is_err());
    }

    #[test]
    fn rejection_reason_strings() {
        assert_eq!(EntryRejection::NoTypeSelected.as_str(), "no-type-selected");
        assert_eq!(EntryRejection::IncompleteFields.as_str(), "incomplete-fields");
    }
}
