//! Scripted intake sessions.
//!
//! A script is a JSON document describing what an operator would enter on
//! each step of the wizard:
//!
//! ```json
//! {
//!   "search": "kim",
//!   "donor_id": 7,
//!   "donor": { "name": "Kim", "phone": "010-1234-5678" },
//!   "garments": [
//!     { "type": 1, "label": "Jacket", "color": "black",
//!       "measurements": { "bust": "94", "arm": "61" } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use anyhow::Context;
use intake_core::garment_entry::{Choice, GarmentTypeOption};
use intake_core::garment_schema::{GarmentTypeCode, MeasurementField};
use intake_core::types::DbId;
use intake_wizard::selection::DonorChoice;
use intake_wizard::session::WizardSession;
use serde::Deserialize;

/// One scripted intake.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IntakeScript {
    /// Donor search issued on the donor details step.
    pub search: Option<String>,
    /// Donor to pick from the search results; absent means a new donor.
    pub donor_id: Option<DbId>,
    /// Donor form values, applied after the selection.
    pub donor: BTreeMap<String, String>,
    pub garments: Vec<ScriptedGarment>,
}

/// One garment entry as typed into the entry form.
#[derive(Debug, Deserialize)]
pub struct ScriptedGarment {
    #[serde(rename = "type")]
    pub code: GarmentTypeCode,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub gender: Option<String>,
    pub color: String,
    #[serde(default)]
    pub measurements: BTreeMap<String, String>,
    /// Whether the pending row stays checked for submission.
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_checked() -> bool {
    true
}

impl IntakeScript {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("Failed to parse intake script")
    }

    /// Pick the donor and fill in the donor form.
    pub fn apply_donor(&self, session: &mut WizardSession) -> anyhow::Result<()> {
        match self.donor_id {
            Some(donor_id) => session
                .select_listed(donor_id)
                .with_context(|| format!("Donor {donor_id} was not in the search results"))?,
            None => session.select_donor(DonorChoice::NewDonor),
        }

        for (name, value) in &self.donor {
            session
                .donor_form
                .set(name, value.as_str())
                .with_context(|| format!("Cannot set donor field '{name}'"))?;
        }
        Ok(())
    }

    /// Enter every garment into the pending list.
    pub fn apply_garments(&self, session: &mut WizardSession) -> anyhow::Result<()> {
        for (position, garment) in self.garments.iter().enumerate() {
            let index = garment
                .enter(session)
                .with_context(|| format!("Garment #{} was rejected", position + 1))?;
            if !garment.checked {
                session.pending.set_checked(index, false)?;
            }
        }
        Ok(())
    }
}

impl ScriptedGarment {
    fn enter(&self, session: &mut WizardSession) -> anyhow::Result<usize> {
        let form = &mut session.entry_form;
        form.select_type(GarmentTypeOption::new(self.code, self.label.clone()));
        if let Some(gender) = &self.gender {
            form.select_gender(Choice::new(gender.as_str(), gender.as_str()));
        }
        form.select_color(Choice::new(self.color.as_str(), self.color.as_str()));
        for (name, value) in &self.measurements {
            let field = MeasurementField::parse(name)?;
            form.set_measurement(field, value.as_str())?;
        }

        Ok(session.add_entry()?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use intake_core::garment_entry::EntryRejection;

    use super::*;

    #[test]
    fn minimal_script_is_a_new_donor_without_garments() {
        let script = IntakeScript::from_json("{}").unwrap();
        assert!(script.search.is_none());
        assert!(script.donor_id.is_none());
        assert!(script.garments.is_empty());
    }

    #[test]
    fn garments_enter_the_pending_list() {
        let script = IntakeScript::from_json(
            r#"{
                "donor": { "name": "Lee" },
                "garments": [
                    { "type": 2, "label": "Pants", "color": "gray",
                      "measurements": { "waist": "80", "length": "102" } },
                    { "type": 8, "label": "Shoes", "color": "brown",
                      "measurements": { "foot": "265" }, "checked": false }
                ]
            }"#,
        )
        .unwrap();
        let mut session = WizardSession::new();

        script.apply_donor(&mut session).unwrap();
        script.apply_garments(&mut session).unwrap();

        assert_eq!(session.donor_form.value("name"), Some("Lee"));
        assert_eq!(session.pending.len(), 2);
        assert_eq!(session.pending.checked().count(), 1);
    }

    #[test]
    fn disabled_measurement_is_an_error() {
        let script = IntakeScript::from_json(
            r#"{ "garments": [
                { "type": 8, "color": "brown", "measurements": { "bust": "90" } }
            ] }"#,
        )
        .unwrap();
        let mut session = WizardSession::new();

        assert!(script.apply_garments(&mut session).is_err());
        assert!(session.pending.is_empty());
    }

    #[test]
    fn incomplete_garment_is_rejected() {
        let script = IntakeScript::from_json(
            r#"{ "garments": [ { "type": 1, "color": "black", "measurements": { "bust": "90" } } ] }"#,
        )
        .unwrap();
        let mut session = WizardSession::new();

        let err = script.apply_garments(&mut session).unwrap_err();
        assert_matches!(
            err.root_cause().downcast_ref::<EntryRejection>(),
            Some(EntryRejection::IncompleteFields)
        );
    }

    #[test]
    fn unknown_listed_donor_is_an_error() {
        let script = IntakeScript::from_json(r#"{ "donor_id": 3 }"#).unwrap();
        let mut session = WizardSession::new();

        assert!(script.apply_donor(&mut session).is_err());
    }
}
