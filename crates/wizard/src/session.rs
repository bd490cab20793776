//! Per-session wizard state.
//!
//! A [`WizardSession`] owns everything one intake keeps between steps:
//! the current step, the associated person/donor identity, both form
//! sections and the pending garment list. Sessions are independent, so
//! several can be driven by one controller.

use intake_core::error::CoreError;
use intake_core::form::{DonorForm, SerializedForm};
use intake_core::garment_entry::{EntryRejection, GarmentEntryForm, PendingEntries};
use intake_core::types::DbId;
use uuid::Uuid;

use crate::selection::{DonorChoice, DonorIdentity, DonorSearchList};
use crate::step::WizardStep;

/// Form name under which each checked garment entry is submitted.
pub const GARMENT_LIST_FIELD: &str = "cloth-list";

/// State of one intake wizard.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: Uuid,
    pub(crate) step: WizardStep,
    pub(crate) identity: DonorIdentity,
    pub search_results: DonorSearchList,
    pub donor_form: DonorForm,
    pub entry_form: GarmentEntryForm,
    pub pending: PendingEntries,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    /// A fresh session on step one with nothing associated.
    pub fn new() -> Self {
        Self::with_donor_form(DonorForm::new())
    }

    /// A fresh session using a pre-built donor form (e.g. custom gender options).
    pub fn with_donor_form(donor_form: DonorForm) -> Self {
        Self {
            id: Uuid::new_v4(),
            step: WizardStep::Intro,
            identity: DonorIdentity::default(),
            search_results: DonorSearchList::new(),
            donor_form,
            entry_form: GarmentEntryForm::new(),
            pending: PendingEntries::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn identity(&self) -> DonorIdentity {
        self.identity
    }

    pub fn person_id(&self) -> Option<DbId> {
        self.identity.person_id
    }

    pub fn donor_id(&self) -> Option<DbId> {
        self.identity.donor_id
    }

    /// Apply the operator's pick from the search results.
    ///
    /// An existing donor sets both identifiers and copies the candidate's
    /// fields onto the donor form. The new-donor entry clears the identity
    /// and leaves the form as it is.
    pub fn select_donor(&mut self, choice: DonorChoice) {
        match choice {
            DonorChoice::NewDonor => {
                self.identity = DonorIdentity::default();
                tracing::debug!(session_id = %self.id, "New donor selected");
            }
            DonorChoice::Existing(candidate) => {
                self.identity = DonorIdentity {
                    person_id: Some(candidate.person_id),
                    donor_id: Some(candidate.donor_id),
                };
                self.donor_form.apply_candidate(&candidate);
                tracing::debug!(
                    session_id = %self.id,
                    person_id = candidate.person_id,
                    donor_id = candidate.donor_id,
                    "Registered donor selected",
                );
            }
        }
    }

    /// Select a donor already present in the search results.
    pub fn select_listed(&mut self, donor_id: DbId) -> Result<(), CoreError> {
        let candidate = self
            .search_results
            .get(donor_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Donor",
                id: donor_id,
            })?;
        self.select_donor(DonorChoice::Existing(candidate));
        Ok(())
    }

    /// Add the garment entry form's contents to the pending list.
    ///
    /// The entry records the donor associated at this moment.
    pub fn add_entry(&mut self) -> Result<usize, EntryRejection> {
        let result = self
            .pending
            .try_add(&mut self.entry_form, self.identity.donor_id);
        match &result {
            Ok(index) => {
                tracing::debug!(session_id = %self.id, index, "Garment entry added")
            }
            Err(reason) => {
                tracing::debug!(session_id = %self.id, reason = reason.as_str(), "Garment entry rejected")
            }
        }
        result
    }

    /// Serialize the whole form: donor inputs followed by one
    /// [`GARMENT_LIST_FIELD`] pair per checked pending entry.
    pub fn serialize_form(&self) -> Result<SerializedForm, CoreError> {
        let mut form = SerializedForm::new();
        self.donor_form.serialize_into(&mut form);
        for entry in self.pending.checked() {
            let json = serde_json::to_string(entry)
                .map_err(|e| CoreError::Internal(format!("Failed to encode garment entry: {e}")))?;
            form.push(GARMENT_LIST_FIELD, json);
        }
        Ok(form)
    }
}
