//! Shared helpers for wizard integration tests.
//!
//! [`FakeBackend`] records every call it receives and answers from
//! in-memory state, so the controller can be exercised without a network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use intake_core::backend::{BackendError, IntakeBackend, RecordId};
use intake_core::donor::DonorCandidate;
use intake_core::form::SerializedForm;
use intake_core::garment_entry::{Choice, GarmentTypeOption};
use intake_core::garment_schema::MeasurementField;
use intake_core::types::DbId;
use intake_wizard::session::WizardSession;

/// First id handed out for created people.
pub const FIRST_PERSON_ID: DbId = 100;

/// First id handed out for created donors.
pub const FIRST_DONOR_ID: DbId = 500;

/// One endpoint of the backend port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Search,
    CreatePerson,
    UpdatePerson,
    CreateDonor,
    UpdateDonor,
    SubmitGarments,
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(String),
    CreatePerson(SerializedForm),
    UpdatePerson(DbId, SerializedForm),
    CreateDonor(DbId, SerializedForm),
    UpdateDonor(DbId, SerializedForm),
    SubmitGarments(SerializedForm),
}

impl Call {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Search(_) => Endpoint::Search,
            Self::CreatePerson(_) => Endpoint::CreatePerson,
            Self::UpdatePerson(..) => Endpoint::UpdatePerson,
            Self::CreateDonor(..) => Endpoint::CreateDonor,
            Self::UpdateDonor(..) => Endpoint::UpdateDonor,
            Self::SubmitGarments(_) => Endpoint::SubmitGarments,
        }
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    next_person_id: DbId,
    next_donor_id: DbId,
    search_results: Vec<DonorCandidate>,
    failures: HashMap<Endpoint, BackendError>,
}

/// In-memory stand-in for the intake service.
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_person_id: FIRST_PERSON_ID,
                next_donor_id: FIRST_DONOR_ID,
                ..Default::default()
            }),
        }
    }

    /// Candidates returned by every search.
    pub fn with_search_results(self, results: Vec<DonorCandidate>) -> Self {
        self.state.lock().unwrap().search_results = results;
        self
    }

    /// Make the next call to `endpoint` fail with a rejection carrying `message`.
    pub fn fail_next(&self, endpoint: Endpoint, message: &str) {
        self.state.lock().unwrap().failures.insert(
            endpoint,
            BackendError::Rejected {
                status: 422,
                message: message.to_string(),
            },
        );
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.calls().iter().map(Call::endpoint).collect()
    }

    fn record(&self, call: Call) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap();
        let endpoint = call.endpoint();
        state.calls.push(call);
        match state.failures.remove(&endpoint) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn issue_person_id(&self) -> DbId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_person_id;
        state.next_person_id += 1;
        id
    }

    fn issue_donor_id(&self) -> DbId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_donor_id;
        state.next_donor_id += 1;
        id
    }
}

#[async_trait]
impl IntakeBackend for FakeBackend {
    async fn search_donors(&self, query: &str) -> Result<Vec<DonorCandidate>, BackendError> {
        self.record(Call::Search(query.to_string()))?;
        Ok(self.state.lock().unwrap().search_results.clone())
    }

    async fn create_person(&self, form: &SerializedForm) -> Result<RecordId, BackendError> {
        self.record(Call::CreatePerson(form.clone()))?;
        Ok(RecordId {
            id: self.issue_person_id(),
        })
    }

    async fn update_person(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError> {
        self.record(Call::UpdatePerson(person_id, form.clone()))?;
        Ok(RecordId { id: person_id })
    }

    async fn create_donor(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError> {
        self.record(Call::CreateDonor(person_id, form.clone()))?;
        Ok(RecordId {
            id: self.issue_donor_id(),
        })
    }

    async fn update_donor(
        &self,
        donor_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError> {
        self.record(Call::UpdateDonor(donor_id, form.clone()))?;
        Ok(RecordId { id: donor_id })
    }

    async fn submit_garments(&self, form: &SerializedForm) -> Result<(), BackendError> {
        self.record(Call::SubmitGarments(form.clone()))
    }
}

/// A registered donor as the search endpoint would return it.
pub fn candidate(donor_id: DbId, person_id: DbId, name: &str) -> DonorCandidate {
    serde_json::from_value(serde_json::json!({
        "id": donor_id,
        "user_id": person_id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "gender": "female",
        "donation_msg": "Good luck with your interview",
    }))
    .unwrap()
}

/// Fill the entry form with a complete upper-body garment and add it.
pub fn add_jacket(session: &mut WizardSession) {
    session
        .entry_form
        .select_type(GarmentTypeOption::new(0x0001, "Jacket"));
    session
        .entry_form
        .set_measurement(MeasurementField::Bust, "94")
        .unwrap();
    session
        .entry_form
        .set_measurement(MeasurementField::Arm, "61")
        .unwrap();
    session
        .entry_form
        .select_color(Choice::new("black", "Black"));
    session.add_entry().unwrap();
}
