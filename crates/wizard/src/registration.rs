//! Person-then-donor registration pipeline.
//!
//! Leaving the donor details step writes two records in order: the person,
//! then the donor that references it. The donor write needs the person id
//! returned by the first write, so it is only issued after that write
//! succeeds. Each successful write is recorded on the session immediately,
//! so a failed donor write still leaves the person id in place and a retry
//! updates that person instead of creating another.

use intake_core::backend::{BackendError, IntakeBackend};
use intake_core::donor::NAME_FIELD;
use intake_core::form::SerializedForm;
use intake_core::types::DbId;

use crate::session::WizardSession;

/// Whether a write created a record or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Created,
    Updated,
}

/// A successful person or donor write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordWrite {
    pub id: DbId,
    pub kind: WriteKind,
}

/// Result of running the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The name input is empty; nothing was written.
    Skipped,
    /// Both records were written.
    Registered {
        person: RecordWrite,
        donor: RecordWrite,
    },
    /// The person write failed; the donor write was not attempted.
    PersonFailed(BackendError),
    /// The person was written but the donor write failed.
    DonorFailed {
        person: RecordWrite,
        error: BackendError,
    },
}

impl RegistrationOutcome {
    /// Whether the wizard may leave the donor details step.
    pub fn allows_advance(&self) -> bool {
        matches!(self, Self::Skipped | Self::Registered { .. })
    }
}

/// Write the person, then the donor, for the session's donor form.
pub async fn register<B>(
    backend: &B,
    session: &mut WizardSession,
    form: &SerializedForm,
) -> RegistrationOutcome
where
    B: IntakeBackend + ?Sized,
{
    if !session.donor_form.is_filled(NAME_FIELD) {
        tracing::debug!(session_id = %session.id(), "Donor name empty, skipping registration");
        return RegistrationOutcome::Skipped;
    }

    let person = match write_person(backend, session, form).await {
        Ok(person) => person,
        Err(error) => return RegistrationOutcome::PersonFailed(error),
    };

    match write_donor(backend, session, person.id, form).await {
        Ok(donor) => RegistrationOutcome::Registered { person, donor },
        Err(error) => RegistrationOutcome::DonorFailed { person, error },
    }
}

/// Create the person when none is associated yet, update it otherwise.
pub async fn write_person<B>(
    backend: &B,
    session: &mut WizardSession,
    form: &SerializedForm,
) -> Result<RecordWrite, BackendError>
where
    B: IntakeBackend + ?Sized,
{
    let (record, kind) = match session.identity.person_id {
        Some(person_id) => (
            backend.update_person(person_id, form).await?,
            WriteKind::Updated,
        ),
        None => (backend.create_person(form).await?, WriteKind::Created),
    };

    session.identity.person_id = Some(record.id);
    tracing::info!(
        session_id = %session.id(),
        person_id = record.id,
        ?kind,
        "Person record written",
    );
    Ok(RecordWrite {
        id: record.id,
        kind,
    })
}

/// Create the donor for `person_id` when none is associated yet, update it
/// otherwise.
pub async fn write_donor<B>(
    backend: &B,
    session: &mut WizardSession,
    person_id: DbId,
    form: &SerializedForm,
) -> Result<RecordWrite, BackendError>
where
    B: IntakeBackend + ?Sized,
{
    let (record, kind) = match session.identity.donor_id {
        Some(donor_id) => (
            backend.update_donor(donor_id, form).await?,
            WriteKind::Updated,
        ),
        None => (
            backend.create_donor(person_id, form).await?,
            WriteKind::Created,
        ),
    };

    session.identity.donor_id = Some(record.id);
    tracing::info!(
        session_id = %session.id(),
        person_id,
        donor_id = record.id,
        ?kind,
        "Donor record written",
    );
    Ok(RecordWrite {
        id: record.id,
        kind,
    })
}
