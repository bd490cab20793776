//! Port to the remote intake service.
//!
//! The wizard performs every network write through [`IntakeBackend`]. The
//! HTTP implementation lives in `intake-client`; tests substitute an
//! in-memory fake.

use async_trait::async_trait;
use serde::Deserialize;

use crate::donor::DonorCandidate;
use crate::form::SerializedForm;
use crate::types::DbId;

/// Body returned by the person and donor write endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RecordId {
    pub id: DbId,
}

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The service answered with a non-2xx status.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response (connection, DNS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Text shown to the operator. For rejections this is the server's
    /// message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// The remote endpoints the intake wizard depends on.
#[async_trait]
pub trait IntakeBackend: Send + Sync {
    /// `GET /new-cloth.json?q={query}`
    async fn search_donors(&self, query: &str) -> Result<Vec<DonorCandidate>, BackendError>;

    /// `POST /users.json`
    async fn create_person(&self, form: &SerializedForm) -> Result<RecordId, BackendError>;

    /// `PUT /users/{person_id}.json`
    async fn update_person(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError>;

    /// `POST /donors.json?user_id={person_id}`
    async fn create_donor(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError>;

    /// `PUT /donors/{donor_id}.json`
    async fn update_donor(
        &self,
        donor_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError>;

    /// `POST /clothes.json`
    async fn submit_garments(&self, form: &SerializedForm) -> Result<(), BackendError>;
}
