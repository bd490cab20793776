//! REST client for the intake service endpoints.
//!
//! Wraps donor search, person and donor writes, and the garment batch
//! submission using [`reqwest`]. Write bodies are sent URL-encoded.

use std::time::Duration;

use async_trait::async_trait;
use intake_core::backend::{BackendError, IntakeBackend, RecordId};
use intake_core::donor::DonorCandidate;
use intake_core::form::SerializedForm;
use intake_core::types::DbId;
use serde::Deserialize;

use crate::config::ClientConfig;

/// HTTP client for one intake service.
#[derive(Debug, Clone)]
pub struct IntakeApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum IntakeApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Intake API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the JSON body, or the raw body.
        message: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl From<IntakeApiError> for BackendError {
    fn from(err: IntakeApiError) -> Self {
        match err {
            IntakeApiError::ApiError { status, message } => {
                BackendError::Rejected { status, message }
            }
            IntakeApiError::Decode(msg) => BackendError::Decode(msg),
            IntakeApiError::Request(e) if e.is_decode() => BackendError::Decode(e.to_string()),
            IntakeApiError::Request(e) => BackendError::Transport(e.to_string()),
        }
    }
}

/// Error body shape used by the intake service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl IntakeApi {
    /// Create a client for the service at `base_url`, e.g. `http://host:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build a client from loaded configuration (base URL and timeout).
    pub fn from_config(config: &ClientConfig) -> Result<Self, IntakeApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search registered donors by free text.
    ///
    /// Sends `GET /new-cloth.json?q={query}`.
    pub async fn search(&self, query: &str) -> Result<Vec<DonorCandidate>, IntakeApiError> {
        let response = self
            .client
            .get(self.url("/new-cloth.json"))
            .query(&[("q", query)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create a person. Sends `POST /users.json`.
    pub async fn post_person(&self, form: &SerializedForm) -> Result<RecordId, IntakeApiError> {
        let response = self
            .client
            .post(self.url("/users.json"))
            .form(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Update a person. Sends `PUT /users/{person_id}.json`.
    pub async fn put_person(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, IntakeApiError> {
        let response = self
            .client
            .put(self.url(&format!("/users/{person_id}.json")))
            .form(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create a donor for an existing person.
    ///
    /// Sends `POST /donors.json?user_id={person_id}`.
    pub async fn post_donor(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, IntakeApiError> {
        let response = self
            .client
            .post(self.url("/donors.json"))
            .query(&[("user_id", person_id)])
            .form(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Update a donor. Sends `PUT /donors/{donor_id}.json`.
    pub async fn put_donor(
        &self,
        donor_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, IntakeApiError> {
        let response = self
            .client
            .put(self.url(&format!("/donors/{donor_id}.json")))
            .form(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit the checked garment entries. Sends `POST /clothes.json`;
    /// the response body is ignored.
    pub async fn post_garments(&self, form: &SerializedForm) -> Result<(), IntakeApiError> {
        let response = self
            .client
            .post(self.url("/clothes.json"))
            .form(form)
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ensure the response has a success status code. On failure the
    /// message is the JSON `error` field when present, otherwise the raw
    /// body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, IntakeApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), %message, "Intake API request rejected");
            return Err(IntakeApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IntakeApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| IntakeApiError::Decode(e.to_string()))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), IntakeApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl IntakeBackend for IntakeApi {
    async fn search_donors(&self, query: &str) -> Result<Vec<DonorCandidate>, BackendError> {
        Ok(self.search(query).await?)
    }

    async fn create_person(&self, form: &SerializedForm) -> Result<RecordId, BackendError> {
        Ok(self.post_person(form).await?)
    }

    async fn update_person(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError> {
        Ok(self.put_person(person_id, form).await?)
    }

    async fn create_donor(
        &self,
        person_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError> {
        Ok(self.post_donor(person_id, form).await?)
    }

    async fn update_donor(
        &self,
        donor_id: DbId,
        form: &SerializedForm,
    ) -> Result<RecordId, BackendError> {
        Ok(self.put_donor(donor_id, form).await?)
    }

    async fn submit_garments(&self, form: &SerializedForm) -> Result<(), BackendError> {
        Ok(self.post_garments(form).await?)
    }
}
