//! Wizard step controller.
//!
//! [`WizardController`] intercepts every requested step change, runs the
//! guard for the step being left and only moves the session when the guard
//! passes. Guards run on forward moves; moving back one step is always
//! allowed.
//!
//! | Leaving        | Guard                                                              |
//! |----------------|--------------------------------------------------------------------|
//! | Intro          | With strict validation, the [`StepValidator`] must accept the form |
//! | DonorDetails   | Person then donor write ([`registration::register`])               |
//! | Garments       | At least one checked entry, then one batch submission              |
//!
//! Remote failures are shown through the [`Notifier`] and veto the move;
//! local validation failures veto silently.

use intake_core::backend::{BackendError, IntakeBackend};
use intake_core::types::DbId;

use crate::notify::{Notifier, TracingNotifier};
use crate::registration::{self, RegistrationOutcome};
use crate::session::WizardSession;
use crate::step::{validate_step_transition, Direction, WizardStep};
use crate::validation::{RequiredFields, StepValidator};

/// Default location the operator is sent to once the wizard finishes.
pub const DEFAULT_FINISH_LOCATION: &str = "/";

/// Controller behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Require the step-one validator to pass before leaving step one.
    pub strict_validation: bool,
    /// Where to navigate after the final step.
    pub finish_location: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            strict_validation: false,
            finish_location: DEFAULT_FINISH_LOCATION.to_string(),
        }
    }
}

/// Which remote write a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Person,
    Donor,
    Garments,
}

impl WriteStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Donor => "donor",
            Self::Garments => "garments",
        }
    }
}

/// Why a step change was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Veto {
    /// The requested target is not reachable from the current step.
    #[error("{0}")]
    InvalidTransition(String),

    /// The step-one validation form is invalid.
    #[error("Step one form is invalid")]
    ValidationFailed,

    /// No pending garment entry is checked.
    #[error("No garment entries selected for submission")]
    NothingSelected,

    /// A remote write failed.
    #[error("The {} write failed: {error}", .stage.as_str())]
    WriteFailed {
        stage: WriteStage,
        error: BackendError,
    },

    /// The form could not be serialized.
    #[error("{0}")]
    Internal(String),
}

/// Result of a requested step change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The session moved to a working step.
    Moved { from: WizardStep, to: WizardStep },
    /// The wizard finished; navigate to `location`.
    Finished { location: String },
    /// The session stayed where it was.
    Vetoed(Veto),
}

impl TransitionOutcome {
    pub fn is_vetoed(&self) -> bool {
        matches!(self, Self::Vetoed(_))
    }
}

/// Drives [`WizardSession`]s through their steps against an [`IntakeBackend`].
pub struct WizardController<B> {
    backend: B,
    config: WizardConfig,
    validator: Box<dyn StepValidator>,
    notifier: Box<dyn Notifier>,
}

impl<B: IntakeBackend> WizardController<B> {
    /// Create a controller with an always-valid step-one validator and
    /// alerts written to the log.
    pub fn new(backend: B, config: WizardConfig) -> Self {
        Self {
            backend,
            config,
            validator: Box::new(RequiredFields::default()),
            notifier: Box::new(TracingNotifier),
        }
    }

    pub fn with_validator(mut self, validator: impl StepValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Search registered donors and merge the results into the session's list.
    ///
    /// An empty query sends nothing. Returns the donor ids newly listed.
    pub async fn search(
        &self,
        session: &mut WizardSession,
        query: &str,
    ) -> Result<Vec<DbId>, BackendError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        match self.backend.search_donors(query).await {
            Ok(results) => {
                let found = results.len();
                let added = session.search_results.merge(results);
                tracing::info!(
                    session_id = %session.id(),
                    found,
                    added = added.len(),
                    "Donor search completed",
                );
                Ok(added)
            }
            Err(error) => {
                self.notifier.alert(&error.user_message());
                Err(error)
            }
        }
    }

    /// Move forward one step.
    pub async fn next(&self, session: &mut WizardSession) -> TransitionOutcome {
        let target = session.step().to_number().saturating_add(1);
        self.change_step(session, target).await
    }

    /// Move back one step.
    pub async fn previous(&self, session: &mut WizardSession) -> TransitionOutcome {
        let target = session.step().to_number().saturating_sub(1);
        self.change_step(session, target).await
    }

    /// Request a move to step number `target`.
    ///
    /// The guard of the current step runs first; the session only changes
    /// step when it passes.
    pub async fn change_step(&self, session: &mut WizardSession, target: u8) -> TransitionOutcome {
        let from = session.step();

        let direction = match validate_step_transition(from.to_number(), target) {
            Ok(direction) => direction,
            Err(e) => return TransitionOutcome::Vetoed(Veto::InvalidTransition(e.to_string())),
        };
        let to = match WizardStep::from_number(target) {
            Ok(step) => step,
            Err(e) => return TransitionOutcome::Vetoed(Veto::InvalidTransition(e.to_string())),
        };

        if direction == Direction::Forward {
            if let Err(veto) = self.leave(session, from).await {
                tracing::info!(
                    session_id = %session.id(),
                    step = from.to_number(),
                    reason = %veto,
                    "Step change vetoed",
                );
                return TransitionOutcome::Vetoed(veto);
            }
        }

        session.step = to;
        if to.is_terminal() {
            return self.finish(session);
        }

        tracing::info!(
            session_id = %session.id(),
            from = from.to_number(),
            to = to.to_number(),
            "Wizard step changed",
        );
        TransitionOutcome::Moved { from, to }
    }

    /// Guard for leaving `from` in the forward direction.
    async fn leave(&self, session: &mut WizardSession, from: WizardStep) -> Result<(), Veto> {
        match from {
            WizardStep::Intro => {
                if self.config.strict_validation && !self.validator.is_valid(session) {
                    return Err(Veto::ValidationFailed);
                }
                Ok(())
            }
            WizardStep::DonorDetails => self.register(session).await,
            WizardStep::Garments => self.submit_garments(session).await,
            WizardStep::Finished => Err(Veto::InvalidTransition(
                "The wizard is already finished".to_string(),
            )),
        }
    }

    async fn register(&self, session: &mut WizardSession) -> Result<(), Veto> {
        let form = session
            .serialize_form()
            .map_err(|e| Veto::Internal(e.to_string()))?;

        match registration::register(&self.backend, session, &form).await {
            RegistrationOutcome::Skipped | RegistrationOutcome::Registered { .. } => Ok(()),
            RegistrationOutcome::PersonFailed(error) => {
                Err(self.write_failed(WriteStage::Person, error))
            }
            RegistrationOutcome::DonorFailed { error, .. } => {
                Err(self.write_failed(WriteStage::Donor, error))
            }
        }
    }

    async fn submit_garments(&self, session: &mut WizardSession) -> Result<(), Veto> {
        if !session.pending.has_checked() {
            return Err(Veto::NothingSelected);
        }

        let form = session
            .serialize_form()
            .map_err(|e| Veto::Internal(e.to_string()))?;
        let count = session.pending.checked().count();

        self.backend
            .submit_garments(&form)
            .await
            .map_err(|error| self.write_failed(WriteStage::Garments, error))?;

        session.pending.clear();
        tracing::info!(
            session_id = %session.id(),
            donor_id = ?session.donor_id(),
            count,
            "Garment entries submitted",
        );
        Ok(())
    }

    fn finish(&self, session: &WizardSession) -> TransitionOutcome {
        let location = self.config.finish_location.clone();
        tracing::info!(session_id = %session.id(), %location, "Wizard finished");
        TransitionOutcome::Finished { location }
    }

    fn write_failed(&self, stage: WriteStage, error: BackendError) -> Veto {
        self.notifier.alert(&error.user_message());
        Veto::WriteFailed { stage, error }
    }
}
