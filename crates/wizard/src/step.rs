//! Wizard step definitions and transition validation.
//!
//! Steps are numbered from 1. The three working steps are followed by the
//! terminal [`WizardStep::Finished`], entered by moving forward from the
//! last working step.

use intake_core::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The steps of the intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    /// Donor search and the optional step-one validation form.
    Intro,
    /// Person and donor details.
    DonorDetails,
    /// Garment entry, review and batch submission.
    Garments,
    /// Terminal state; the operator is sent back to the application root.
    Finished,
}

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Number of the terminal step.
pub const MAX_STEP: u8 = 4;

impl WizardStep {
    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Intro),
            2 => Ok(Self::DonorDetails),
            3 => Ok(Self::Garments),
            4 => Ok(Self::Finished),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Intro => 1,
            Self::DonorDetails => 2,
            Self::Garments => 3,
            Self::Finished => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Finished
    }
}

/// Direction of a requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a step transition and return its direction.
///
/// Only moves of exactly one step are allowed, and nothing leaves the
/// terminal step.
pub fn validate_step_transition(current: u8, next: u8) -> Result<Direction, CoreError> {
    let current_step = WizardStep::from_number(current)?;
    WizardStep::from_number(next)?;

    if current_step.is_terminal() {
        return Err(CoreError::Validation(
            "The wizard is finished; no further transitions are possible".to_string(),
        ));
    }

    match (next as i16) - (current as i16) {
        1 => Ok(Direction::Forward),
        -1 => Ok(Direction::Backward),
        _ => Err(CoreError::Validation(format!(
            "Cannot transition from step {current} to step {next}. \
             Must advance or go back exactly one step."
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
