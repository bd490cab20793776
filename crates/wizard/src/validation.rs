//! Step-one validation form.
//!
//! When strict validation is enabled, leaving the first step requires the
//! session to pass a [`StepValidator`]. No network call is involved.

use crate::session::WizardSession;

/// Decides whether the step-one form is valid.
pub trait StepValidator: Send + Sync {
    fn is_valid(&self, session: &WizardSession) -> bool;
}

/// Requires a fixed list of donor form inputs to be non-empty.
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    fields: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new(fields: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Inputs that are required but empty.
    pub fn missing<'a>(&'a self, session: &'a WizardSession) -> impl Iterator<Item = &'static str> + 'a {
        self.fields
            .iter()
            .copied()
            .filter(|name| !session.donor_form.is_filled(name))
    }
}

impl StepValidator for RequiredFields {
    fn is_valid(&self, session: &WizardSession) -> bool {
        self.missing(session).next().is_none()
    }
}
