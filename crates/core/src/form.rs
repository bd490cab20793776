//! Person/donor form inputs and form serialization.
//!
//! [`DonorForm`] keeps the values of the eight person and donor inputs.
//! [`SerializedForm`] is the ordered list of name/value pairs sent as a
//! URL-encoded body with every write, the way a browser posts a form.

use serde::Serialize;

use crate::donor::{donor_form_fields, DonorCandidate};
use crate::error::CoreError;

/// Default options of the `gender` choice input.
pub const GENDER_OPTIONS: [&str; 2] = ["male", "female"];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A single form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    /// Free text input.
    Text { name: &'static str, value: String },
    /// Radio/checkbox group: at most one of `options` is selected.
    Choice {
        name: &'static str,
        options: Vec<String>,
        selected: Option<String>,
    },
}

impl FormInput {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text { name, .. } | Self::Choice { name, .. } => name,
        }
    }

    /// Current value; `None` for an unselected choice.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Text { value, .. } => Some(value),
            Self::Choice { selected, .. } => selected.as_deref(),
        }
    }
}

/// The person/donor section of the intake form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorForm {
    inputs: Vec<FormInput>,
}

impl Default for DonorForm {
    fn default() -> Self {
        Self::with_gender_options(GENDER_OPTIONS.iter().map(|s| s.to_string()).collect())
    }
}

impl DonorForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the form with a custom set of gender options.
    pub fn with_gender_options(options: Vec<String>) -> Self {
        let inputs = donor_form_fields()
            .map(|name| match name {
                "gender" => FormInput::Choice {
                    name,
                    options: options.clone(),
                    selected: None,
                },
                _ => FormInput::Text {
                    name,
                    value: String::new(),
                },
            })
            .collect();
        Self { inputs }
    }

    pub fn inputs(&self) -> &[FormInput] {
        &self.inputs
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(FormInput::value)
    }

    /// Whether the named input holds a non-empty value.
    pub fn is_filled(&self, name: &str) -> bool {
        self.value(name).is_some_and(|v| !v.is_empty())
    }

    /// Set an input's value as the operator would.
    ///
    /// Choice inputs only accept one of their options.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let value = value.into();
        let input = self
            .inputs
            .iter_mut()
            .find(|input| input.name() == name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown form input '{name}'")))?;

        match input {
            FormInput::Text { value: current, .. } => *current = value,
            FormInput::Choice {
                options, selected, ..
            } => {
                if !options.contains(&value) {
                    return Err(CoreError::Validation(format!(
                        "'{value}' is not an option of '{name}'. Must be one of: {}",
                        options.join(", ")
                    )));
                }
                *selected = Some(value);
            }
        }
        Ok(())
    }

    /// Copy a search result onto the form.
    ///
    /// Text inputs take the candidate's value (empty when it has none).
    /// Choice inputs select the option equal to the candidate's value and
    /// stay as they were when no option matches.
    pub fn apply_candidate(&mut self, candidate: &DonorCandidate) {
        for input in &mut self.inputs {
            let incoming = candidate.field(input.name());
            match input {
                FormInput::Text { value, .. } => {
                    *value = incoming.unwrap_or_default().to_string();
                }
                FormInput::Choice {
                    options, selected, ..
                } => {
                    if let Some(option) = incoming.and_then(|v| options.iter().find(|o| *o == v)) {
                        *selected = Some(option.clone());
                    }
                }
            }
        }
    }

    /// Append this section's name/value pairs, skipping unselected choices.
    pub fn serialize_into(&self, out: &mut SerializedForm) {
        for input in &self.inputs {
            if let Some(value) = input.value() {
                out.push(input.name(), value);
            }
        }
    }

    fn find(&self, name: &str) -> Option<&FormInput> {
        self.inputs.iter().find(|input| input.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Serialized form
// ---------------------------------------------------------------------------

/// Ordered name/value pairs, sent URL-encoded. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SerializedForm(Vec<(String, String)>);

impl SerializedForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
