//! Person and donor records as seen by the intake wizard.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::DbId;

/// Form inputs describing the person behind a donor.
pub const PERSON_FIELDS: [&str; 6] = ["name", "email", "gender", "phone", "age", "address"];

/// Form inputs specific to the donor record.
pub const DONOR_FIELDS: [&str; 2] = ["donation_msg", "comment"];

/// Input name whose emptiness decides whether step two writes anything.
pub const NAME_FIELD: &str = "name";

/// Every field copied onto the form when a search result is selected.
pub fn donor_form_fields() -> impl Iterator<Item = &'static str> {
    PERSON_FIELDS.into_iter().chain(DONOR_FIELDS)
}

/// A donor returned by the search endpoint, with its person's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorCandidate {
    #[serde(rename = "id")]
    pub donor_id: DbId,
    #[serde(rename = "user_id")]
    pub person_id: DbId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub donation_msg: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: Option<String>,
}

impl DonorCandidate {
    /// Value of a named form field, if the candidate carries one.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "email" => &self.email,
            "gender" => &self.gender,
            "phone" => &self.phone,
            "age" => &self.age,
            "address" => &self.address,
            "donation_msg" => &self.donation_msg,
            "comment" => &self.comment,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Accept strings, numbers and booleans; `null` and missing become `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
