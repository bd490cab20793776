//! Donor search results and the identity associated with a session.

use intake_core::donor::DonorCandidate;
use intake_core::types::DbId;

/// Person and donor records the session writes to.
///
/// Both start unset. Each is set by the first successful create and then
/// reused so later writes update instead of creating duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DonorIdentity {
    pub person_id: Option<DbId>,
    pub donor_id: Option<DbId>,
}

impl DonorIdentity {
    pub fn is_new(&self) -> bool {
        self.person_id.is_none() && self.donor_id.is_none()
    }
}

/// What the operator picked in the search result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonorChoice {
    /// The "new donor" entry: nothing is associated and step two creates
    /// fresh records.
    NewDonor,
    /// A registered donor from the search results.
    Existing(DonorCandidate),
}

/// Accumulated search results, newest first, one row per donor.
#[derive(Debug, Clone, Default)]
pub struct DonorSearchList {
    candidates: Vec<DonorCandidate>,
}

impl DonorSearchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend results whose donor is not listed yet.
    ///
    /// Returns the donor ids that were added.
    pub fn merge(&mut self, results: Vec<DonorCandidate>) -> Vec<DbId> {
        let mut added = Vec::new();
        for candidate in results {
            if self.contains(candidate.donor_id) {
                continue;
            }
            added.push(candidate.donor_id);
            self.candidates.insert(0, candidate);
        }
        added
    }

    pub fn contains(&self, donor_id: DbId) -> bool {
        self.candidates.iter().any(|c| c.donor_id == donor_id)
    }

    pub fn get(&self, donor_id: DbId) -> Option<&DonorCandidate> {
        self.candidates.iter().find(|c| c.donor_id == donor_id)
    }

    pub fn candidates(&self) -> &[DonorCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
