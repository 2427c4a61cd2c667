use std::collections::HashMap;
use thiserror::Error;
use crate::core::location::LocationReference;
use crate::models::{Intention, Officer, OfficerId, ScopeMode};

/// Failure reported by an officer or intention collaborator
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Officer records owned by the registration/profile subsystem
pub trait OfficerDirectory {
    fn get_by_id(&self, id: OfficerId) -> Result<Option<Officer>, DirectoryError>;

    /// Officers inside `mode`'s partition (same category or same force)
    fn list_eligible_candidates(&self, mode: &ScopeMode) -> Result<Vec<Officer>, DirectoryError>;
}

/// Intentions owned by the intentions subsystem
pub trait IntentionStore {
    /// One officer's intentions, best priority first
    fn get_by_officer(&self, id: OfficerId) -> Result<Vec<Intention>, DirectoryError>;

    /// Bulk variant for a candidate set; officers without intentions may be absent
    fn get_by_officers(
        &self,
        ids: &[OfficerId],
    ) -> Result<HashMap<OfficerId, Vec<Intention>>, DirectoryError> {
        let mut intentions = HashMap::with_capacity(ids.len());
        for &id in ids {
            let wishes = self.get_by_officer(id)?;
            if !wishes.is_empty() {
                intentions.insert(id, wishes);
            }
        }
        Ok(intentions)
    }
}

/// Everything a match computation reads, ideally from one consistent snapshot
pub trait MatchSource: OfficerDirectory + IntentionStore + LocationReference {}

impl<T: OfficerDirectory + IntentionStore + LocationReference + ?Sized> MatchSource for T {}
