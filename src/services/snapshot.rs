use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use crate::core::directory::{DirectoryError, IntentionStore, OfficerDirectory};
use crate::core::location::{LocationError, LocationIndex, LocationLabels, LocationReference};
use crate::models::{Intention, LocationTriple, Officer, OfficerId, ScopeMode, UnitId};

/// Point-in-time copy of the officers, intentions and reference data a
/// match query needs
///
/// Populated by `PostgresClient::load_snapshot` from a single read-only
/// transaction, or built by hand in tests.
#[derive(Debug, Clone, Default)]
pub struct MatchSnapshot {
    officers: BTreeMap<OfficerId, Officer>,
    intentions: HashMap<OfficerId, Vec<Intention>>,
    locations: Arc<LocationIndex>,
}

impl MatchSnapshot {
    pub fn new(locations: Arc<LocationIndex>) -> Self {
        Self {
            officers: BTreeMap::new(),
            intentions: HashMap::new(),
            locations,
        }
    }

    pub fn insert_officer(&mut self, officer: Officer) {
        self.officers.insert(officer.id, officer);
    }

    /// Append an intention, keeping the officer's list ordered by priority
    pub fn insert_intention(&mut self, intention: Intention) {
        let wishes = self.intentions.entry(intention.officer_id).or_default();
        wishes.push(intention);
        wishes.sort_by_key(|i| i.priority);
    }

    pub fn with_officer(mut self, officer: Officer) -> Self {
        self.insert_officer(officer);
        self
    }

    pub fn with_intentions(mut self, intentions: impl IntoIterator<Item = Intention>) -> Self {
        for intention in intentions {
            self.insert_intention(intention);
        }
        self
    }

    pub fn officer_count(&self) -> usize {
        self.officers.len()
    }

    pub fn intention_count(&self) -> usize {
        self.intentions.values().map(Vec::len).sum()
    }
}

impl OfficerDirectory for MatchSnapshot {
    fn get_by_id(&self, id: OfficerId) -> Result<Option<Officer>, DirectoryError> {
        Ok(self.officers.get(&id).cloned())
    }

    fn list_eligible_candidates(&self, mode: &ScopeMode) -> Result<Vec<Officer>, DirectoryError> {
        Ok(self
            .officers
            .values()
            .filter(|officer| officer.is_match_candidate() && mode.admits(officer))
            .cloned()
            .collect())
    }
}

impl IntentionStore for MatchSnapshot {
    fn get_by_officer(&self, id: OfficerId) -> Result<Vec<Intention>, DirectoryError> {
        Ok(self.intentions.get(&id).cloned().unwrap_or_default())
    }
}

impl LocationReference for MatchSnapshot {
    fn resolve(&self, unit_id: UnitId) -> Result<LocationTriple, LocationError> {
        self.locations.resolve(unit_id)
    }

    fn labels(&self, location: &LocationTriple) -> Option<LocationLabels<'_>> {
        self.locations.labels(location)
    }
}
