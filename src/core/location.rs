use std::collections::HashMap;
use thiserror::Error;
use crate::models::{
    LocationTables, LocationTriple, Municipality, MunicipalityId, State, StateId, Unit, UnitId,
};

/// Why a unit could not be resolved to a full location triple
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unit {0} has no municipality")]
    MissingMunicipality(UnitId),

    #[error("municipality of unit {0} has no state")]
    MissingState(UnitId),
}

/// Human-readable names for a resolved location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationLabels<'a> {
    pub unit: &'a str,
    pub municipality: &'a str,
    pub state: &'a str,
}

/// Read-only access to location reference data
pub trait LocationReference {
    fn resolve(&self, unit_id: UnitId) -> Result<LocationTriple, LocationError>;

    fn labels(&self, location: &LocationTriple) -> Option<LocationLabels<'_>>;
}

/// In-memory unit -> municipality -> state hierarchy
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    units: HashMap<UnitId, Unit>,
    municipalities: HashMap<MunicipalityId, Municipality>,
    states: HashMap<StateId, State>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: LocationTables) -> Self {
        let mut index = Self::new();
        for state in tables.states {
            index.insert_state(state);
        }
        for municipality in tables.municipalities {
            index.insert_municipality(municipality);
        }
        for unit in tables.units {
            index.insert_unit(unit);
        }
        index
    }

    pub fn insert_unit(&mut self, unit: Unit) {
        self.units.insert(unit.id, unit);
    }

    pub fn insert_municipality(&mut self, municipality: Municipality) {
        self.municipalities.insert(municipality.id, municipality);
    }

    pub fn insert_state(&mut self, state: State) {
        self.states.insert(state.id, state);
    }

    /// Resolve a unit to its full triple
    ///
    /// A broken chain (missing municipality or state link, or a dangling id)
    /// yields an error instead of a partial triple.
    pub fn resolve(&self, unit_id: UnitId) -> Result<LocationTriple, LocationError> {
        let unit = self
            .units
            .get(&unit_id)
            .ok_or(LocationError::UnknownUnit(unit_id))?;

        let municipality = unit
            .municipality_id
            .and_then(|id| self.municipalities.get(&id))
            .ok_or(LocationError::MissingMunicipality(unit_id))?;

        let state = municipality
            .state_id
            .and_then(|id| self.states.get(&id))
            .ok_or(LocationError::MissingState(unit_id))?;

        Ok(LocationTriple {
            unit_id,
            municipality_id: municipality.id,
            state_id: state.id,
        })
    }

    /// Names for an already-resolved triple
    pub fn labels(&self, location: &LocationTriple) -> Option<LocationLabels<'_>> {
        Some(LocationLabels {
            unit: &self.units.get(&location.unit_id)?.name,
            municipality: &self.municipalities.get(&location.municipality_id)?.name,
            state: &self.states.get(&location.state_id)?.acronym,
        })
    }

    pub fn municipality(&self, id: MunicipalityId) -> Option<&Municipality> {
        self.municipalities.get(&id)
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

impl LocationReference for LocationIndex {
    fn resolve(&self, unit_id: UnitId) -> Result<LocationTriple, LocationError> {
        LocationIndex::resolve(self, unit_id)
    }

    fn labels(&self, location: &LocationTriple) -> Option<LocationLabels<'_>> {
        LocationIndex::labels(self, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> LocationIndex {
        LocationIndex::from_tables(LocationTables {
            units: vec![
                Unit { id: UnitId(1), name: "1st Battalion".to_string(), municipality_id: Some(MunicipalityId(10)) },
                Unit { id: UnitId(2), name: "Orphan Post".to_string(), municipality_id: None },
                Unit { id: UnitId(3), name: "Border Post".to_string(), municipality_id: Some(MunicipalityId(11)) },
                Unit { id: UnitId(4), name: "Lost Post".to_string(), municipality_id: Some(MunicipalityId(99)) },
            ],
            municipalities: vec![
                Municipality { id: MunicipalityId(10), name: "Campinas".to_string(), state_id: Some(StateId(100)), latitude: None, longitude: None },
                Municipality { id: MunicipalityId(11), name: "Nowhere".to_string(), state_id: None, latitude: None, longitude: None },
            ],
            states: vec![State { id: StateId(100), acronym: "SP".to_string() }],
        })
    }

    #[test]
    fn test_resolve_full_chain() {
        let triple = index().resolve(UnitId(1)).unwrap();
        assert_eq!(triple.municipality_id, MunicipalityId(10));
        assert_eq!(triple.state_id, StateId(100));
    }

    #[test]
    fn test_broken_chains_are_not_found() {
        let index = index();
        assert_eq!(index.resolve(UnitId(9)), Err(LocationError::UnknownUnit(UnitId(9))));
        assert_eq!(index.resolve(UnitId(2)), Err(LocationError::MissingMunicipality(UnitId(2))));
        assert_eq!(index.resolve(UnitId(4)), Err(LocationError::MissingMunicipality(UnitId(4))));
        assert_eq!(index.resolve(UnitId(3)), Err(LocationError::MissingState(UnitId(3))));
    }

    #[test]
    fn test_labels() {
        let index = index();
        let triple = index.resolve(UnitId(1)).unwrap();
        let labels = index.labels(&triple).unwrap();
        assert_eq!(labels.unit, "1st Battalion");
        assert_eq!(labels.municipality, "Campinas");
        assert_eq!(labels.state, "SP");
    }
}
