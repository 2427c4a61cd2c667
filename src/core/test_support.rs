// Shared fixtures for core unit tests
use crate::core::location::LocationIndex;
use crate::models::{
    ForceId, Intention, IntentionTarget, LocationTables, Municipality, MunicipalityId, Officer,
    OfficerId, State, StateId, Unit, UnitId,
};

/// Units 1 and 2 sit in municipality 10, unit 3 in 11 (both state 100),
/// unit 4 in municipality 12 (state 200); unit 5 has a broken chain.
pub fn fixture_locations() -> LocationIndex {
    LocationIndex::from_tables(LocationTables {
        units: vec![
            Unit { id: UnitId(1), name: "U1".to_string(), municipality_id: Some(MunicipalityId(10)) },
            Unit { id: UnitId(2), name: "U2".to_string(), municipality_id: Some(MunicipalityId(10)) },
            Unit { id: UnitId(3), name: "U3".to_string(), municipality_id: Some(MunicipalityId(11)) },
            Unit { id: UnitId(4), name: "U4".to_string(), municipality_id: Some(MunicipalityId(12)) },
            Unit { id: UnitId(5), name: "Broken".to_string(), municipality_id: None },
        ],
        municipalities: vec![
            Municipality { id: MunicipalityId(10), name: "M10".to_string(), state_id: Some(StateId(100)), latitude: Some(-23.0), longitude: Some(-47.0) },
            Municipality { id: MunicipalityId(11), name: "M11".to_string(), state_id: Some(StateId(100)), latitude: None, longitude: None },
            Municipality { id: MunicipalityId(12), name: "M12".to_string(), state_id: Some(StateId(200)), latitude: Some(-22.9), longitude: Some(-43.2) },
        ],
        states: vec![
            State { id: StateId(100), acronym: "SP".to_string() },
            State { id: StateId(200), acronym: "RJ".to_string() },
        ],
    })
}

/// Verified officer of force 1 ("PMSP", category "PM") posted at `unit`
pub fn officer(id: i64, unit: i64) -> Officer {
    Officer {
        id: OfficerId(id),
        name: format!("Officer {}", id),
        current_unit_id: Some(UnitId(unit)),
        force_id: ForceId(1),
        force_acronym: "PMSP".to_string(),
        scope_category: "PM".to_string(),
        accepts_interstate_transfer: false,
        verified: true,
    }
}

/// Intentions ranked in the given order, starting at priority 1
pub fn wishes(officer: i64, targets: &[IntentionTarget]) -> Vec<Intention> {
    targets
        .iter()
        .enumerate()
        .map(|(rank, target)| Intention::new(OfficerId(officer), rank as u32 + 1, *target))
        .collect()
}
