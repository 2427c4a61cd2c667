// Unit tests for Transfer Match

use std::collections::HashMap;
use transfer_match::core::{
    build_flow_points, eligible, find_direct, find_interested, find_triangular, DesireGraph,
    FlowCount, LocationError, LocationIndex,
};
use transfer_match::models::{
    FlowKind, ForceId, Granularity, Intention, IntentionTarget, LocationTables, Municipality,
    MunicipalityId, Officer, OfficerId, ScopeMode, State, StateId, Unit, UnitId,
};

fn create_locations() -> LocationIndex {
    let units = (1..=8)
        .map(|id| Unit {
            id: UnitId(id),
            name: format!("Unit {}", id),
            // units 1-4 in municipality 10, 5-7 in 20, unit 8 dangling
            municipality_id: Some(MunicipalityId(match id {
                1..=4 => 10,
                5..=7 => 20,
                _ => 999,
            })),
        })
        .collect();

    LocationIndex::from_tables(LocationTables {
        units,
        municipalities: vec![
            Municipality { id: MunicipalityId(10), name: "Londrina".to_string(), state_id: Some(StateId(1)), latitude: Some(-23.3), longitude: Some(-51.16) },
            Municipality { id: MunicipalityId(20), name: "Joinville".to_string(), state_id: Some(StateId(2)), latitude: None, longitude: None },
        ],
        states: vec![
            State { id: StateId(1), acronym: "PR".to_string() },
            State { id: StateId(2), acronym: "SC".to_string() },
        ],
    })
}

fn create_officer(id: i64, unit: i64) -> Officer {
    Officer {
        id: OfficerId(id),
        name: format!("Officer {}", id),
        current_unit_id: Some(UnitId(unit)),
        force_id: ForceId(1),
        force_acronym: "PMPR".to_string(),
        scope_category: "PM".to_string(),
        accepts_interstate_transfer: false,
        verified: true,
    }
}

fn intentions(entries: &[(i64, u32, IntentionTarget)]) -> HashMap<OfficerId, Vec<Intention>> {
    let mut map: HashMap<OfficerId, Vec<Intention>> = HashMap::new();
    for &(officer, priority, target) in entries {
        map.entry(OfficerId(officer))
            .or_default()
            .push(Intention::new(OfficerId(officer), priority, target));
    }
    map
}

fn build(requester: &Officer, others: &[Officer], wishes: &HashMap<OfficerId, Vec<Intention>>) -> DesireGraph {
    let mode = ScopeMode::for_requester(requester);
    DesireGraph::build(requester, others, wishes, &create_locations(), &mode)
}

#[test]
fn test_location_resolution() {
    let locations = create_locations();

    let triple = locations.resolve(UnitId(6)).unwrap();
    assert_eq!(triple.municipality_id, MunicipalityId(20));
    assert_eq!(triple.state_id, StateId(2));

    assert_eq!(locations.resolve(UnitId(8)), Err(LocationError::MissingMunicipality(UnitId(8))));
    assert_eq!(locations.resolve(UnitId(42)), Err(LocationError::UnknownUnit(UnitId(42))));
}

#[test]
fn test_eligibility_modes() {
    let requester = create_officer(1, 1);
    let mut other_force = create_officer(2, 5);
    other_force.force_id = ForceId(2);
    other_force.force_acronym = "PMSC".to_string();

    assert!(!eligible(&requester, &other_force));

    let mut interstate = requester.clone();
    interstate.accepts_interstate_transfer = true;
    assert!(eligible(&interstate, &other_force));

    // the candidate's own flag is never consulted
    other_force.accepts_interstate_transfer = true;
    assert!(!eligible(&requester, &other_force));

    let mut civil = other_force.clone();
    civil.scope_category = "PC".to_string();
    assert!(!eligible(&interstate, &civil));
}

#[test]
fn test_edge_takes_best_matching_priority() {
    let a = create_officer(1, 1);
    let b = create_officer(2, 5);
    let wishes = intentions(&[
        (1, 1, IntentionTarget::Unit(UnitId(7))),
        (1, 2, IntentionTarget::State(StateId(2))),
        (1, 3, IntentionTarget::Unit(UnitId(5))),
    ]);

    let graph = build(&a, &[b], &wishes);
    let edge = graph.edge(OfficerId(1), OfficerId(2)).unwrap();

    assert_eq!(edge.priority, 2);
    assert_eq!(edge.granularity, Granularity::State);
    assert!(graph.edge(OfficerId(2), OfficerId(1)).is_none());
}

#[test]
fn test_edges_are_deterministic() {
    let a = create_officer(1, 1);
    let others: Vec<Officer> = (2..=7).map(|id| create_officer(id, id)).collect();
    let wishes = intentions(&[
        (1, 1, IntentionTarget::Municipality(MunicipalityId(20))),
        (2, 1, IntentionTarget::State(StateId(1))),
        (3, 1, IntentionTarget::Unit(UnitId(6))),
        (5, 2, IntentionTarget::Unit(UnitId(1))),
    ]);

    let first = build(&a, &others, &wishes);
    let second = build(&a, &others, &wishes);

    assert_eq!(first.edge_count(), second.edge_count());
    for from in 1..=7 {
        for to in 1..=7 {
            assert_eq!(
                first.edge(OfficerId(from), OfficerId(to)),
                second.edge(OfficerId(from), OfficerId(to))
            );
        }
    }
    // 1 -> {5, 6, 7}, 2 -> {1, 3, 4}, 3 -> 6, 5 -> 1
    assert_eq!(first.edge_count(), 3 + 3 + 1 + 1);
}

#[test]
fn test_unresolved_candidates_skipped() {
    let a = create_officer(1, 1);
    let broken = create_officer(2, 8);
    let wishes = intentions(&[
        (1, 1, IntentionTarget::Unit(UnitId(8))),
        (2, 1, IntentionTarget::Unit(UnitId(1))),
    ]);

    let graph = build(&a, &[broken], &wishes);

    // nobody can want the broken posting, but its owner can still want others
    assert!(graph.edge(OfficerId(1), OfficerId(2)).is_none());
    assert!(graph.edge(OfficerId(2), OfficerId(1)).is_some());
    assert_eq!(graph.stats().unresolved_locations, 1);
}

#[test]
fn test_interested_sorted_by_priority_then_id() {
    let a = create_officer(1, 1);
    let others: Vec<Officer> = (2..=5).map(|id| create_officer(id, 5)).collect();
    let wishes = intentions(&[
        (2, 3, IntentionTarget::Unit(UnitId(1))),
        (3, 1, IntentionTarget::State(StateId(1))),
        (4, 3, IntentionTarget::Municipality(MunicipalityId(10))),
        (5, 2, IntentionTarget::Unit(UnitId(1))),
    ]);

    let graph = build(&a, &others, &wishes);
    let interested: Vec<(u32, i64)> = find_interested(OfficerId(1), &graph)
        .iter()
        .map(|e| (e.priority, e.from.0))
        .collect();

    assert_eq!(interested, vec![(1, 3), (2, 5), (3, 2), (3, 4)]);
}

#[test]
fn test_direct_swaps_ranked_by_combined_score() {
    let a = create_officer(1, 1);
    let others = vec![create_officer(2, 5), create_officer(3, 6), create_officer(4, 2)];
    let wishes = intentions(&[
        (1, 1, IntentionTarget::Unit(UnitId(6))),
        (1, 2, IntentionTarget::State(StateId(2))),
        (1, 3, IntentionTarget::Unit(UnitId(2))),
        (2, 1, IntentionTarget::Municipality(MunicipalityId(10))),
        (3, 4, IntentionTarget::Unit(UnitId(1))),
        (4, 1, IntentionTarget::Unit(UnitId(1))),
    ]);

    let graph = build(&a, &others, &wishes);
    let swaps: Vec<(i64, u64)> = find_direct(OfficerId(1), &graph, 100)
        .iter()
        .map(|s| (s.partner.0, s.combined_score))
        .collect();

    // 2: 2+1, 3: 1+4, 4: 3+1
    assert_eq!(swaps, vec![(2, 3), (4, 4), (3, 5)]);
    assert_eq!(find_direct(OfficerId(1), &graph, 1).len(), 1);
}

#[test]
fn test_triangles_sound_and_distinct() {
    let a = create_officer(1, 1);
    let others: Vec<Officer> = vec![create_officer(2, 2), create_officer(3, 5), create_officer(4, 6)];
    let wishes = intentions(&[
        (1, 1, IntentionTarget::Unit(UnitId(2))),
        (1, 2, IntentionTarget::Unit(UnitId(5))),
        (2, 1, IntentionTarget::State(StateId(2))),
        (3, 1, IntentionTarget::Unit(UnitId(6))),
        (3, 2, IntentionTarget::Unit(UnitId(1))),
        (4, 1, IntentionTarget::Municipality(MunicipalityId(10))),
    ]);

    let graph = build(&a, &others, &wishes);
    let triangles = find_triangular(OfficerId(1), &graph, 100);

    assert!(!triangles.is_empty());
    for t in &triangles {
        assert!(graph.edge(OfficerId(1), t.b).is_some());
        assert!(graph.edge(t.b, t.c).is_some());
        assert!(graph.edge(t.c, OfficerId(1)).is_some());
        assert!(t.b != t.c && t.b != OfficerId(1) && t.c != OfficerId(1));
    }

    let pairs: Vec<(i64, i64)> = triangles.iter().map(|t| (t.b.0, t.c.0)).collect();
    assert_eq!(pairs, vec![(2, 3), (2, 4), (3, 4)]);
}

#[test]
fn test_flow_balance() {
    let locations = create_locations();
    let leaving = [FlowCount { municipality_id: MunicipalityId(10), count: 7 }];
    let arriving = [
        FlowCount { municipality_id: MunicipalityId(10), count: 2 },
        FlowCount { municipality_id: MunicipalityId(20), count: 9 },
    ];

    let points = build_flow_points(FlowKind::Balance, &leaving, &arriving, &locations);

    // Joinville has no coordinates
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].name, "Londrina");
    assert_eq!(points[0].balance, Some(-5));
    assert_eq!(points[0].volume, Some(9));
}

#[test]
fn test_intention_wire_format() {
    let intention = Intention::new(OfficerId(3), 1, IntentionTarget::Municipality(MunicipalityId(10)));
    let json = serde_json::to_value(intention).unwrap();

    assert_eq!(json["granularity"], "MUNICIPALITY");
    assert_eq!(json["targetId"], 10);
    assert_eq!(json["priority"], 1);

    let parsed: Intention = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, intention);
}
