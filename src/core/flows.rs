use std::collections::BTreeMap;
use crate::core::location::LocationIndex;
use crate::models::{FlowKind, FlowPoint, MunicipalityId};

/// Grouped count for one municipality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowCount {
    pub municipality_id: MunicipalityId,
    pub count: u64,
}

/// Build demand-map points from grouped counts
///
/// Only municipalities with coordinates are plotted. For `Balance`, both
/// sides are merged and `balance = arriving - leaving`, `volume = arriving + leaving`.
pub fn build_flow_points(
    kind: FlowKind,
    leaving: &[FlowCount],
    arriving: &[FlowCount],
    locations: &LocationIndex,
) -> Vec<FlowPoint> {
    let mut merged: BTreeMap<MunicipalityId, (u64, u64)> = BTreeMap::new();

    if kind != FlowKind::Arriving {
        for flow in leaving {
            merged.entry(flow.municipality_id).or_default().0 += flow.count;
        }
    }
    if kind != FlowKind::Leaving {
        for flow in arriving {
            merged.entry(flow.municipality_id).or_default().1 += flow.count;
        }
    }

    merged
        .into_iter()
        .filter_map(|(id, (outgoing, incoming))| {
            let municipality = locations.municipality(id)?;
            let (latitude, longitude) = (municipality.latitude?, municipality.longitude?);
            let balanced = kind == FlowKind::Balance;

            Some(FlowPoint {
                id,
                name: municipality.name.clone(),
                latitude,
                longitude,
                leaving: outgoing,
                arriving: incoming,
                balance: balanced.then(|| incoming as i64 - outgoing as i64),
                volume: balanced.then(|| incoming + outgoing),
            })
        })
        .collect()
}
