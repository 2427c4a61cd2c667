use crate::core::direct::DirectSwap;
use crate::core::graph::{DesireEdge, DesireGraph};
use crate::core::location::{LocationLabels, LocationReference};
use crate::core::triangular::TriangleCycle;
use crate::models::{
    DirectSwapMatch, Granularity, InterestMatch, Officer, OfficerId, OfficerSummary, SwapLegs,
    TriangularSwapMatch,
};

const UNKNOWN: LocationLabels<'static> = LocationLabels {
    unit: "unknown unit",
    municipality: "unknown municipality",
    state: "??",
};

/// Who is doing the wanting in a leg description
#[derive(Debug, Clone, Copy)]
pub enum Wanter<'a> {
    /// The requesting officer
    You,
    /// Another participant wanting a third party's post
    Peer(&'a str),
    /// Another participant wanting the requester's post
    PeerWantsYours(&'a str),
}

/// What someone wanting `labels` at `granularity` means for the post holder
pub fn describe_interest(granularity: Granularity, labels: LocationLabels<'_>) -> String {
    match granularity {
        Granularity::Unit => format!("Wants your specific unit: {}", labels.unit),
        Granularity::Municipality => {
            format!("Wants your municipality: {}-{}", labels.municipality, labels.state)
        }
        Granularity::State => format!("Wants your state: {}", labels.state),
    }
}

pub fn describe_leg(wanter: Wanter<'_>, granularity: Granularity, labels: LocationLabels<'_>) -> String {
    let LocationLabels { unit, municipality, state } = labels;
    match (wanter, granularity) {
        (Wanter::You, Granularity::Unit) => {
            format!("You want the unit {} in {}-{}", unit, municipality, state)
        }
        (Wanter::You, Granularity::Municipality) => {
            format!("You want the municipality of {}-{}", municipality, state)
        }
        (Wanter::You, Granularity::State) => format!("You want the state of {}", state),
        (Wanter::Peer(name), Granularity::Unit) => {
            format!("{} wants the unit {} in {}-{}", name, unit, municipality, state)
        }
        (Wanter::Peer(name), Granularity::Municipality) => {
            format!("{} wants the municipality of {}-{}", name, municipality, state)
        }
        (Wanter::Peer(name), Granularity::State) => format!("{} wants the state of {}", name, state),
        (Wanter::PeerWantsYours(name), Granularity::Unit) => {
            format!("{} wants your unit {} in {}-{}", name, unit, municipality, state)
        }
        (Wanter::PeerWantsYours(name), Granularity::Municipality) => {
            format!("{} wants your municipality {}-{}", name, municipality, state)
        }
        (Wanter::PeerWantsYours(name), Granularity::State) => {
            format!("{} wants your state {}", name, state)
        }
    }
}

/// Maps structural results onto response models; never touches the traversal
pub struct Presenter<'a, L: ?Sized> {
    graph: &'a DesireGraph,
    locations: &'a L,
}

impl<'a, L: LocationReference + ?Sized> Presenter<'a, L> {
    pub fn new(graph: &'a DesireGraph, locations: &'a L) -> Self {
        Self { graph, locations }
    }

    pub fn summary(&self, officer: &Officer) -> OfficerSummary {
        let labels = self.labels_of(officer.id);
        OfficerSummary {
            id: officer.id,
            name: officer.name.clone(),
            force_acronym: officer.force_acronym.clone(),
            unit: labels.map(|l| l.unit.to_string()),
            municipality: labels.map(|l| l.municipality.to_string()),
            state: labels.map(|l| l.state.to_string()),
        }
    }

    pub fn interest(&self, edge: &DesireEdge) -> Option<InterestMatch> {
        let officer = self.graph.officer(edge.from)?;
        Some(InterestMatch {
            officer: self.summary(officer),
            matched_priority: edge.priority,
            matched_granularity: edge.granularity,
            description: describe_interest(edge.granularity, self.post_labels(edge.to)),
        })
    }

    pub fn direct(&self, swap: &DirectSwap) -> Option<DirectSwapMatch> {
        let officer = self.graph.officer(swap.partner)?;
        Some(DirectSwapMatch {
            officer: self.summary(officer),
            combined_score: swap.combined_score,
        })
    }

    pub fn triangle(&self, cycle: &TriangleCycle) -> Option<TriangularSwapMatch> {
        let b = self.graph.officer(cycle.b)?;
        let c = self.graph.officer(cycle.c)?;

        let legs = SwapLegs {
            a_to_b: describe_leg(Wanter::You, cycle.a_to_b.granularity, self.post_labels(cycle.b)),
            b_to_c: describe_leg(
                Wanter::Peer(&b.name),
                cycle.b_to_c.granularity,
                self.post_labels(cycle.c),
            ),
            c_to_a: describe_leg(
                Wanter::PeerWantsYours(&c.name),
                cycle.c_to_a.granularity,
                self.post_labels(cycle.c_to_a.to),
            ),
        };

        Some(TriangularSwapMatch {
            officer_b: self.summary(b),
            officer_c: self.summary(c),
            legs,
        })
    }

    fn labels_of(&self, id: OfficerId) -> Option<LocationLabels<'a>> {
        let location = self.graph.location_of(id)?;
        self.locations.labels(location)
    }

    fn post_labels(&self, id: OfficerId) -> LocationLabels<'a> {
        self.labels_of(id).unwrap_or(UNKNOWN)
    }
}
