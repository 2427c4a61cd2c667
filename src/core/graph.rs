use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use crate::core::eligibility::is_scoped_candidate;
use crate::core::location::LocationReference;
use crate::models::{
    Granularity, Intention, IntentionTarget, LocationTriple, MunicipalityId, Officer, OfficerId,
    ScopeMode, StateId, UnitId,
};

/// `from` wants the post currently held by `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DesireEdge {
    pub from: OfficerId,
    pub to: OfficerId,
    /// Best (lowest) priority among `from`'s intentions that `to` satisfies
    pub priority: u32,
    pub granularity: Granularity,
}

/// Counters collected while building a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub out_of_scope: usize,
    pub unresolved_locations: usize,
    pub dropped_intentions: usize,
}

/// Officers posted at each level of the hierarchy, used to turn an
/// intention into its set of satisfying officers without scanning pairs
#[derive(Debug, Default)]
struct PostingIndex {
    by_unit: HashMap<UnitId, Vec<NodeIndex>>,
    by_municipality: HashMap<MunicipalityId, Vec<NodeIndex>>,
    by_state: HashMap<StateId, Vec<NodeIndex>>,
}

impl PostingIndex {
    fn insert(&mut self, node: NodeIndex, location: &LocationTriple) {
        self.by_unit.entry(location.unit_id).or_default().push(node);
        self.by_municipality.entry(location.municipality_id).or_default().push(node);
        self.by_state.entry(location.state_id).or_default().push(node);
    }

    fn satisfying(&self, target: &IntentionTarget) -> &[NodeIndex] {
        let nodes = match target {
            IntentionTarget::Unit(id) => self.by_unit.get(id),
            IntentionTarget::Municipality(id) => self.by_municipality.get(id),
            IntentionTarget::State(id) => self.by_state.get(id),
        };
        nodes.map(Vec::as_slice).unwrap_or(&[])
    }
}

/// An intention only counts for its owner and only with a 1-based priority
pub fn is_usable_intention(owner: OfficerId, intention: &Intention) -> bool {
    intention.officer_id == owner && intention.priority >= 1
}

/// Request-scoped desire graph over the requester and its eligible candidates
///
/// Built once per match query and dropped with the response. Neighbour
/// enumeration is adjacency-list backed, single edge lookup is a hash probe.
#[derive(Debug)]
pub struct DesireGraph {
    graph: DiGraph<Officer, DesireEdge>,
    nodes: HashMap<OfficerId, NodeIndex>,
    edges: HashMap<(OfficerId, OfficerId), EdgeIndex>,
    locations: HashMap<OfficerId, LocationTriple>,
    stats: GraphStats,
}

impl DesireGraph {
    /// Build the graph for one query
    ///
    /// # Arguments
    /// * `requester` - The officer asking for matches; always a node, verified or not
    /// * `candidates` - Population to scope; anyone failing `mode` or the candidate
    ///   invariant (verified, posted) is skipped
    /// * `intentions` - Intentions keyed by officer
    /// * `locations` - Reference hierarchy used to resolve postings
    /// * `mode` - Scope fixed from the requester
    pub fn build<L: LocationReference + ?Sized>(
        requester: &Officer,
        candidates: &[Officer],
        intentions: &HashMap<OfficerId, Vec<Intention>>,
        locations: &L,
        mode: &ScopeMode,
    ) -> Self {
        let mut stats = GraphStats::default();
        let mut graph = DiGraph::with_capacity(candidates.len() + 1, candidates.len());
        let mut nodes = HashMap::with_capacity(candidates.len() + 1);

        nodes.insert(requester.id, graph.add_node(requester.clone()));
        for candidate in candidates {
            if !is_scoped_candidate(requester, candidate, mode) {
                stats.out_of_scope += 1;
                continue;
            }
            if nodes.contains_key(&candidate.id) {
                continue;
            }
            nodes.insert(candidate.id, graph.add_node(candidate.clone()));
        }

        // Resolve every posting once
        let mut posting = PostingIndex::default();
        let mut resolved = HashMap::with_capacity(nodes.len());
        for node in graph.node_indices() {
            let officer = &graph[node];
            let Some(unit_id) = officer.current_unit_id else {
                continue;
            };
            match locations.resolve(unit_id) {
                Ok(location) => {
                    posting.insert(node, &location);
                    resolved.insert(officer.id, location);
                }
                Err(e) if officer.id == requester.id => {
                    tracing::warn!("Requester {} posting does not resolve: {}", officer.id, e);
                }
                Err(e) => {
                    tracing::debug!("Skipping officer {} as a match target: {}", officer.id, e);
                    stats.unresolved_locations += 1;
                }
            }
        }

        let node_indices: Vec<NodeIndex> = graph.node_indices().collect();
        let mut edges = HashMap::new();

        for from in node_indices {
            let from_id = graph[from].id;
            let Some(wishes) = intentions.get(&from_id) else {
                continue;
            };

            let mut ranked: Vec<&Intention> = wishes
                .iter()
                .filter(|i| {
                    let valid = is_usable_intention(from_id, i);
                    if !valid {
                        stats.dropped_intentions += 1;
                    }
                    valid
                })
                .collect();
            ranked.sort_by_key(|i| i.priority);

            // First match wins since intentions are visited best-first
            let mut best: HashMap<NodeIndex, (u32, Granularity)> = HashMap::new();
            for intention in ranked {
                for &to in posting.satisfying(&intention.target) {
                    if to != from {
                        best.entry(to)
                            .or_insert((intention.priority, intention.granularity()));
                    }
                }
            }

            let mut targets: Vec<(NodeIndex, (u32, Granularity))> = best.into_iter().collect();
            targets.sort_by_key(|(to, _)| *to);

            for (to, (priority, granularity)) in targets {
                let edge = DesireEdge {
                    from: from_id,
                    to: graph[to].id,
                    priority,
                    granularity,
                };
                let index = graph.add_edge(from, to, edge);
                edges.insert((edge.from, edge.to), index);
            }
        }

        stats.nodes = graph.node_count();
        stats.edges = graph.edge_count();

        Self {
            graph,
            nodes,
            edges,
            locations: resolved,
            stats,
        }
    }

    pub fn contains(&self, id: OfficerId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn officer(&self, id: OfficerId) -> Option<&Officer> {
        self.nodes.get(&id).map(|&ix| &self.graph[ix])
    }

    pub fn location_of(&self, id: OfficerId) -> Option<&LocationTriple> {
        self.locations.get(&id)
    }

    /// Edges leaving `id`: whose posts `id` wants
    pub fn out_edges(&self, id: OfficerId) -> impl Iterator<Item = &DesireEdge> + '_ {
        self.adjacent(id, Direction::Outgoing)
    }

    /// Edges entering `id`: who wants the post `id` holds
    pub fn in_edges(&self, id: OfficerId) -> impl Iterator<Item = &DesireEdge> + '_ {
        self.adjacent(id, Direction::Incoming)
    }

    pub fn out_degree(&self, id: OfficerId) -> usize {
        self.degree(id, Direction::Outgoing)
    }

    pub fn in_degree(&self, id: OfficerId) -> usize {
        self.degree(id, Direction::Incoming)
    }

    pub fn edge(&self, from: OfficerId, to: OfficerId) -> Option<&DesireEdge> {
        self.edges.get(&(from, to)).map(|&ix| &self.graph[ix])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    fn adjacent(&self, id: OfficerId, direction: Direction) -> impl Iterator<Item = &DesireEdge> + '_ {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(move |&ix| self.graph.edges_directed(ix, direction).map(|e| e.weight()))
    }

    fn degree(&self, id: OfficerId, direction: Direction) -> usize {
        self.nodes
            .get(&id)
            .map_or(0, |&ix| self.graph.edges_directed(ix, direction).count())
    }
}
