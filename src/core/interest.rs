use crate::core::graph::{DesireEdge, DesireGraph};
use crate::models::OfficerId;

/// Everyone whose intentions are satisfied by `target`'s current post
///
/// Sorted by matched priority (best first), then by officer id. Works even
/// when `target` has no intentions of its own.
pub fn find_interested(target: OfficerId, graph: &DesireGraph) -> Vec<DesireEdge> {
    let mut interested: Vec<DesireEdge> = graph.in_edges(target).copied().collect();
    interested.sort_by_key(|edge| (edge.priority, edge.from));
    interested
}
